//! [glutin] windowing support for [glint].
//!
//! This crate performs the platform bootstrap: it opens a native window, creates an
//! OpenGL 3.3 core-profile context on it, makes the context current, resolves the
//! procedure-pointer table and hands back a [`GlutinSurface`] paired with the event loop
//! to drive it.
//!
//! [glutin]: https://crates.io/crates/glutin
//! [glint]: https://crates.io/crates/glint

#![deny(missing_docs)]

pub use glutin;

use glint::Gl33;
use glutin::{
  dpi::LogicalSize,
  event_loop::EventLoop,
  window::{Fullscreen, WindowBuilder},
  Api, ContextBuilder, ContextError, CreationError, GlProfile, GlRequest, NotCurrent,
  PossiblyCurrent, WindowedContext,
};
use std::error;
use std::fmt;
use std::os::raw::c_void;

/// Dimension metrics.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WindowDim {
  /// Windowed mode.
  Windowed {
    /// Width of the window.
    width: u32,
    /// Height of the window.
    height: u32,
  },

  /// Fullscreen mode (adapts to the primary monitor).
  Fullscreen,

  /// Fullscreen mode with a restricted viewport dimension.
  FullscreenRestricted {
    /// Width of the viewport.
    width: u32,
    /// Height of the viewport.
    height: u32,
  },
}

/// Cursor mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorMode {
  /// The cursor is always visible.
  Visible,
  /// The cursor exists yet has been hidden.
  Invisible,
  /// The cursor is hidden and grabbed by the window.
  Disabled,
}

/// Different window options.
///
/// Feel free to look at the different methods available to tweak the options. You may want
/// to start with `default()` though.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowOpt {
  dim: WindowDim,
  cursor_mode: CursorMode,
  num_samples: Option<u32>,
}

impl Default for WindowOpt {
  /// Defaults:
  ///
  /// - `dim` set to `WindowDim::Windowed { width: 960, height: 540 }`.
  /// - `cursor_mode` set to `CursorMode::Visible`.
  /// - `num_samples` set to `None`.
  fn default() -> Self {
    WindowOpt {
      dim: WindowDim::Windowed {
        width: 960,
        height: 540,
      },
      cursor_mode: CursorMode::Visible,
      num_samples: None,
    }
  }
}

impl WindowOpt {
  /// Set the dimension of the window.
  #[inline]
  pub fn set_dim(self, dim: WindowDim) -> Self {
    WindowOpt { dim, ..self }
  }

  /// Get the dimension of the window.
  #[inline]
  pub fn dim(&self) -> WindowDim {
    self.dim
  }

  /// Hide, unhide or disable the cursor. Default to `CursorMode::Visible`.
  #[inline]
  pub fn set_cursor_mode(self, mode: CursorMode) -> Self {
    WindowOpt {
      cursor_mode: mode,
      ..self
    }
  }

  /// Get the cursor mode.
  #[inline]
  pub fn cursor_mode(&self) -> CursorMode {
    self.cursor_mode
  }

  /// Set the number of samples to use for multisampling.
  ///
  /// Pass `None` to disable multisampling.
  #[inline]
  pub fn set_num_samples<S>(self, samples: S) -> Self
  where
    S: Into<Option<u32>>,
  {
    WindowOpt {
      num_samples: samples.into(),
      ..self
    }
  }

  /// Get the number of samples to use in multisampling, if any.
  #[inline]
  pub fn num_samples(&self) -> Option<u32> {
    self.num_samples
  }
}

/// Error that might occur when creating a Glutin surface.
#[non_exhaustive]
#[derive(Debug)]
pub enum GlutinSurfaceError {
  /// Something went wrong when creating the windowed context. The carried
  /// [`CreationError`] provides more information.
  CreationError(CreationError),

  /// OpenGL context error.
  ContextError(ContextError),

  /// The backend could not be bootstrapped on the new context.
  BackendError(glint::BackendError),
}

impl fmt::Display for GlutinSurfaceError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GlutinSurfaceError::CreationError(ref e) => {
        write!(f, "Glutin surface creation error: {}", e)
      }
      GlutinSurfaceError::ContextError(ref e) => {
        write!(f, "Glutin OpenGL context creation error: {}", e)
      }
      GlutinSurfaceError::BackendError(ref e) => {
        write!(f, "OpenGL backend initialization error: {}", e)
      }
    }
  }
}

impl error::Error for GlutinSurfaceError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      GlutinSurfaceError::CreationError(e) => Some(e),
      GlutinSurfaceError::ContextError(e) => Some(e),
      GlutinSurfaceError::BackendError(e) => Some(e),
    }
  }
}

impl From<CreationError> for GlutinSurfaceError {
  fn from(e: CreationError) -> Self {
    GlutinSurfaceError::CreationError(e)
  }
}

impl From<ContextError> for GlutinSurfaceError {
  fn from(e: ContextError) -> Self {
    GlutinSurfaceError::ContextError(e)
  }
}

impl From<glint::BackendError> for GlutinSurfaceError {
  fn from(e: glint::BackendError) -> Self {
    GlutinSurfaceError::BackendError(e)
  }
}

/// The Glutin surface.
///
/// This type bundles the current windowed context (drawing surface, OpenGL context and
/// window) with the [`Gl33`] backend built on top of it.
pub struct GlutinSurface {
  /// The windowed context.
  pub ctx: WindowedContext<PossiblyCurrent>,
  /// OpenGL 3.3 backend.
  gl: Gl33,
}

impl GlutinSurface {
  /// Create a new [`GlutinSurface`] from scratch.
  ///
  /// The returned [`EventLoop`] drives the surface; the window is made visible once the
  /// context is current and the procedure-pointer table is loaded.
  pub fn new(title: &str, opt: WindowOpt) -> Result<(Self, EventLoop<()>), GlutinSurfaceError> {
    let event_loop = EventLoop::new();

    let window_builder = WindowBuilder::new().with_title(title).with_visible(false);
    let window_builder = match opt.dim {
      WindowDim::Windowed { width, height } => {
        window_builder.with_inner_size(LogicalSize::new(width, height))
      }

      WindowDim::Fullscreen => {
        window_builder.with_fullscreen(Some(Fullscreen::Borderless(None)))
      }

      WindowDim::FullscreenRestricted { width, height } => window_builder
        .with_inner_size(LogicalSize::new(width, height))
        .with_fullscreen(Some(Fullscreen::Borderless(None))),
    };

    let samples = opt.num_samples().unwrap_or(0) as u16;
    let windowed_ctx = ContextBuilder::new()
      .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
      .with_gl_profile(GlProfile::Core)
      .with_multisampling(samples)
      .with_double_buffer(Some(true))
      .build_windowed(window_builder, &event_loop)?;

    let ctx = unsafe { windowed_ctx.make_current().map_err(|(_, e)| e)? };

    Self::bootstrap(ctx, opt.cursor_mode).map(|surface| (surface, event_loop))
  }

  /// Create a new [`GlutinSurface`] by consuming builders.
  ///
  /// This is an alternative method to [`new`](GlutinSurface::new) that is more flexible as
  /// you have access to the whole `glutin` types. `ctx_builder` receives a builder already
  /// initialized for the OpenGL 3.3 core profile.
  pub fn from_builders<WB, CB>(
    window_builder: WB,
    ctx_builder: CB,
  ) -> Result<(Self, EventLoop<()>), GlutinSurfaceError>
  where
    WB: FnOnce(WindowBuilder) -> WindowBuilder,
    CB: FnOnce(ContextBuilder<NotCurrent>) -> ContextBuilder<NotCurrent>,
  {
    let event_loop = EventLoop::new();

    let window_builder = window_builder(WindowBuilder::new().with_visible(false));

    let windowed_ctx = ctx_builder(
      ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
        .with_gl_profile(GlProfile::Core),
    )
    .build_windowed(window_builder, &event_loop)?;

    let ctx = unsafe { windowed_ctx.make_current().map_err(|(_, e)| e)? };

    Self::bootstrap(ctx, CursorMode::Visible).map(|surface| (surface, event_loop))
  }

  /// Load the procedure table, build the backend and show the window.
  fn bootstrap(
    ctx: WindowedContext<PossiblyCurrent>,
    cursor_mode: CursorMode,
  ) -> Result<Self, GlutinSurfaceError> {
    // init OpenGL
    glint::loader::load_with(|s| ctx.get_proc_address(s) as *const c_void)
      .map_err(glint::BackendError::from)?;

    let gl = Gl33::new()?;

    match cursor_mode {
      CursorMode::Visible => ctx.window().set_cursor_visible(true),

      CursorMode::Invisible => ctx.window().set_cursor_visible(false),

      CursorMode::Disabled => {
        ctx.window().set_cursor_visible(false);
        let _ = ctx.window().set_cursor_grab(true);
      }
    }

    ctx.window().set_visible(true);

    Ok(GlutinSurface { ctx, gl })
  }

  /// Get the underlying size (in physical pixels) of the surface.
  pub fn size(&self) -> [u32; 2] {
    let size = self.ctx.window().inner_size();
    [size.width, size.height]
  }

  /// Access the OpenGL 3.3 backend.
  pub fn backend(&mut self) -> &mut Gl33 {
    &mut self.gl
  }

  /// Swap the back and front buffers.
  pub fn swap_buffers(&mut self) {
    let _ = self.ctx.swap_buffers();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn window_opt_defaults() {
    let opt = WindowOpt::default();

    assert_eq!(
      opt.dim(),
      WindowDim::Windowed {
        width: 960,
        height: 540
      }
    );
    assert_eq!(opt.cursor_mode(), CursorMode::Visible);
    assert_eq!(opt.num_samples(), None);
  }

  #[test]
  fn window_opt_setters() {
    let dim = WindowDim::Windowed {
      width: 800,
      height: 600,
    };
    let opt = WindowOpt::default()
      .set_dim(dim)
      .set_cursor_mode(CursorMode::Disabled)
      .set_num_samples(4);

    assert_eq!(opt.dim(), dim);
    assert_eq!(opt.cursor_mode(), CursorMode::Disabled);
    assert_eq!(opt.num_samples(), Some(4));

    let opt = opt.set_num_samples(None);
    assert_eq!(opt.num_samples(), None);
  }
}
