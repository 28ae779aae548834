//! Minimal OpenGL 3.3 bootstrap.
//!
//! This crate covers the GL-facing side of a very small rendering setup: resolving the
//! versioned OpenGL 3.3 entry points against an active context, compiling and linking a
//! shader pair, uploading a mesh to GPU memory and redrawing it. It does not open windows
//! nor create contexts; a companion crate (such as
//! [glint-glutin](https://crates.io/crates/glint-glutin)) is responsible for providing a
//! current context before [`Gl33`] is built.
//!
//! The entry point of the crate is [`Gl33`], which validates the procedure-pointer table
//! and snapshots the context state. Everything else ([`shader::Program`], [`mesh::Mesh`],
//! [`model::Model`]) is created out of it.

pub mod loader;
pub mod mesh;
pub mod model;
pub mod shader;
pub mod state;

pub use crate::loader::ProcLoadError;
pub use crate::state::{GlState, StateQueryError};

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::rc::Rc;

/// An OpenGL 3.3 backend.
///
/// Creating this type requires a current OpenGL context on the calling thread, with its
/// procedure pointers already loaded (see [`loader::load_with`]).
#[derive(Debug)]
pub struct Gl33 {
  pub(crate) state: Rc<RefCell<GlState>>,
}

impl Gl33 {
  /// Create a new OpenGL 3.3 backend.
  ///
  /// The procedure-pointer table is validated first so that a missing entry point is
  /// reported by name instead of turning into a null call later on.
  pub fn new() -> Result<Self, BackendError> {
    loader::ensure_loaded()?;

    let state = GlState::new()?;

    Ok(Gl33 {
      state: Rc::new(RefCell::new(state)),
    })
  }

  /// Clear the color buffer with the given color.
  ///
  /// This is the once-per-frame clear of the render loop; the clear color is cached so
  /// redundant `glClearColor` calls are elided.
  pub fn clear_frame(&mut self, color: [f32; 4]) {
    let mut state = self.state.borrow_mut();

    unsafe {
      state.set_clear_color([
        color[0] as GLfloat,
        color[1] as GLfloat,
        color[2] as GLfloat,
        color[3] as GLfloat,
      ]);
      gl::Clear(gl::COLOR_BUFFER_BIT);
    }
  }

  /// Set the viewport, in pixels.
  pub fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
    let mut state = self.state.borrow_mut();

    unsafe {
      state.set_viewport([x as GLint, y as GLint, width as GLint, height as GLint]);
    }
  }

  /// Name of the company responsible for the GL implementation.
  pub fn backend_author(&self) -> String {
    self.state.borrow_mut().get_vendor_name()
  }

  /// Name of the renderer, typically the GPU or the software rasterizer in use.
  pub fn backend_name(&self) -> String {
    self.state.borrow_mut().get_renderer_name()
  }

  /// Version of the GL implementation.
  pub fn backend_version(&self) -> String {
    self.state.borrow_mut().get_gl_version()
  }

  /// Version of the shading language.
  pub fn backend_shading_lang_version(&self) -> String {
    self.state.borrow_mut().get_glsl_version()
  }
}

/// An error that might happen when creating the backend.
#[non_exhaustive]
#[derive(Debug)]
pub enum BackendError {
  /// A required procedure is missing from the loaded table.
  ProcLoadError(ProcLoadError),

  /// The graphics state could not be queried from the context.
  StateQueryError(StateQueryError),
}

impl fmt::Display for BackendError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      BackendError::ProcLoadError(ref e) => write!(f, "procedure loading error: {}", e),
      BackendError::StateQueryError(ref e) => write!(f, "failed to get graphics state: {}", e),
    }
  }
}

impl error::Error for BackendError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      BackendError::ProcLoadError(e) => Some(e),
      BackendError::StateQueryError(e) => Some(e),
    }
  }
}

impl From<ProcLoadError> for BackendError {
  fn from(e: ProcLoadError) -> Self {
    BackendError::ProcLoadError(e)
  }
}

impl From<StateQueryError> for BackendError {
  fn from(e: StateQueryError) -> Self {
    BackendError::StateQueryError(e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn backend_error_display() {
    let e = BackendError::from(ProcLoadError::MissingProc("glCreateShader"));
    assert_eq!(
      e.to_string(),
      "procedure loading error: missing OpenGL procedure: glCreateShader"
    );

    let e = BackendError::from(StateQueryError::UnavailableGlState);
    assert_eq!(
      e.to_string(),
      "failed to get graphics state: unavailable graphics state"
    );
  }
}
