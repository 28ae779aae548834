//! Graphics state.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::ffi::CStr;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_char;

// TLS synchronization barrier for `GlState`.
thread_local!(static TLS_ACQUIRE_GFX_STATE: RefCell<Option<()>> = RefCell::new(Some(())));

/// Cached value.
///
/// A cached value is used to prevent issuing costy GPU commands if we know the target value
/// is already set to what the command tries to set. For instance, if the clear color was
/// already set to a value and the same value is asked again, the GPU command is elided.
#[derive(Debug)]
struct Cached<T>(Option<T>)
where
  T: PartialEq;

impl<T> Cached<T>
where
  T: PartialEq,
{
  /// Cache a value.
  fn new(initial: T) -> Self {
    Cached(Some(initial))
  }

  fn set(&mut self, value: T) {
    self.0 = Some(value);
  }

  /// Check if the cached value is invalid regarding a value.
  ///
  /// A non-cached value (i.e. empty) is always invalid whatever compared value. If a value
  /// is already cached, then it’s invalid if it’s not equal ([`PartialEq`]) to the input
  /// value.
  fn is_invalid(&self, new_val: &T) -> bool {
    match &self.0 {
      Some(ref t) => t != new_val,
      _ => true,
    }
  }
}

/// Should the binding be cached or forced to the provided value?
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Bind {
  Forced,
  Cached,
}

/// The graphics state.
///
/// This type represents the current state of a given graphics context. It acts as a
/// forward-gate to the features the crate uses from the low-level API but adds a small
/// cache layer over it to prevent from issuing the same API call (with the same
/// parameters).
#[derive(Debug)]
pub struct GlState {
  _a: PhantomData<*const ()>, // !Send and !Sync

  // clear buffers
  clear_color: Cached<[GLfloat; 4]>,

  // viewport
  viewport: Cached<[GLint; 4]>,

  // array buffer
  bound_array_buffer: GLuint,

  // vertex array
  bound_vertex_array: GLuint,

  // shader program
  current_program: GLuint,
}

impl GlState {
  /// Create a new `GlState`.
  ///
  /// > Note: keep in mind you can create only one per thread.
  pub(crate) fn new() -> Result<Self, StateQueryError> {
    TLS_ACQUIRE_GFX_STATE.with(|rc| {
      let mut inner = rc.borrow_mut();

      match *inner {
        Some(_) => {
          inner.take();
          Self::get_from_context()
        }

        None => Err(StateQueryError::UnavailableGlState),
      }
    })
  }

  /// Snapshot the relevant state of the current OpenGL context.
  fn get_from_context() -> Result<Self, StateQueryError> {
    unsafe {
      let clear_color = Cached::new(get_ctx_clear_color()?);
      let viewport = Cached::new(get_ctx_viewport()?);
      let bound_array_buffer = get_ctx_bound_array_buffer()?;
      let bound_vertex_array = get_ctx_bound_vertex_array()?;
      let current_program = get_ctx_current_program()?;

      Ok(GlState {
        _a: PhantomData,
        clear_color,
        viewport,
        bound_array_buffer,
        bound_vertex_array,
        current_program,
      })
    }
  }

  pub(crate) unsafe fn set_clear_color(&mut self, clear_color: [GLfloat; 4]) {
    if self.clear_color.is_invalid(&clear_color) {
      gl::ClearColor(
        clear_color[0],
        clear_color[1],
        clear_color[2],
        clear_color[3],
      );
      self.clear_color.set(clear_color);
    }
  }

  pub(crate) unsafe fn set_viewport(&mut self, viewport: [GLint; 4]) {
    if self.viewport.is_invalid(&viewport) {
      gl::Viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
      self.viewport.set(viewport);
    }
  }

  pub(crate) unsafe fn bind_array_buffer(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_array_buffer != handle {
      gl::BindBuffer(gl::ARRAY_BUFFER, handle);
      self.bound_array_buffer = handle;
    }
  }

  pub(crate) unsafe fn unbind_buffer(&mut self, handle: GLuint) {
    if self.bound_array_buffer == handle {
      self.bind_array_buffer(0, Bind::Cached);
    }
  }

  pub(crate) unsafe fn bind_vertex_array(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_vertex_array != handle {
      gl::BindVertexArray(handle);
      self.bound_vertex_array = handle;
    }
  }

  pub(crate) unsafe fn unbind_vertex_array(&mut self) {
    self.bind_vertex_array(0, Bind::Cached)
  }

  pub(crate) unsafe fn use_program(&mut self, handle: GLuint) {
    if self.current_program != handle {
      gl::UseProgram(handle);
      self.current_program = handle;
    }
  }

  pub(crate) unsafe fn unbind_program(&mut self, handle: GLuint) {
    if self.current_program == handle {
      self.use_program(0);
    }
  }

  pub(crate) fn get_vendor_name(&mut self) -> String {
    unsafe { get_ctx_string(gl::VENDOR) }
  }

  pub(crate) fn get_renderer_name(&mut self) -> String {
    unsafe { get_ctx_string(gl::RENDERER) }
  }

  pub(crate) fn get_gl_version(&mut self) -> String {
    unsafe { get_ctx_string(gl::VERSION) }
  }

  pub(crate) fn get_glsl_version(&mut self) -> String {
    unsafe { get_ctx_string(gl::SHADING_LANGUAGE_VERSION) }
  }
}

/// An error that might happen when the context is queried.
#[non_exhaustive]
#[derive(Debug)]
pub enum StateQueryError {
  /// The [`GlState`] object is unavailable.
  ///
  /// That might occur if the current thread doesn’t support allocating a new graphics
  /// state. It might happen if you try to have more than one state on the same thread, for
  /// instance.
  UnavailableGlState,
}

impl fmt::Display for StateQueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StateQueryError::UnavailableGlState => write!(f, "unavailable graphics state"),
    }
  }
}

impl error::Error for StateQueryError {}

unsafe fn get_ctx_clear_color() -> Result<[GLfloat; 4], StateQueryError> {
  let mut data = [0.; 4];
  gl::GetFloatv(gl::COLOR_CLEAR_VALUE, data.as_mut_ptr());
  Ok(data)
}

unsafe fn get_ctx_viewport() -> Result<[GLint; 4], StateQueryError> {
  let mut data = [0; 4];
  gl::GetIntegerv(gl::VIEWPORT, data.as_mut_ptr());
  Ok(data)
}

unsafe fn get_ctx_bound_array_buffer() -> Result<GLuint, StateQueryError> {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(gl::ARRAY_BUFFER_BINDING, &mut bound);
  Ok(bound as GLuint)
}

unsafe fn get_ctx_bound_vertex_array() -> Result<GLuint, StateQueryError> {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(gl::VERTEX_ARRAY_BINDING, &mut bound);
  Ok(bound as GLuint)
}

unsafe fn get_ctx_current_program() -> Result<GLuint, StateQueryError> {
  let mut used = 0 as GLint;
  gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut used);
  Ok(used as GLuint)
}

unsafe fn get_ctx_string(name: GLenum) -> String {
  let ptr = gl::GetString(name);

  if ptr.is_null() {
    return String::new();
  }

  CStr::from_ptr(ptr as *const c_char)
    .to_string_lossy()
    .into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cached_value_invalidation() {
    let mut cached = Cached::new(1);
    assert!(!cached.is_invalid(&1));
    assert!(cached.is_invalid(&2));

    cached.set(2);
    assert!(!cached.is_invalid(&2));
    assert!(cached.is_invalid(&1));
  }

  #[test]
  fn empty_cache_is_always_invalid() {
    let cached: Cached<i32> = Cached(None);
    assert!(cached.is_invalid(&0));
  }

  #[test]
  fn state_query_error_display() {
    assert_eq!(
      StateQueryError::UnavailableGlState.to_string(),
      "unavailable graphics state"
    );
  }
}
