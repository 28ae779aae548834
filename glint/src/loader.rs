//! Dynamic procedure loading for the OpenGL 3.3 entry points.
//!
//! Core-profile entry points are not available through static linking; they have to be
//! resolved by name against the active context, once, at startup. The [`gl`] crate holds
//! the global pointer table; this module enumerates the entry points the crate actually
//! calls and validates them after loading, so a symbol the driver does not export is
//! reported by name instead of crashing on first use.

use std::error;
use std::fmt;
use std::os::raw::c_void;

/// An error that might happen when loading or validating the procedure-pointer table.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProcLoadError {
  /// A required entry point was not resolved by the platform loader.
  MissingProc(&'static str),
}

impl fmt::Display for ProcLoadError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProcLoadError::MissingProc(name) => write!(f, "missing OpenGL procedure: {}", name),
    }
  }
}

impl error::Error for ProcLoadError {}

// Enumerate the entry points the crate calls and generate both the name table and the
// post-load validation out of the single list.
macro_rules! gl33_procs {
  ($($proc:ident),* $(,)?) => {
    /// Names of the OpenGL 3.3 entry points resolved at startup, in enumeration order.
    pub const REQUIRED_PROCS: &[&str] = &[$(concat!("gl", stringify!($proc))),*];

    fn first_missing_proc() -> Option<&'static str> {
      $(
        if !gl::$proc::is_loaded() {
          return Some(concat!("gl", stringify!($proc)));
        }
      )*

      None
    }
  };
}

gl33_procs![
  AttachShader,
  BindBuffer,
  BindVertexArray,
  BufferData,
  Clear,
  ClearColor,
  CompileShader,
  CreateProgram,
  CreateShader,
  DeleteBuffers,
  DeleteProgram,
  DeleteShader,
  DeleteVertexArrays,
  DrawArrays,
  EnableVertexAttribArray,
  GenBuffers,
  GenVertexArrays,
  GetFloatv,
  GetIntegerv,
  GetProgramInfoLog,
  GetProgramiv,
  GetShaderInfoLog,
  GetShaderiv,
  GetString,
  LinkProgram,
  ShaderSource,
  UseProgram,
  VertexAttribPointer,
  Viewport,
];

/// Load the procedure-pointer table via the platform loader and validate it.
///
/// `get_proc` maps an entry point name to its address in the active context; windowing
/// crates pass their `get_proc_address` equivalent here. Loading is idempotent, so calling
/// this again on the same context is harmless.
pub fn load_with<F>(mut get_proc: F) -> Result<(), ProcLoadError>
where
  F: FnMut(&str) -> *const c_void,
{
  gl::load_with(|s| get_proc(s));
  ensure_loaded()
}

/// Validate that every required entry point has been resolved.
///
/// The first missing entry point wins; there is no fallback nor capability negotiation.
pub fn ensure_loaded() -> Result<(), ProcLoadError> {
  match first_missing_proc() {
    Some(name) => Err(ProcLoadError::MissingProc(name)),
    None => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn proc_names_are_prefixed() {
    assert!(!REQUIRED_PROCS.is_empty());

    for name in REQUIRED_PROCS {
      assert!(name.starts_with("gl"), "not a GL symbol name: {}", name);
    }
  }

  #[test]
  fn proc_names_are_unique() {
    let unique: HashSet<_> = REQUIRED_PROCS.iter().collect();
    assert_eq!(unique.len(), REQUIRED_PROCS.len());
  }

  #[test]
  fn proc_table_covers_the_bootstrap() {
    // entry points every part of the linear setup depends on: buffer upload, shader
    // compilation, drawing and state queries
    for name in [
      "glBufferData",
      "glCompileShader",
      "glDrawArrays",
      "glGetIntegerv",
      "glLinkProgram",
      "glVertexAttribPointer",
    ] {
      assert!(REQUIRED_PROCS.contains(&name), "missing from table: {}", name);
    }
  }

  #[test]
  fn missing_proc_is_reported_by_name() {
    let e = ProcLoadError::MissingProc("glGenBuffers");
    assert_eq!(e.to_string(), "missing OpenGL procedure: glGenBuffers");
  }
}
