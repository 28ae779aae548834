//! Shader stages and programs.
//!
//! A [`Program`] is the compiled-and-linked pairing of a vertex stage and a fragment
//! stage. Compilation and linking statuses are checked and the driver info log is
//! surfaced on failure.

use crate::state::GlState;
use crate::Gl33;
use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::ffi::CString;
use std::fmt;
use std::ptr::{null, null_mut};
use std::rc::Rc;

/// Shader source pragma, injected in front of every stage source.
const GLSL_PRAGMA: &str = "#version 330 core\n";

/// A shader stage type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// An error that might happen when compiling a shader stage.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StageError {
  /// Occurs when a shader fails to compile. The carried [`String`] is the driver info log.
  CompilationFailed(StageType, String),
}

impl StageError {
  pub(crate) fn compilation_failed(ty: StageType, log: impl Into<String>) -> Self {
    StageError::CompilationFailed(ty, log.into())
  }
}

impl fmt::Display for StageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageError::CompilationFailed(ref ty, ref log) => {
        write!(f, "{} compilation error: {}", ty, log)
      }
    }
  }
}

impl error::Error for StageError {}

/// An error that might happen when linking a shader program.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProgramError {
  /// A stage failed to compile.
  StageError(StageError),

  /// Program link failed. The carried [`String`] is the driver info log.
  LinkFailed(String),
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProgramError::StageError(ref e) => write!(f, "shader program has an invalid stage: {}", e),
      ProgramError::LinkFailed(ref log) => write!(f, "shader program failed to link: {}", log),
    }
  }
}

impl error::Error for ProgramError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ProgramError::StageError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<StageError> for ProgramError {
  fn from(e: StageError) -> Self {
    ProgramError::StageError(e)
  }
}

/// A compiled shader stage.
#[derive(Debug)]
pub struct Stage {
  handle: GLuint,
  ty: StageType,
}

impl Stage {
  /// Compile a shader stage from its source.
  ///
  /// The `#version 330 core` pragma is injected in front of `src`, so sources must not
  /// carry their own version directive.
  pub fn new(ty: StageType, src: &str) -> Result<Self, StageError> {
    unsafe {
      let handle = gl::CreateShader(opengl_shader_type(ty));

      if handle == 0 {
        return Err(StageError::compilation_failed(
          ty,
          "unable to create shader stage",
        ));
      }

      let c_src = CString::new(glsl_pragma_src(src).as_bytes()).unwrap();
      gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
      gl::CompileShader(handle);

      let mut compiled: GLint = gl::FALSE.into();
      gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);

      if compiled == gl::TRUE.into() {
        Ok(Stage { handle, ty })
      } else {
        let mut log_len: GLint = 0;
        gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

        let mut log: Vec<u8> = Vec::with_capacity(log_len as usize);
        gl::GetShaderInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

        gl::DeleteShader(handle);

        log.set_len(log_len as usize);

        Err(StageError::compilation_failed(
          ty,
          String::from_utf8_lossy(&log).into_owned(),
        ))
      }
    }
  }

  /// Type of the stage.
  pub fn ty(&self) -> StageType {
    self.ty
  }
}

impl Drop for Stage {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteShader(self.handle);
    }
  }
}

/// A linked shader program.
#[derive(Debug)]
pub struct Program {
  pub(crate) handle: GLuint,
  pub(crate) state: Rc<RefCell<GlState>>,
}

impl Program {
  /// Compile and link a program out of a vertex and a fragment source.
  ///
  /// The intermediate stage objects are deleted once the program is linked.
  pub fn from_strings(gl33: &mut Gl33, vs_src: &str, fs_src: &str) -> Result<Self, ProgramError> {
    let vertex = Stage::new(StageType::VertexShader, vs_src)?;
    let fragment = Stage::new(StageType::FragmentShader, fs_src)?;

    unsafe {
      let handle = gl::CreateProgram();

      gl::AttachShader(handle, vertex.handle);
      gl::AttachShader(handle, fragment.handle);

      let program = Program {
        handle,
        state: gl33.state.clone(),
      };

      program.link().map(move |_| program)
    }
  }

  fn link(&self) -> Result<(), ProgramError> {
    let handle = self.handle;

    unsafe {
      gl::LinkProgram(handle);

      let mut linked: GLint = gl::FALSE.into();
      gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

      if linked == gl::TRUE.into() {
        Ok(())
      } else {
        let mut log_len: GLint = 0;
        gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

        let mut log: Vec<u8> = Vec::with_capacity(log_len as usize);
        gl::GetProgramInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

        log.set_len(log_len as usize);

        Err(ProgramError::LinkFailed(
          String::from_utf8_lossy(&log).into_owned(),
        ))
      }
    }
  }
}

impl Drop for Program {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_program(self.handle);
      gl::DeleteProgram(self.handle);
    }
  }
}

fn opengl_shader_type(t: StageType) -> GLenum {
  match t {
    StageType::VertexShader => gl::VERTEX_SHADER,
    StageType::FragmentShader => gl::FRAGMENT_SHADER,
  }
}

fn glsl_pragma_src(src: &str) -> String {
  let mut pragma = String::from(GLSL_PRAGMA);
  pragma.push_str(src);
  pragma
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stage_type_to_glenum() {
    assert_eq!(opengl_shader_type(StageType::VertexShader), gl::VERTEX_SHADER);
    assert_eq!(
      opengl_shader_type(StageType::FragmentShader),
      gl::FRAGMENT_SHADER
    );
  }

  #[test]
  fn pragma_is_injected_first() {
    let src = glsl_pragma_src("void main() {}\n");
    assert!(src.starts_with("#version 330 core\n"));
    assert!(src.ends_with("void main() {}\n"));
  }

  #[test]
  fn stage_error_display() {
    let e = StageError::compilation_failed(StageType::VertexShader, "0:1(1): error");
    assert_eq!(e.to_string(), "vertex shader compilation error: 0:1(1): error");
  }

  #[test]
  fn program_error_display() {
    let e = ProgramError::LinkFailed("no main".to_owned());
    assert_eq!(e.to_string(), "shader program failed to link: no main");

    let e = ProgramError::from(StageError::compilation_failed(
      StageType::FragmentShader,
      "bad",
    ));
    assert_eq!(
      e.to_string(),
      "shader program has an invalid stage: fragment shader compilation error: bad"
    );
  }
}
