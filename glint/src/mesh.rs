//! Mesh upload.
//!
//! A [`Mesh`] owns a vertex array object and the vertex buffer it sources, filled once at
//! creation with [`gl::STATIC_DRAW`] and never mutated afterwards.

use crate::state::{Bind, GlState};
use crate::Gl33;
use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::mem;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

/// A position-only vertex.
///
/// Attribute index 0, three tightly packed `f32` per vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
  /// Position in normalized device coordinates.
  pub pos: [f32; 3],
}

impl Vertex {
  /// Create a new vertex.
  pub const fn new(pos: [f32; 3]) -> Self {
    Vertex { pos }
  }
}

/// Render mode, mapped to the underlying primitive type at draw time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
  /// A single point per vertex.
  Point,
  /// A line, defined by two points.
  Line,
  /// A strip of lines, defined by at least two points and zero or many extra ones.
  LineStrip,
  /// A triangle, defined by three points.
  Triangle,
  /// A strip of triangles, defined by at least three points and zero or many extra ones.
  TriangleStrip,
  /// A fan of triangles, defined by at least three points and zero or many extra ones.
  TriangleFan,
}

/// An error that might happen when uploading a mesh.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MeshError {
  /// The vertex slice to upload is empty.
  NoVertices,
}

impl fmt::Display for MeshError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      MeshError::NoVertices => f.write_str("cannot upload a mesh with no vertices"),
    }
  }
}

impl error::Error for MeshError {}

/// GPU mesh.
///
/// Holds the vertex array object along with its backing vertex buffer.
#[derive(Debug)]
pub struct Mesh {
  pub(crate) vao: GLuint,
  vbo: GLuint,
  pub(crate) mode: GLenum,
  pub(crate) vert_nb: usize,
  pub(crate) state: Rc<RefCell<GlState>>,
}

impl Mesh {
  /// Upload a vertex slice and build the vertex array object around it.
  pub fn new(gl33: &mut Gl33, vertices: &[Vertex], mode: Mode) -> Result<Self, MeshError> {
    if vertices.is_empty() {
      return Err(MeshError::NoVertices);
    }

    let mut vao: GLuint = 0;
    let mut vbo: GLuint = 0;
    let mut gfx_st = gl33.state.borrow_mut();

    unsafe {
      gl::GenVertexArrays(1, &mut vao);

      // force binding the vertex array so that previously bound vertex arrays (possibly the
      // same handle) don’t prevent us from binding here
      gfx_st.bind_vertex_array(vao, Bind::Forced);

      gl::GenBuffers(1, &mut vbo);

      // force binding as it’s meaningful when a vao is bound
      gfx_st.bind_array_buffer(vbo, Bind::Forced);

      let bytes = vertices.len() * mem::size_of::<Vertex>();
      gl::BufferData(
        gl::ARRAY_BUFFER,
        bytes as isize,
        vertices.as_ptr() as *const c_void,
        gl::STATIC_DRAW,
      );

      set_vertex_pointers();

      gfx_st.unbind_vertex_array();
    }

    Ok(Mesh {
      vao,
      vbo,
      mode: opengl_mode(mode),
      vert_nb: vertices.len(),
      state: gl33.state.clone(),
    })
  }

  /// Number of vertices the mesh renders.
  pub fn vert_nb(&self) -> usize {
    self.vert_nb
  }
}

impl Drop for Mesh {
  fn drop(&mut self) {
    unsafe {
      let mut gfx_st = self.state.borrow_mut();

      gfx_st.unbind_vertex_array();
      gl::DeleteVertexArrays(1, &self.vao);

      gfx_st.unbind_buffer(self.vbo);
      gl::DeleteBuffers(1, &self.vbo);
    }
  }
}

// Set the vertex component OpenGL pointers for the position-only layout.
fn set_vertex_pointers() {
  let stride = mem::size_of::<Vertex>() as GLsizei;

  unsafe {
    gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, ptr::null::<c_void>());
    gl::EnableVertexAttribArray(0);
  }
}

fn opengl_mode(mode: Mode) -> GLenum {
  match mode {
    Mode::Point => gl::POINTS,
    Mode::Line => gl::LINES,
    Mode::LineStrip => gl::LINE_STRIP,
    Mode::Triangle => gl::TRIANGLES,
    Mode::TriangleStrip => gl::TRIANGLE_STRIP,
    Mode::TriangleFan => gl::TRIANGLE_FAN,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vertex_layout_is_tightly_packed() {
    assert_eq!(mem::size_of::<Vertex>(), 3 * mem::size_of::<f32>());
    assert_eq!(mem::align_of::<Vertex>(), mem::align_of::<f32>());
  }

  #[test]
  fn mode_to_glenum() {
    assert_eq!(opengl_mode(Mode::Point), gl::POINTS);
    assert_eq!(opengl_mode(Mode::Line), gl::LINES);
    assert_eq!(opengl_mode(Mode::LineStrip), gl::LINE_STRIP);
    assert_eq!(opengl_mode(Mode::Triangle), gl::TRIANGLES);
    assert_eq!(opengl_mode(Mode::TriangleStrip), gl::TRIANGLE_STRIP);
    assert_eq!(opengl_mode(Mode::TriangleFan), gl::TRIANGLE_FAN);
  }

  #[test]
  fn mesh_error_display() {
    assert_eq!(
      MeshError::NoVertices.to_string(),
      "cannot upload a mesh with no vertices"
    );
  }
}
