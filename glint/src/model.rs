//! Renderable unit.

use crate::mesh::Mesh;
use crate::shader::Program;
use crate::state::Bind;
use gl::types::*;

/// The pairing of a linked shader program and the mesh it is used to draw.
#[derive(Debug)]
pub struct Model {
  program: Program,
  mesh: Mesh,
}

impl Model {
  /// Pair a program with a mesh.
  pub fn new(program: Program, mesh: Mesh) -> Self {
    Model { program, mesh }
  }

  /// Draw the whole mesh with the program.
  ///
  /// Bindings go through the cached state layer, so redrawing the same model every frame
  /// issues no redundant binds.
  pub fn draw(&mut self) {
    let mut gfx_st = self.program.state.borrow_mut();

    unsafe {
      gfx_st.use_program(self.program.handle);
      gfx_st.bind_vertex_array(self.mesh.vao, Bind::Cached);

      gl::DrawArrays(self.mesh.mode, 0, self.mesh.vert_nb as GLsizei);
    }
  }
}
