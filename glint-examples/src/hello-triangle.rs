//! This program is the hello world of glint: it opens an 800×600 window, creates an
//! OpenGL 3.3 context, uploads a single triangle with an inline shader pair and redraws
//! it every frame against a black background.
//!
//! Close the window to quit.

use glint::mesh::{Mesh, Mode, Vertex};
use glint::model::Model;
use glint::shader::Program;
use glint_glutin::{GlutinSurface, WindowDim, WindowOpt};
use glutin::event::{Event, WindowEvent};
use glutin::event_loop::ControlFlow;

// We get the shaders at compile time from local files.
const VS: &str = include_str!("triangle-vs.glsl");
const FS: &str = include_str!("triangle-fs.glsl");

// Vertex data for the triangle, in normalized device coordinates.
const TRI_VERTICES: [Vertex; 3] = [
  Vertex::new([0.0, 0.5, 0.0]),
  Vertex::new([-0.5, -0.5, 0.0]),
  Vertex::new([0.5, -0.5, 0.0]),
];

fn main() {
  env_logger::init();

  let dim = WindowDim::Windowed {
    width: 800,
    height: 600,
  };

  // First thing first: we create a new surface to render to and get events from.
  let (mut surface, event_loop) =
    GlutinSurface::new("OpenGL 3 Example", WindowOpt::default().set_dim(dim))
      .expect("Glutin surface creation");

  log::info!(
    "OpenGL context: {} {}, GL {}, GLSL {}",
    surface.backend().backend_author(),
    surface.backend().backend_name(),
    surface.backend().backend_version(),
    surface.backend().backend_shading_lang_version(),
  );

  // We need a program to shade the triangle…
  let program = Program::from_strings(surface.backend(), VS, FS).expect("program creation");

  // … and the triangle itself, uploaded once and never touched again.
  let mesh = Mesh::new(surface.backend(), &TRI_VERTICES, Mode::Triangle).expect("mesh upload");

  let mut model = Model::new(program, mesh);

  event_loop.run(move |event, _, control_flow| {
    *control_flow = ControlFlow::Poll;

    match event {
      Event::WindowEvent { event, .. } => match event {
        WindowEvent::CloseRequested => {
          *control_flow = ControlFlow::Exit;
        }

        WindowEvent::Resized(size) => {
          surface.ctx.resize(size);
          surface.backend().set_viewport(0, 0, size.width, size.height);
        }

        _ => (),
      },

      Event::MainEventsCleared => {
        surface.ctx.window().request_redraw();
      }

      Event::RedrawRequested(_) => {
        surface.backend().clear_frame([0., 0., 0., 0.]);
        model.draw();

        // finally, swap the backbuffer with the frontbuffer in order to render the
        // triangle onto your screen
        surface.swap_buffers();
      }

      _ => (),
    }
  });
}
