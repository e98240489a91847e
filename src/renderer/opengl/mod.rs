pub use self::{
    core::{
        GlContext, GlErrorCode, RawBuffer, RawProgram, RawShader, RawUniformLocation,
        RawVertexArray,
    },
    resource::{
        AttributeKind, IndexBuffer, ShaderProgram, ShaderSource, ShaderSourceBuilder,
        UniformLocationCache, VertexArray, VertexAttribute, VertexBuffer, VertexLayout,
    },
};

pub mod core;
pub mod resource;

use self::core::call;
use crate::{gl_call, gl_debug_call};
use glow::HasContext;
use snafu::{ResultExt, Snafu};
use std::sync::Arc;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum Error {
    #[snafu(display("Failed to draw {} indices: {}", count, source))]
    DrawElements { count: u32, source: call::Error },
}

/// The draw entry point: composes a vertex array, an index buffer, and a
/// program into one indexed draw, plus the frame housekeeping around it.
pub struct Renderer {
    context: Arc<GlContext>,
}

impl Renderer {
    pub fn new(context: Arc<GlContext>) -> Self {
        Self { context }
    }

    /// Issues one indexed triangle draw spanning the whole index buffer.
    /// All three collaborators are rebound first; a draw never leans on
    /// bindings left over from earlier calls.
    pub fn draw(
        &self,
        vertex_array: &VertexArray,
        index_buffer: &IndexBuffer,
        program: &ShaderProgram,
    ) -> Result<()> {
        program.bind();
        vertex_array.bind();
        index_buffer.bind();

        let count = index_buffer.count();
        let gl = self.context.gl();
        gl_call!(
            gl,
            gl.draw_elements(glow::TRIANGLES, count as i32, glow::UNSIGNED_INT, 0)
        )
        .context(DrawElements { count })?;

        Ok(())
    }

    pub fn set_clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.clear_color(red, green, blue, alpha));
    }

    pub fn clear(&self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.clear(glow::COLOR_BUFFER_BIT));
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.viewport(0, 0, width as i32, height as i32));
    }
}
