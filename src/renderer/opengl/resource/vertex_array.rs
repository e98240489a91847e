use crate::{
    gl_call, gl_debug_call,
    renderer::opengl::{
        core::{call, GlContext, RawVertexArray},
        resource::{VertexBuffer, VertexLayout},
    },
};
use glow::HasContext;
use snafu::{ResultExt, Snafu};
use std::sync::Arc;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum Error {
    #[snafu(display("Failed to create a vertex array object: {}", reason))]
    CreateVertexArray { reason: String },

    #[snafu(display("Failed to describe attribute slot {}: {}", slot, source))]
    DescribeAttribute { slot: u32, source: call::Error },
}

/// Couples vertex buffer contents to attribute slots.
pub struct VertexArray {
    handle: RawVertexArray,
    context: Arc<GlContext>,
}

impl VertexArray {
    pub fn new(context: Arc<GlContext>) -> Result<Self> {
        let handle = match unsafe { context.gl().create_vertex_array() } {
            Ok(handle) => handle,
            Err(reason) => return CreateVertexArray { reason }.fail(),
        };

        Ok(Self { handle, context })
    }

    /// Describes `buffer`'s contents to this array, one attribute slot
    /// per layout entry starting at slot 0. The array must be bound before
    /// the buffer so the descriptions land in this array's state; both
    /// binds happen here and both objects are left bound.
    pub fn add_buffer(&self, buffer: &VertexBuffer, layout: &VertexLayout) -> Result<()> {
        self.bind();
        buffer.bind();

        let gl = self.context.gl();
        for (slot, attribute) in layout.attributes().iter().enumerate() {
            let slot = slot as u32;
            gl_call!(gl, gl.enable_vertex_attrib_array(slot))
                .context(DescribeAttribute { slot })?;
            gl_call!(
                gl,
                gl.vertex_attrib_pointer_f32(
                    slot,
                    attribute.count as i32,
                    attribute.kind.gl_type(),
                    attribute.normalized,
                    layout.stride() as i32,
                    attribute.offset as i32,
                )
            )
            .context(DescribeAttribute { slot })?;
        }

        Ok(())
    }

    pub fn bind(&self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.bind_vertex_array(Some(self.handle)));
    }

    pub fn unbind(&self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.bind_vertex_array(None));
    }

    pub fn handle(&self) -> RawVertexArray {
        self.handle
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.delete_vertex_array(self.handle));
    }
}
