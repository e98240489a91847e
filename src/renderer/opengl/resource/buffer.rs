use crate::{
    gl_call, gl_debug_call,
    renderer::{
        byte_slice_from,
        opengl::core::{call, GlContext, RawBuffer},
    },
};
use glow::HasContext;
use snafu::{ResultExt, Snafu};
use std::sync::Arc;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum Error {
    #[snafu(display("Failed to create a buffer object: {}", reason))]
    CreateBuffer { reason: String },

    #[snafu(display("Failed to upload buffer data: {}", source))]
    UploadBufferData { source: call::Error },
}

/// Vertex data uploaded once at construction and immutable after.
pub struct VertexBuffer {
    handle: RawBuffer,
    size_bytes: usize,
    context: Arc<GlContext>,
}

impl VertexBuffer {
    pub fn new<T: Copy>(context: Arc<GlContext>, vertices: &[T]) -> Result<Self> {
        let handle = match unsafe { context.gl().create_buffer() } {
            Ok(handle) => handle,
            Err(reason) => return CreateBuffer { reason }.fail(),
        };

        let buffer = Self {
            handle,
            size_bytes: vertices.len() * std::mem::size_of::<T>(),
            context,
        };
        buffer.upload(vertices)?;

        Ok(buffer)
    }

    fn upload<T: Copy>(&self, vertices: &[T]) -> Result<()> {
        self.bind();
        let gl = self.context.gl();
        let data = unsafe { byte_slice_from(vertices) };
        gl_call!(
            gl,
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW)
        )
        .context(UploadBufferData)?;
        Ok(())
    }

    pub fn bind(&self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.handle)));
    }

    pub fn unbind(&self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.bind_buffer(glow::ARRAY_BUFFER, None));
    }

    pub fn handle(&self) -> RawBuffer {
        self.handle
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.delete_buffer(self.handle));
    }
}

/// Triangle indices uploaded once at construction. The element count is
/// recorded so draws can span the whole buffer without recomputing it.
pub struct IndexBuffer {
    handle: RawBuffer,
    count: u32,
    context: Arc<GlContext>,
}

impl IndexBuffer {
    pub fn new(context: Arc<GlContext>, indices: &[u32]) -> Result<Self> {
        let handle = match unsafe { context.gl().create_buffer() } {
            Ok(handle) => handle,
            Err(reason) => return CreateBuffer { reason }.fail(),
        };

        let buffer = Self {
            handle,
            count: indices.len() as u32,
            context,
        };
        buffer.upload(indices)?;

        Ok(buffer)
    }

    fn upload(&self, indices: &[u32]) -> Result<()> {
        self.bind();
        let gl = self.context.gl();
        let data = unsafe { byte_slice_from(indices) };
        gl_call!(
            gl,
            gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, data, glow::STATIC_DRAW)
        )
        .context(UploadBufferData)?;
        Ok(())
    }

    pub fn bind(&self) {
        let gl = self.context.gl();
        gl_debug_call!(
            gl,
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.handle))
        );
    }

    pub fn unbind(&self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None));
    }

    pub fn handle(&self) -> RawBuffer {
        self.handle
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.delete_buffer(self.handle));
    }
}
