use glow::HasContext;
use log::info;
use std::marker::PhantomData;

// Opaque handle types of the loaded dispatch table. Only creation calls
// produce them; exactly one wrapper owns each.
pub type RawBuffer = <glow::Context as glow::HasContext>::Buffer;
pub type RawVertexArray = <glow::Context as glow::HasContext>::VertexArray;
pub type RawShader = <glow::Context as glow::HasContext>::Shader;
pub type RawProgram = <glow::Context as glow::HasContext>::Program;
pub type RawUniformLocation = <glow::Context as glow::HasContext>::UniformLocation;

/// Owns the loaded OpenGL function pointers. Every wrapper object holds
/// an `Arc` to the context it was created from, so no handle outlives the
/// dispatch table behind it.
pub struct GlContext {
    gl: glow::Context,
    version: String,
    // Keeps the context !Send + !Sync; the loaded API is only valid on
    // the thread it was made current on.
    _marker: PhantomData<*const ()>,
}

impl GlContext {
    /// # Safety
    ///
    /// The context `loader` resolves symbols against must be current on
    /// the calling thread, and must stay current and alive for as long
    /// as this wrapper and anything created from it are in use.
    pub unsafe fn new(loader: impl FnMut(&str) -> *const std::os::raw::c_void) -> Self {
        let gl = glow::Context::from_loader_function(loader);
        let version = gl.get_parameter_string(glow::VERSION);
        info!("OpenGL context loaded: {}", version);

        Self {
            gl,
            version,
            _marker: PhantomData,
        }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}
