use crate::{
    gl_call, gl_debug_call,
    renderer::opengl::core::{call, GlContext, RawProgram, RawShader, RawUniformLocation},
};
use derive_builder::Builder;
use glow::HasContext;
use log::{error, warn};
use nalgebra_glm as glm;
use snafu::{ensure, OptionExt, ResultExt, Snafu};
use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum Error {
    #[snafu(display("Failed to read shader source file '{}': {}", path.display(), source))]
    ReadShaderFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Shader source '{}' is missing a {} stage", label, stage))]
    MissingStage { label: String, stage: &'static str },

    #[snafu(display("Failed to create a {} shader object: {}", stage, reason))]
    CreateStage {
        stage: &'static str,
        reason: String,
    },

    #[snafu(display("Failed to compile the {} shader:\n{}", stage, log))]
    CompileStage { stage: &'static str, log: String },

    #[snafu(display("Failed to create a program object: {}", reason))]
    CreateProgram { reason: String },

    #[snafu(display("Failed to link shader program '{}':\n{}", label, log))]
    LinkProgram { label: String, log: String },

    #[snafu(display("Failed to validate shader program '{}':\n{}", label, log))]
    ValidateProgram { label: String, log: String },

    #[snafu(display("No active uniform named '{}' in shader program '{}'", name, label))]
    UniformNotFound { name: String, label: String },

    #[snafu(display("Failed to set uniform '{}': {}", name, source))]
    SetUniform { name: String, source: call::Error },
}

const STAGE_MARKER: &str = "#shader";

#[derive(Clone, Copy)]
enum Stage {
    Vertex,
    Fragment,
}

/// Per-stage shader text, either split out of a combined source file or
/// assembled directly through the builder.
#[derive(Builder, Clone, Debug, Default)]
#[builder(default, setter(into))]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    /// Splits combined source text on its `#shader <stage>` marker lines.
    /// Lines accumulate verbatim into the most recent recognized stage;
    /// lines before the first marker have no stage to belong to and are
    /// discarded with a warning.
    pub fn parse(text: &str) -> Self {
        let mut source = Self::default();
        let mut stage = None;

        for line in text.lines() {
            let trimmed = line.trim_start();
            // A marker is only the bare token followed by whitespace;
            // anything fused to it, like `#shadervertex`, is plain text.
            let marker = trimmed
                .strip_prefix(STAGE_MARKER)
                .filter(|rest| rest.starts_with(char::is_whitespace));
            if let Some(name) = marker {
                stage = match name.trim() {
                    "vertex" => Some(Stage::Vertex),
                    "fragment" => Some(Stage::Fragment),
                    other => {
                        warn!("Ignoring unrecognized shader stage '{}'", other);
                        None
                    }
                };
                continue;
            }

            match stage {
                Some(Stage::Vertex) => {
                    source.vertex.push_str(line);
                    source.vertex.push('\n');
                }
                Some(Stage::Fragment) => {
                    source.fragment.push_str(line);
                    source.fragment.push('\n');
                }
                None => {
                    if !trimmed.is_empty() {
                        warn!("Discarding shader line outside any stage section: '{}'", line);
                    }
                }
            }
        }

        source
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).context(ReadShaderFile { path })?;
        Ok(Self::parse(&text))
    }

    /// Whether both stages carry any text.
    pub fn is_complete(&self) -> bool {
        !self.vertex.trim().is_empty() && !self.fragment.trim().is_empty()
    }
}

pub type UniformLocationMap<L> = HashMap<String, Option<L>>;

/// Remembers uniform location lookups per program, misses included, so
/// repeated lookups stay deterministic and cost no driver round trips.
#[derive(Debug)]
pub struct UniformLocationCache<L> {
    locations: RefCell<UniformLocationMap<L>>,
}

impl<L> Default for UniformLocationCache<L> {
    fn default() -> Self {
        Self {
            locations: RefCell::new(HashMap::new()),
        }
    }
}

impl<L: Clone> UniformLocationCache<L> {
    /// Resolves `name`, consulting `lookup` only the first time it is
    /// seen.
    pub fn resolve(&self, name: &str, lookup: impl FnOnce(&str) -> Option<L>) -> Option<L> {
        if let Some(cached) = self.locations.borrow().get(name) {
            return cached.clone();
        }

        let location = lookup(name);
        self.locations
            .borrow_mut()
            .insert(name.to_string(), location.clone());
        location
    }

    pub fn len(&self) -> usize {
        self.locations.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.borrow().is_empty()
    }
}

struct ShaderStage {
    handle: RawShader,
    context: Arc<GlContext>,
}

impl ShaderStage {
    // Compiles one stage, failing with the driver's full log. The shader
    // object is released on every exit path.
    fn compile(
        context: Arc<GlContext>,
        stage_type: u32,
        name: &'static str,
        text: &str,
    ) -> Result<Self> {
        let handle = match unsafe { context.gl().create_shader(stage_type) } {
            Ok(handle) => handle,
            Err(reason) => return CreateStage { stage: name, reason }.fail(),
        };

        let stage = Self { handle, context };
        let gl = stage.context.gl();
        gl_debug_call!(gl, gl.shader_source(stage.handle, text));
        gl_debug_call!(gl, gl.compile_shader(stage.handle));

        let compiled = unsafe { gl.get_shader_compile_status(stage.handle) };
        if !compiled {
            let log = unsafe { gl.get_shader_info_log(stage.handle) };
            error!("Failed to compile the {} shader:\n{}", name, log.trim_end());
            return CompileStage { stage: name, log }.fail();
        }

        Ok(stage)
    }

    fn handle(&self) -> RawShader {
        self.handle
    }
}

impl Drop for ShaderStage {
    fn drop(&mut self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.delete_shader(self.handle));
    }
}

/// A linked program plus the origin label echoed into its diagnostics.
pub struct ShaderProgram {
    handle: RawProgram,
    label: String,
    uniform_locations: UniformLocationCache<RawUniformLocation>,
    context: Arc<GlContext>,
}

impl ShaderProgram {
    pub fn from_file(context: Arc<GlContext>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = ShaderSource::from_file(path)?;
        Self::link(context, &source, path.display().to_string())
    }

    pub fn from_source(context: Arc<GlContext>, text: &str) -> Result<Self> {
        let source = ShaderSource::parse(text);
        Self::link(context, &source, "<embedded>")
    }

    /// Compiles both stages, links them into a program, and validates the
    /// linked result. Compilation fails fast, so nothing is ever attached
    /// or linked against a failed stage, and every handle involved is
    /// released on the way out of any failure.
    pub fn link(
        context: Arc<GlContext>,
        source: &ShaderSource,
        label: impl Into<String>,
    ) -> Result<Self> {
        let label = label.into();
        ensure!(
            !source.vertex.trim().is_empty(),
            MissingStage {
                label: label.as_str(),
                stage: "vertex"
            }
        );
        ensure!(
            !source.fragment.trim().is_empty(),
            MissingStage {
                label: label.as_str(),
                stage: "fragment"
            }
        );

        let vertex =
            ShaderStage::compile(context.clone(), glow::VERTEX_SHADER, "vertex", &source.vertex)?;
        let fragment = ShaderStage::compile(
            context.clone(),
            glow::FRAGMENT_SHADER,
            "fragment",
            &source.fragment,
        )?;

        let handle = match unsafe { context.gl().create_program() } {
            Ok(handle) => handle,
            Err(reason) => return CreateProgram { reason }.fail(),
        };

        let program = Self {
            handle,
            label,
            uniform_locations: UniformLocationCache::default(),
            context,
        };

        let gl = program.context.gl();
        gl_debug_call!(gl, gl.attach_shader(program.handle, vertex.handle()));
        gl_debug_call!(gl, gl.attach_shader(program.handle, fragment.handle()));
        gl_debug_call!(gl, gl.link_program(program.handle));

        let linked = unsafe { gl.get_program_link_status(program.handle) };
        gl_debug_call!(gl, gl.detach_shader(program.handle, vertex.handle()));
        gl_debug_call!(gl, gl.detach_shader(program.handle, fragment.handle()));

        if !linked {
            let log = unsafe { gl.get_program_info_log(program.handle) };
            error!(
                "Failed to link shader program '{}':\n{}",
                program.label,
                log.trim_end()
            );
            return LinkProgram {
                label: program.label.as_str(),
                log,
            }
            .fail();
        }

        gl_debug_call!(gl, gl.validate_program(program.handle));
        let valid = unsafe { gl.get_program_validate_status(program.handle) };
        if !valid {
            let log = unsafe { gl.get_program_info_log(program.handle) };
            error!(
                "Failed to validate shader program '{}':\n{}",
                program.label,
                log.trim_end()
            );
            return ValidateProgram {
                label: program.label.as_str(),
                log,
            }
            .fail();
        }

        Ok(program)
    }

    pub fn bind(&self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.use_program(Some(self.handle)));
    }

    pub fn unbind(&self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.use_program(None));
    }

    pub fn set_uniform_1_i32(&self, name: &str, value: i32) -> Result<()> {
        self.bind();
        let location = self.location(name)?;
        let gl = self.context.gl();
        gl_call!(gl, gl.uniform_1_i32(Some(&location), value)).context(SetUniform { name })?;
        Ok(())
    }

    pub fn set_uniform_1_f32(&self, name: &str, value: f32) -> Result<()> {
        self.bind();
        let location = self.location(name)?;
        let gl = self.context.gl();
        gl_call!(gl, gl.uniform_1_f32(Some(&location), value)).context(SetUniform { name })?;
        Ok(())
    }

    pub fn set_uniform_4_f32(&self, name: &str, x: f32, y: f32, z: f32, w: f32) -> Result<()> {
        self.bind();
        let location = self.location(name)?;
        let gl = self.context.gl();
        gl_call!(gl, gl.uniform_4_f32(Some(&location), x, y, z, w))
            .context(SetUniform { name })?;
        Ok(())
    }

    pub fn set_uniform_mat4(&self, name: &str, matrix: &glm::Mat4) -> Result<()> {
        self.bind();
        let location = self.location(name)?;
        let gl = self.context.gl();
        gl_call!(
            gl,
            gl.uniform_matrix_4_f32_slice(Some(&location), false, matrix.as_slice())
        )
        .context(SetUniform { name })?;
        Ok(())
    }

    pub fn handle(&self) -> RawProgram {
        self.handle
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    // A miss means the linker never saw the name or optimized it out;
    // misses stick for the program's lifetime like hits do.
    fn location(&self, name: &str) -> Result<RawUniformLocation> {
        let gl = self.context.gl();
        self.uniform_locations
            .resolve(name, |name| unsafe {
                gl.get_uniform_location(self.handle, name)
            })
            .context(UniformNotFound {
                name,
                label: self.label.as_str(),
            })
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        let gl = self.context.gl();
        gl_debug_call!(gl, gl.delete_program(self.handle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn cache_consults_the_resolver_once_per_name() {
        let cache: UniformLocationCache<u32> = UniformLocationCache::default();
        let lookups = Cell::new(0);

        for _ in 0..3 {
            let location = cache.resolve("u_Color", |_| {
                lookups.set(lookups.get() + 1);
                Some(7)
            });
            assert_eq!(location, Some(7));
        }

        assert_eq!(lookups.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_remembers_misses() {
        let cache: UniformLocationCache<u32> = UniformLocationCache::default();
        let lookups = Cell::new(0);

        for _ in 0..3 {
            let location = cache.resolve("u_Missing", |_| {
                lookups.set(lookups.get() + 1);
                None
            });
            assert_eq!(location, None);
        }

        assert_eq!(lookups.get(), 1);
    }

    #[test]
    fn cache_tracks_names_independently() {
        let cache: UniformLocationCache<u32> = UniformLocationCache::default();

        assert_eq!(cache.resolve("u_MVP", |_| Some(0)), Some(0));
        assert_eq!(cache.resolve("u_Color", |_| Some(1)), Some(1));
        assert_eq!(cache.resolve("u_MVP", |_| Some(99)), Some(0));
        assert_eq!(cache.len(), 2);
    }
}
