//! Minimal error-checked OpenGL abstraction layer.
//!
//! This crate owns the checked-call wrapper and the single-owner objects
//! for buffers, vertex arrays, and shader programs built on top of it.

pub mod renderer;

pub use self::renderer::{
    byte_slice_from,
    opengl::{
        core::call::{checked, checked_with, collect_error_codes, debug_checked, drain_error_codes},
        AttributeKind, GlContext, GlErrorCode, IndexBuffer, Renderer, ShaderProgram, ShaderSource,
        ShaderSourceBuilder, UniformLocationCache, VertexArray, VertexAttribute, VertexBuffer,
        VertexLayout,
    },
};
