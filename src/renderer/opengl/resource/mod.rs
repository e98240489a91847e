pub use self::{
    buffer::{IndexBuffer, VertexBuffer},
    layout::{AttributeKind, VertexAttribute, VertexLayout},
    shader::{ShaderProgram, ShaderSource, ShaderSourceBuilder, UniformLocationCache},
    vertex_array::VertexArray,
};

pub mod buffer;
pub mod layout;
pub mod shader;
pub mod vertex_array;
