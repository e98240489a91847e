#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    Float,
    UnsignedInt,
    UnsignedByte,
}

impl AttributeKind {
    pub fn size_bytes(self) -> u32 {
        match self {
            AttributeKind::Float => 4,
            AttributeKind::UnsignedInt => 4,
            AttributeKind::UnsignedByte => 1,
        }
    }

    pub fn gl_type(self) -> u32 {
        match self {
            AttributeKind::Float => glow::FLOAT,
            AttributeKind::UnsignedInt => glow::UNSIGNED_INT,
            AttributeKind::UnsignedByte => glow::UNSIGNED_BYTE,
        }
    }

    // Byte data is normalized to [0, 1] when fed to float attributes.
    pub fn normalized(self) -> bool {
        matches!(self, AttributeKind::UnsignedByte)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct VertexAttribute {
    pub kind: AttributeKind,
    pub count: u32,
    pub normalized: bool,
    pub offset: u32,
}

impl VertexAttribute {
    pub fn size_bytes(&self) -> u32 {
        self.count * self.kind.size_bytes()
    }
}

/// Host-side description of how the bytes of one vertex are carved into
/// attributes. Nothing here touches the GPU.
#[derive(Clone, Debug, Default)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: u32,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` components of `kind` at the current end of the
    /// vertex record.
    pub fn push(&mut self, kind: AttributeKind, count: u32) -> &mut Self {
        let attribute = VertexAttribute {
            kind,
            count,
            normalized: kind.normalized(),
            offset: self.stride,
        };
        self.stride += attribute.size_bytes();
        self.attributes.push(attribute);
        self
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    // Total bytes per vertex.
    pub fn stride(&self) -> u32 {
        self.stride
    }
}
