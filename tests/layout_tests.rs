//! Vertex Layout Tests
//!
//! Tests for:
//! - VertexLayout stride accumulation and per-attribute byte offsets
//! - AttributeKind GL type constants, component sizes, normalization
//! - The single vec2-per-vertex layout used for flat quads

use glint::{AttributeKind, VertexLayout};

#[test]
fn layout_empty_has_zero_stride() {
    let layout = VertexLayout::new();
    assert_eq!(layout.stride(), 0);
    assert!(layout.attributes().is_empty());
}

#[test]
fn layout_stride_sums_component_sizes() {
    let mut layout = VertexLayout::new();
    layout.push(AttributeKind::Float, 3);
    layout.push(AttributeKind::Float, 2);
    layout.push(AttributeKind::UnsignedByte, 4);

    // 3 * 4 + 2 * 4 + 4 * 1
    assert_eq!(layout.stride(), 24);
}

#[test]
fn layout_offsets_are_prefix_sums() {
    let mut layout = VertexLayout::new();
    layout.push(AttributeKind::Float, 3);
    layout.push(AttributeKind::UnsignedByte, 4);
    layout.push(AttributeKind::Float, 2);

    let attributes = layout.attributes();
    assert_eq!(attributes[0].offset, 0);
    assert_eq!(attributes[1].offset, 12);
    assert_eq!(attributes[2].offset, 16);
    assert_eq!(layout.stride(), 24);
}

#[test]
fn layout_single_vec2_attribute_describes_a_flat_quad() {
    let mut layout = VertexLayout::new();
    layout.push(AttributeKind::Float, 2);

    assert_eq!(layout.stride(), 8);

    let attribute = &layout.attributes()[0];
    assert_eq!(attribute.count, 2);
    assert_eq!(attribute.offset, 0);
    assert_eq!(attribute.kind, AttributeKind::Float);
    assert!(!attribute.normalized);
}

#[test]
fn layout_push_chains() {
    let mut layout = VertexLayout::new();
    layout
        .push(AttributeKind::Float, 2)
        .push(AttributeKind::Float, 2);

    assert_eq!(layout.attributes().len(), 2);
    assert_eq!(layout.stride(), 16);
}

#[test]
fn attribute_bytes_normalize_by_default() {
    let mut layout = VertexLayout::new();
    layout.push(AttributeKind::UnsignedByte, 4);
    layout.push(AttributeKind::UnsignedInt, 1);

    assert!(layout.attributes()[0].normalized);
    assert!(!layout.attributes()[1].normalized);
}

#[test]
fn attribute_kind_gl_types_and_sizes() {
    assert_eq!(AttributeKind::Float.gl_type(), glow::FLOAT);
    assert_eq!(AttributeKind::UnsignedInt.gl_type(), glow::UNSIGNED_INT);
    assert_eq!(AttributeKind::UnsignedByte.gl_type(), glow::UNSIGNED_BYTE);

    assert_eq!(AttributeKind::Float.size_bytes(), 4);
    assert_eq!(AttributeKind::UnsignedInt.size_bytes(), 4);
    assert_eq!(AttributeKind::UnsignedByte.size_bytes(), 1);
}
