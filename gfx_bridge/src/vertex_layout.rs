/// Client-declared vertex layout
///
/// A program state may carry a layout describing how its vertex buffer is
/// interleaved. When present and valid it takes precedence over the attributes
/// reflected from the shader.

use std::collections::BTreeMap;

use crate::device::{BufferFormat, VertexAttribute};

/// Client vertex element format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float,
    Float2,
    Float3,
    Float4,
    Int,
    Int2,
    Int3,
    Int4,
    Short2,
    Short4,
    UShort2,
    UByte4,
}

impl VertexFormat {
    pub fn to_buffer_format(self) -> BufferFormat {
        match self {
            VertexFormat::Float => BufferFormat::R32_SFLOAT,
            VertexFormat::Float2 => BufferFormat::R32G32_SFLOAT,
            VertexFormat::Float3 => BufferFormat::R32G32B32_SFLOAT,
            VertexFormat::Float4 => BufferFormat::R32G32B32A32_SFLOAT,
            VertexFormat::Int => BufferFormat::R32_SINT,
            VertexFormat::Int2 => BufferFormat::R32G32_SINT,
            VertexFormat::Int3 => BufferFormat::R32G32B32_SINT,
            VertexFormat::Int4 => BufferFormat::R32G32B32A32_SINT,
            VertexFormat::Short2 => BufferFormat::R16G16_SINT,
            VertexFormat::Short4 => BufferFormat::R16G16B16A16_SINT,
            VertexFormat::UShort2 => BufferFormat::R16G16_UINT,
            VertexFormat::UByte4 => BufferFormat::R8G8B8A8_UINT,
        }
    }

    pub fn size_bytes(self) -> u32 {
        self.to_buffer_format().size_bytes()
    }
}

/// One named attribute of a vertex layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayoutAttribute {
    pub name: String,
    /// Shader input location
    pub index: u32,
    pub format: VertexFormat,
    /// Byte offset inside one vertex
    pub offset: u32,
    pub normalized: bool,
}

/// Interleaved vertex layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexLayoutAttribute>,
    stride: u32,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or replace, by name) an attribute
    pub fn set_attribute(
        &mut self,
        name: &str,
        index: u32,
        format: VertexFormat,
        offset: u32,
        normalized: bool,
    ) -> &mut Self {
        let attribute = VertexLayoutAttribute {
            name: name.to_string(),
            index,
            format,
            offset,
            normalized,
        };
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
        self
    }

    pub fn set_stride(&mut self, stride: u32) -> &mut Self {
        self.stride = stride;
        self
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn attributes(&self) -> &[VertexLayoutAttribute] {
        &self.attributes
    }

    /// A layout is usable once its stride is known
    pub fn is_valid(&self) -> bool {
        self.stride != 0
    }

    /// Device attributes ordered by byte offset
    ///
    /// Attributes whose index is not below the attribute count are dropped.
    /// Returns an empty list for invalid or empty layouts.
    pub fn to_vertex_attributes(&self) -> Vec<VertexAttribute> {
        if !self.is_valid() || self.attributes.is_empty() {
            return Vec::new();
        }
        let count = self.attributes.len() as u32;
        let mut by_offset: BTreeMap<u32, VertexAttribute> = BTreeMap::new();
        for attribute in &self.attributes {
            if attribute.index >= count {
                continue;
            }
            by_offset.insert(
                attribute.offset,
                VertexAttribute {
                    name: attribute.name.clone(),
                    location: attribute.index,
                    format: attribute.format.to_buffer_format(),
                    normalized: attribute.normalized,
                    offset: attribute.offset,
                },
            );
        }
        by_offset.into_values().collect()
    }
}

#[cfg(test)]
#[path = "vertex_layout_tests.rs"]
mod tests;
