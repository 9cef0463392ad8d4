/// Input assembler - vertex attributes plus the buffers they are read from

use std::sync::Arc;
use crate::device::{Buffer, VertexAttribute};

/// Descriptor for creating an input assembler
#[derive(Clone, Default)]
pub struct InputAssemblerDesc {
    pub attributes: Vec<VertexAttribute>,
    pub vertex_buffers: Vec<Arc<dyn Buffer>>,
    pub index_buffer: Option<Arc<dyn Buffer>>,
}

/// Input assembler resource trait
///
/// Holds strong references to its buffers.
pub trait InputAssembler: Send + Sync {
    fn attributes(&self) -> &[VertexAttribute];

    fn vertex_buffers(&self) -> &[Arc<dyn Buffer>];

    fn index_buffer(&self) -> Option<&Arc<dyn Buffer>>;
}

/// Parameters of one draw call
///
/// Non-indexed draws use `vertex_count`/`first_vertex`,
/// indexed draws use `index_count`/`first_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawInfo {
    pub vertex_count: u32,
    pub first_vertex: u32,
    pub index_count: u32,
    pub first_index: u32,
    pub instance_count: u32,
}

impl DrawInfo {
    /// Non-indexed draw
    pub fn vertices(vertex_count: u32, first_vertex: u32) -> Self {
        Self {
            vertex_count,
            first_vertex,
            index_count: 0,
            first_index: 0,
            instance_count: 1,
        }
    }

    /// Indexed draw
    pub fn indexed(index_count: u32, first_index: u32) -> Self {
        Self {
            vertex_count: 0,
            first_vertex: 0,
            index_count,
            first_index,
            instance_count: 1,
        }
    }

    /// Returns true for indexed draws
    pub fn is_indexed(&self) -> bool {
        self.index_count > 0
    }
}
