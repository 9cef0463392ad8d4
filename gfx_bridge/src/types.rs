/// Client-facing enums of the drawing protocol and their device mappings

use crate::device::{FrontFace, PrimitiveTopology};

/// Primitive type requested by a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Point,
    Line,
    LineStrip,
    Triangle,
    TriangleStrip,
}

impl PrimitiveType {
    pub fn to_topology(self) -> PrimitiveTopology {
        match self {
            PrimitiveType::Point => PrimitiveTopology::PointList,
            PrimitiveType::Line => PrimitiveTopology::LineList,
            PrimitiveType::LineStrip => PrimitiveTopology::LineStrip,
            PrimitiveType::Triangle => PrimitiveTopology::TriangleList,
            PrimitiveType::TriangleStrip => PrimitiveTopology::TriangleStrip,
        }
    }
}

/// Vertex winding of front faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winding {
    Clockwise,
    #[default]
    CounterClockwise,
}

impl Winding {
    pub fn to_front_face(self) -> FrontFace {
        match self {
            Winding::Clockwise => FrontFace::Clockwise,
            Winding::CounterClockwise => FrontFace::CounterClockwise,
        }
    }
}
