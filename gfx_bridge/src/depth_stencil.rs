/// Client depth-stencil state and its translation to the device description

use crate::device::{CompareOp, DepthStencilDesc, StencilOp, StencilOpState};

/// Stencil test configuration of one face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilDescriptor {
    pub stencil_compare_function: CompareOp,
    pub stencil_failure_operation: StencilOp,
    pub depth_failure_operation: StencilOp,
    pub depth_stencil_pass_operation: StencilOp,
    pub read_mask: u32,
    pub write_mask: u32,
}

impl Default for StencilDescriptor {
    fn default() -> Self {
        Self {
            stencil_compare_function: CompareOp::Always,
            stencil_failure_operation: StencilOp::Keep,
            depth_failure_operation: StencilOp::Keep,
            depth_stencil_pass_operation: StencilOp::Keep,
            read_mask: 0xFF,
            write_mask: 0xFF,
        }
    }
}

impl StencilDescriptor {
    fn to_op_state(self, reference: u32) -> StencilOpState {
        StencilOpState {
            fail_op: self.stencil_failure_operation,
            pass_op: self.depth_stencil_pass_operation,
            depth_fail_op: self.depth_failure_operation,
            compare_op: self.stencil_compare_function,
            compare_mask: self.read_mask,
            write_mask: self.write_mask,
            reference,
        }
    }
}

/// Client depth-stencil description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilDescriptor {
    pub depth_test_enabled: bool,
    pub depth_write_enabled: bool,
    pub depth_compare_function: CompareOp,
    pub stencil_test_enabled: bool,
    pub front_face_stencil: StencilDescriptor,
    pub back_face_stencil: StencilDescriptor,
}

impl Default for DepthStencilDescriptor {
    fn default() -> Self {
        Self {
            depth_test_enabled: false,
            depth_write_enabled: false,
            depth_compare_function: CompareOp::Less,
            stencil_test_enabled: false,
            front_face_stencil: StencilDescriptor::default(),
            back_face_stencil: StencilDescriptor::default(),
        }
    }
}

/// Immutable depth-stencil state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilState {
    desc: DepthStencilDescriptor,
}

impl DepthStencilState {
    pub fn new(desc: DepthStencilDescriptor) -> Self {
        Self { desc }
    }

    pub fn descriptor(&self) -> &DepthStencilDescriptor {
        &self.desc
    }

    pub fn is_depth_enabled(&self) -> bool {
        self.desc.depth_test_enabled
    }

    pub fn is_stencil_enabled(&self) -> bool {
        self.desc.stencil_test_enabled
    }

    /// Fill a device description, using the given stencil reference values
    pub fn apply(&self, out: &mut DepthStencilDesc, front_ref: u32, back_ref: u32) {
        out.depth_test_enable = self.desc.depth_test_enabled;
        out.depth_write_enable = self.desc.depth_write_enabled;
        out.depth_compare_op = self.desc.depth_compare_function;
        out.stencil_test_enable = self.desc.stencil_test_enabled;
        out.front = self.desc.front_face_stencil.to_op_state(front_ref);
        out.back = self.desc.back_face_stencil.to_op_state(back_ref);
    }

    /// Reset a device description to depth and stencil disabled
    pub fn reset(out: &mut DepthStencilDesc) {
        *out = DepthStencilDesc::disabled();
    }
}
