/*! Unified interface for structured IR emission.
 *
 * Single import for everything you need: building IR with the cursor-driven builder, emitting
 * conditionals, counted loops and outlined kernels on top of it, checking the result, and
 * printing it as text.
 */

pub use weft_core as core;
pub use weft_emit as emit;
pub use weft_kernel as kernel;

pub use weft_core::{
    analysis::{verify_module, ControlFlowGraph},
    block::{BasicBlock, BlockId, Terminator},
    function::{Function, FunctionSignature, Linkage},
    instructions::Instruction,
    types::Type,
    values::Value,
    IrBuilder, IrError, LoopHints, Module,
};

pub use weft_emit::{EmitterConfig, TextEmitter};

pub use weft_kernel::KernelSupportLibrary;

/// Verifies `module` and renders it with the default text emitter.
pub fn render_verified(module: &Module) -> anyhow::Result<String> {
    verify_module(module)?;
    TextEmitter::default().render(module)
}
