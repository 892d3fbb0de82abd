/*! Core IR types and the cursor-driven builder.
 *
 * Structured emitters need a small, predictable substrate: typed values, basic blocks that end
 * in exactly one terminator, functions registered by name, and a builder whose insertion cursor
 * says where the next instruction goes. This crate provides that substrate together with the
 * if/then/else and counted-loop skeletons, a verifier, and a reference interpreter for checking
 * emitted code by running it.
 */

pub mod analysis;
pub mod block;
pub mod builder;
pub mod function;
pub mod instructions;
pub mod interp;
pub mod ir_persist;
pub mod metadata;
pub mod module;
pub mod types;
pub mod values;

pub use block::{BasicBlock, BlockId, BlockParam, Terminator};
pub use builder::{CursorPosition, ForLoop, IfData, InsertPointGuard, IrBuilder};
pub use function::{FuncId, Function, FunctionBody, FunctionSignature, Linkage};
pub use instructions::Instruction;
pub use metadata::LoopHints;
pub use module::Module;
pub use types::Type;
pub use values::{Constant, Value};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Builder error: {0}")]
    BuilderError(String),
    #[error("Function not found: {0}")]
    FunctionNotFound(String),
    #[error("Signature mismatch for {name}: expected ({expected}), found ({found})")]
    SignatureMismatch {
        name: String,
        expected: String,
        found: String,
    },
    #[error("Verification failed: {0}")]
    VerificationError(String),
    #[error("Interpreter error: {0}")]
    InterpreterError(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
