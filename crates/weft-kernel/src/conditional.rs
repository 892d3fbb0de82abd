use crate::support::KernelSupportLibrary;
use weft_core::{builder::emit_if_then_else, Result, Value};

impl KernelSupportLibrary<'_> {
    /// Emits `if condition { true_gen } else { false_gen }`.
    ///
    /// Both arms are always materialized, constant conditions included. Each generator runs
    /// with the cursor at the end of its arm; afterwards the cursor sits at the end of the merge
    /// block.
    pub fn emit_if<T, F>(&mut self, condition: Value, true_gen: T, false_gen: F) -> Result<()>
    where
        T: FnOnce(&mut Self) -> Result<()>,
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let diamond = emit_if_then_else(self.builder, condition, "")?;

        self.builder
            .position_at_end(diamond.function, diamond.true_block)?;
        true_gen(self)?;

        self.builder
            .position_at_end(diamond.function, diamond.false_block)?;
        false_gen(self)?;

        self.builder
            .position_at_end(diamond.function, diamond.after_block)
    }

    /// Emits `if condition { true_gen }` with an empty false arm.
    pub fn emit_if_then<T>(&mut self, condition: Value, true_gen: T) -> Result<()>
    where
        T: FnOnce(&mut Self) -> Result<()>,
    {
        self.emit_if(condition, true_gen, |_| Ok(()))
    }
}
