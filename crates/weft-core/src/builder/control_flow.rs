use super::IrBuilder;
use crate::{
    block::{BlockId, Terminator},
    function::FuncId,
    metadata::LoopHints,
    types::Type,
    values::Value,
    IrError, Result,
};
use tracing::trace;

/// Blocks of an if/then/else diamond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfData {
    pub function: FuncId,
    pub true_block: BlockId,
    pub false_block: BlockId,
    pub after_block: BlockId,
}

/// Splits the current block at the cursor and branches on `condition`.
///
/// Both arms jump to `after_block`, which receives whatever followed the cursor (terminator
/// included). The cursor is left at the end of `after_block`.
pub fn emit_if_then_else(builder: &mut IrBuilder, condition: Value, name: &str) -> Result<IfData> {
    let ty = builder.value_type(&condition)?;
    if !ty.is_bool() {
        return Err(IrError::TypeError(format!(
            "If condition must be bool, found {}",
            ty
        )));
    }

    let function = builder.current_function()?;
    let prefix = if name.is_empty() { "if" } else { name };
    let true_block = builder.create_block(format!("{}.true", prefix))?;
    let false_block = builder.create_block(format!("{}.false", prefix))?;
    let after_block = builder.split_block(format!("{}.after", prefix))?;

    builder.branch(condition, true_block, false_block)?;
    builder
        .block_mut(true_block)?
        .set_terminator(Terminator::Jump(after_block, Vec::new()));
    builder
        .block_mut(false_block)?
        .set_terminator(Terminator::Jump(after_block, Vec::new()));

    builder.position_at_end(function, after_block)?;

    trace!(%true_block, %false_block, %after_block, "emitted if-then-else");

    Ok(IfData {
        function,
        true_block,
        false_block,
        after_block,
    })
}

/// A counted loop `for (i = start; i < end; i += step)` with a real back edge.
///
/// ```text
/// preheader:      jump header(start)
/// header(i):      done = ge i, end; branch done, exit, body
/// body:           jump latch
/// latch:          next = add i, step; jump header(next)
/// exit:           <code that followed the cursor>
/// ```
#[derive(Debug, Clone)]
pub struct ForLoop {
    pub name: String,
    pub function: FuncId,
    pub preheader: BlockId,
    pub header: BlockId,
    pub body: BlockId,
    pub latch: BlockId,
    pub exit: BlockId,
    pub indvar: Value,
    pub hints: LoopHints,
}

impl ForLoop {
    /// Builds the loop at the cursor and leaves the cursor at the end of the exit block.
    pub fn emit(
        builder: &mut IrBuilder,
        name: &str,
        start: Value,
        end: Value,
        step: Value,
        hints: LoopHints,
    ) -> Result<Self> {
        let ty = Self::bounds_type(builder, name, &start, &end, &step)?;

        let function = builder.current_function()?;
        let preheader = builder.current_block()?;
        let header = builder.create_block(format!("{}.header", name))?;
        let body = builder.create_block(format!("{}.body", name))?;
        let latch = builder.create_block(format!("{}.latch", name))?;
        let exit = builder.split_block(format!("{}.exit", name))?;

        let indvar = builder.add_block_param(header, "indvar", ty)?;
        builder.jump(header, vec![start])?;

        builder.position_at_end(function, header)?;
        let done = builder.ge(indvar.clone(), end)?;
        builder.set_terminator(Terminator::Branch {
            condition: done,
            then_block: exit,
            then_args: Vec::new(),
            else_block: body,
            else_args: Vec::new(),
        })?;

        builder.position_at_end(function, body)?;
        builder.jump(latch, Vec::new())?;

        builder.position_at_end(function, latch)?;
        let next = builder.add(indvar.clone(), step)?;
        builder.jump(header, vec![next])?;

        builder.block_mut(header)?.metadata.is_loop_header = true;
        builder.block_mut(exit)?.metadata.is_loop_exit = true;
        builder.block_mut(latch)?.metadata.loop_hints = Some(hints);

        builder.position_at_end(function, exit)?;

        trace!(loop_name = name, %header, %body, %exit, "emitted for loop");

        Ok(Self {
            name: name.to_string(),
            function,
            preheader,
            header,
            body,
            latch,
            exit,
            indvar,
            hints,
        })
    }

    /// Common integer type of the loop bounds, or a `TypeError` if they disagree.
    pub fn bounds_type(
        builder: &IrBuilder,
        name: &str,
        start: &Value,
        end: &Value,
        step: &Value,
    ) -> Result<Type> {
        let ty = builder.value_type(start)?;
        if !ty.is_integer() {
            return Err(IrError::TypeError(format!(
                "Loop bounds must be integers, found {}",
                ty
            )));
        }
        for bound in [end, step] {
            let bound_ty = builder.value_type(bound)?;
            if bound_ty != ty {
                return Err(IrError::TypeError(format!(
                    "Loop {} mixes {} and {}",
                    name, ty, bound_ty
                )));
            }
        }
        Ok(ty)
    }

    pub fn body_block(&self) -> BlockId {
        self.body
    }

    pub fn exit_block(&self) -> BlockId {
        self.exit
    }

    pub fn indvar(&self) -> &Value {
        &self.indvar
    }
}
