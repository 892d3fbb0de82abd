/*! Cursor-driven construction of IR.
 *
 * Code generators think in terms of "append here, then continue there". `IrBuilder` owns the
 * module being built together with a single insertion cursor, and every emission call reads or
 * moves that cursor. The skeletons in `control_flow` build the standard block shapes for
 * conditionals and counted loops on top of it.
 */

pub mod control_flow;
pub mod cursor;
pub mod inst_builder;

pub use control_flow::{emit_if_then_else, ForLoop, IfData};
pub use cursor::{CursorPosition, InsertPointGuard};

use crate::{
    block::{BasicBlock, BlockId, BlockParam, Terminator},
    function::{FuncId, Function, FunctionBody, FunctionSignature, Linkage},
    instructions::Instruction,
    module::Module,
    types::Type,
    values::Value,
    IrError, Result,
};
use tracing::trace;

pub struct IrBuilder {
    module: Module,
    position: CursorPosition,
}

impl IrBuilder {
    pub fn new(module: Module) -> Self {
        Self {
            module,
            position: CursorPosition::Nowhere,
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    pub fn add_function(&mut self, signature: FunctionSignature, linkage: Linkage) -> Result<FuncId> {
        self.module.add_function(Function::new(signature, linkage))
    }

    pub fn declare_function(&mut self, signature: FunctionSignature) -> Result<FuncId> {
        self.module.declare_function(signature)
    }

    pub fn position(&self) -> CursorPosition {
        self.position
    }

    pub fn set_position(&mut self, position: CursorPosition) {
        self.position = position;
    }

    pub fn clear_position(&mut self) {
        self.position = CursorPosition::Nowhere;
    }

    pub fn position_at_end(&mut self, function: FuncId, block: BlockId) -> Result<()> {
        self.module.function(function)?.body()?.block(block)?;
        self.position = CursorPosition::BlockEnd(function, block);
        Ok(())
    }

    /// Moves the cursor to the end of `block` in the current function.
    pub fn position_at_end_of(&mut self, block: BlockId) -> Result<()> {
        let function = self.current_function()?;
        self.position_at_end(function, block)
    }

    pub fn position_before(&mut self, function: FuncId, block: BlockId, index: usize) -> Result<()> {
        let len = self.module.function(function)?.body()?.block(block)?.instructions.len();
        if index > len {
            return Err(IrError::BuilderError(format!(
                "Instruction index {} out of range for {} ({} instructions)",
                index, block, len
            )));
        }
        self.position = CursorPosition::Before(function, block, index);
        Ok(())
    }

    /// Moves the cursor to the start of the entry block of `function`.
    pub fn position_at_entry(&mut self, function: FuncId) -> Result<()> {
        let entry = self.module.function(function)?.entry_block()?;
        self.position_before(function, entry, 0)
    }

    pub fn current_function(&self) -> Result<FuncId> {
        self.position
            .function()
            .ok_or_else(|| IrError::BuilderError("Cursor not positioned".into()))
    }

    pub fn current_block(&self) -> Result<BlockId> {
        self.position
            .block()
            .ok_or_else(|| IrError::BuilderError("Cursor not positioned".into()))
    }

    pub fn function(&self) -> Result<&Function> {
        self.module.function(self.current_function()?)
    }

    fn body(&self) -> Result<&FunctionBody> {
        self.function()?.body()
    }

    fn body_mut(&mut self) -> Result<&mut FunctionBody> {
        let function = self.current_function()?;
        self.module.function_mut(function)?.body_mut()
    }

    pub fn block(&self, block: BlockId) -> Result<&BasicBlock> {
        self.body()?.block(block)
    }

    pub fn block_mut(&mut self, block: BlockId) -> Result<&mut BasicBlock> {
        self.body_mut()?.block_mut(block)
    }

    /// Creates a block in the current function without moving the cursor.
    pub fn create_block(&mut self, name: impl Into<String>) -> Result<BlockId> {
        Ok(self.body_mut()?.create_block(name))
    }

    pub fn add_block_param(&mut self, block: BlockId, name: &str, ty: Type) -> Result<Value> {
        self.body_mut()?.add_block_param(block, BlockParam::new(name, ty))
    }

    pub fn value_type(&self, value: &Value) -> Result<Type> {
        match value {
            Value::Constant(c) => Ok(c.ty()),
            _ => self.function()?.value_type(value),
        }
    }

    pub fn new_temp(&mut self, ty: Type) -> Result<Value> {
        Ok(self.body_mut()?.new_temp(ty))
    }

    pub fn insert_inst(&mut self, inst: Instruction) -> Result<()> {
        let position = self.position;
        match position {
            CursorPosition::Nowhere => {
                return Err(IrError::BuilderError(
                    "Cannot insert at Nowhere position".into(),
                ));
            }
            CursorPosition::BlockEnd(_, block) => {
                self.block_mut(block)?.instructions.push(inst);
            }
            CursorPosition::Before(function, block, index) => {
                let block_data = self.block_mut(block)?;
                if index > block_data.instructions.len() {
                    return Err(IrError::BuilderError(format!(
                        "Cursor index {} past the end of {}",
                        index, block
                    )));
                }
                block_data.instructions.insert(index, inst);
                self.position = CursorPosition::Before(function, block, index + 1);
            }
        }
        Ok(())
    }

    pub fn is_terminated(&self) -> Result<bool> {
        Ok(self.block(self.current_block()?)?.is_terminated())
    }

    /// Terminates the current block. A block takes exactly one terminator.
    pub fn set_terminator(&mut self, term: Terminator) -> Result<()> {
        let block_id = self.current_block()?;
        let block = self.block_mut(block_id)?;

        if block.is_terminated() {
            return Err(IrError::BuilderError(format!(
                "Block {} already has terminator",
                block_id
            )));
        }

        block.terminator = term;
        Ok(())
    }

    /// Splits the current block at the cursor.
    ///
    /// Everything after the cursor, terminator included, moves into a new block; the current
    /// block is left unterminated and the cursor at its end. Returns the new block.
    pub fn split_block(&mut self, name: impl Into<String>) -> Result<BlockId> {
        let (function, block_id, split_at) = match self.position {
            CursorPosition::BlockEnd(f, b) => (f, b, None),
            CursorPosition::Before(f, b, i) => (f, b, Some(i)),
            CursorPosition::Nowhere => {
                return Err(IrError::BuilderError("Cursor not positioned".into()));
            }
        };

        let body = self.body_mut()?;
        let new_block_id = body.create_block(name);

        let old_block = body.block_mut(block_id)?;
        let moved = match split_at {
            Some(index) if index <= old_block.instructions.len() => {
                old_block.instructions.split_off(index)
            }
            Some(index) => {
                return Err(IrError::BuilderError(format!(
                    "Cannot split {} at {}: past the end",
                    block_id, index
                )));
            }
            None => Vec::new(),
        };
        let terminator = std::mem::replace(&mut old_block.terminator, Terminator::Invalid);

        let new_block = body.block_mut(new_block_id)?;
        new_block.instructions = moved;
        new_block.terminator = terminator;

        trace!(from = %block_id, to = %new_block_id, "split block");

        self.position = CursorPosition::BlockEnd(function, block_id);
        Ok(new_block_id)
    }

    pub fn guard(&mut self) -> InsertPointGuard<'_> {
        InsertPointGuard::new(self)
    }
}
