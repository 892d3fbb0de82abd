use super::IrBuilder;
use crate::{block::BlockId, function::FuncId};
use std::ops::{Deref, DerefMut};

/// Where the next instruction lands.
///
/// Terminators live outside the instruction list, so `BlockEnd` is also "just before the
/// terminator" when the block already has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorPosition {
    #[default]
    Nowhere,
    BlockEnd(FuncId, BlockId),
    Before(FuncId, BlockId, usize),
}

impl CursorPosition {
    pub fn function(&self) -> Option<FuncId> {
        match self {
            CursorPosition::Nowhere => None,
            CursorPosition::BlockEnd(f, _) | CursorPosition::Before(f, _, _) => Some(*f),
        }
    }

    pub fn block(&self) -> Option<BlockId> {
        match self {
            CursorPosition::Nowhere => None,
            CursorPosition::BlockEnd(_, b) | CursorPosition::Before(_, b, _) => Some(*b),
        }
    }
}

/// Restores the builder's cursor when dropped.
///
/// Dereferences to the builder, so code running under the guard may move the cursor freely.
/// The saved position is a plain index: instructions inserted ahead of it in the same block
/// while the guard is alive shift what it points at.
pub struct InsertPointGuard<'a> {
    builder: &'a mut IrBuilder,
    saved: CursorPosition,
}

impl<'a> InsertPointGuard<'a> {
    pub(super) fn new(builder: &'a mut IrBuilder) -> Self {
        let saved = builder.position();
        Self { builder, saved }
    }

    pub fn saved_position(&self) -> CursorPosition {
        self.saved
    }
}

impl Deref for InsertPointGuard<'_> {
    type Target = IrBuilder;

    fn deref(&self) -> &IrBuilder {
        self.builder
    }
}

impl DerefMut for InsertPointGuard<'_> {
    fn deref_mut(&mut self) -> &mut IrBuilder {
        self.builder
    }
}

impl Drop for InsertPointGuard<'_> {
    fn drop(&mut self) {
        self.builder.set_position(self.saved);
    }
}
