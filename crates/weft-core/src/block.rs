use crate::instructions::Instruction;
use crate::metadata::LoopHints;
use crate::types::Type;
use crate::values::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "block{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub name: String,
    pub params: Vec<BlockParam>,
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
    pub metadata: BlockMetadata,
}

impl BasicBlock {
    pub fn new(id: BlockId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            params: Vec::new(),
            instructions: Vec::new(),
            terminator: Terminator::Invalid,
            metadata: BlockMetadata::default(),
        }
    }

    pub fn add_param(&mut self, param: BlockParam) -> u32 {
        self.params.push(param);
        (self.params.len() - 1) as u32
    }

    pub fn add_instruction(&mut self, inst: Instruction) {
        self.instructions.push(inst);
    }

    pub fn set_terminator(&mut self, term: Terminator) {
        self.terminator = term;
    }

    pub fn is_terminated(&self) -> bool {
        !matches!(self.terminator, Terminator::Invalid)
    }

    pub fn successors(&self) -> Vec<BlockId> {
        self.terminator.successors()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockParam {
    pub name: String,
    pub param_type: Type,
}

impl BlockParam {
    pub fn new(name: impl Into<String>, param_type: Type) -> Self {
        Self {
            name: name.into(),
            param_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Terminator {
    Jump(BlockId, Vec<Value>),
    Branch {
        condition: Value,
        then_block: BlockId,
        then_args: Vec<Value>,
        else_block: BlockId,
        else_args: Vec<Value>,
    },

    Return(Option<Value>),

    Invalid,
}

impl Terminator {
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Jump(target, _) => vec![*target],
            Terminator::Branch {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
            Terminator::Return(_) | Terminator::Invalid => vec![],
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Terminator::Return(_))
    }

    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Terminator::Jump(_, args) => args.iter().collect(),
            Terminator::Branch {
                condition,
                then_args,
                else_args,
                ..
            } => std::iter::once(condition)
                .chain(then_args)
                .chain(else_args)
                .collect(),
            Terminator::Return(value) => value.iter().collect(),
            Terminator::Invalid => vec![],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockMetadata {
    pub is_loop_header: bool,
    pub is_loop_exit: bool,
    pub loop_hints: Option<LoopHints>,
}
