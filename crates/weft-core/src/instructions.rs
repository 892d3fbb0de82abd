use crate::types::Type;
use crate::values::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    Add {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Sub {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Mul {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },

    Eq {
        result: Value,
        left: Value,
        right: Value,
    },
    Ne {
        result: Value,
        left: Value,
        right: Value,
    },
    Lt {
        result: Value,
        left: Value,
        right: Value,
    },
    Le {
        result: Value,
        left: Value,
        right: Value,
    },
    Gt {
        result: Value,
        left: Value,
        right: Value,
    },
    Ge {
        result: Value,
        left: Value,
        right: Value,
    },

    Call {
        callee: String,
        args: Vec<Value>,
    },
}

impl Instruction {
    pub fn result(&self) -> Option<&Value> {
        match self {
            Instruction::Add { result, .. }
            | Instruction::Sub { result, .. }
            | Instruction::Mul { result, .. }
            | Instruction::Eq { result, .. }
            | Instruction::Ne { result, .. }
            | Instruction::Lt { result, .. }
            | Instruction::Le { result, .. }
            | Instruction::Gt { result, .. }
            | Instruction::Ge { result, .. } => Some(result),
            Instruction::Call { .. } => None,
        }
    }

    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Instruction::Add { left, right, .. }
            | Instruction::Sub { left, right, .. }
            | Instruction::Mul { left, right, .. }
            | Instruction::Eq { left, right, .. }
            | Instruction::Ne { left, right, .. }
            | Instruction::Lt { left, right, .. }
            | Instruction::Le { left, right, .. }
            | Instruction::Gt { left, right, .. }
            | Instruction::Ge { left, right, .. } => vec![left, right],
            Instruction::Call { args, .. } => args.iter().collect(),
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Instruction::Call { .. })
    }

    pub fn callee(&self) -> Option<&str> {
        match self {
            Instruction::Call { callee, .. } => Some(callee),
            _ => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Instruction::Eq { .. }
                | Instruction::Ne { .. }
                | Instruction::Lt { .. }
                | Instruction::Le { .. }
                | Instruction::Gt { .. }
                | Instruction::Ge { .. }
        )
    }

    pub fn opcode(&self) -> &'static str {
        match self {
            Instruction::Add { .. } => "add",
            Instruction::Sub { .. } => "sub",
            Instruction::Mul { .. } => "mul",
            Instruction::Eq { .. } => "eq",
            Instruction::Ne { .. } => "ne",
            Instruction::Lt { .. } => "lt",
            Instruction::Le { .. } => "le",
            Instruction::Gt { .. } => "gt",
            Instruction::Ge { .. } => "ge",
            Instruction::Call { .. } => "call",
        }
    }
}
