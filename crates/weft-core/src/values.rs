use crate::block::BlockId;
use crate::types::Type;
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Temp(TempId),
    Param(ParamId),
    BlockParam(BlockParamId),
    Constant(Constant),
}

impl Value {
    pub fn is_constant(&self) -> bool {
        matches!(self, Value::Constant(_))
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Value::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn bool(value: bool) -> Self {
        Value::Constant(Constant::Bool(value))
    }

    pub fn int(value: i64, bits: u16) -> Self {
        Value::Constant(Constant::Int(BigInt::from(value), bits))
    }

    pub fn uint(value: u64, bits: u16) -> Self {
        Value::Constant(Constant::Uint(BigUint::from(value), bits))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Temp(t) => write!(f, "{}", t),
            Value::Param(p) => write!(f, "{}", p),
            Value::BlockParam(bp) => write!(f, "{}", bp),
            Value::Constant(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TempId(pub u32);

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamId(pub u32);

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockParamId {
    pub block: BlockId,
    pub index: u32,
}

impl fmt::Display for BlockParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.block, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    Bool(bool),
    Int(BigInt, u16),
    Uint(BigUint, u16),
}

impl Constant {
    pub fn ty(&self) -> Type {
        match self {
            Constant::Bool(_) => Type::Bool,
            Constant::Int(_, bits) => Type::Int(*bits),
            Constant::Uint(_, bits) => Type::Uint(*bits),
        }
    }

    pub fn zero(ty: &Type) -> Option<Self> {
        match ty {
            Type::Bool => Some(Constant::Bool(false)),
            Type::Int(bits) => Some(Constant::Int(BigInt::from(0), *bits)),
            Type::Uint(bits) => Some(Constant::Uint(BigUint::from(0u32), *bits)),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Constant::Bool(b) => Some(i128::from(*b)),
            Constant::Int(val, _) => val.to_i128(),
            Constant::Uint(val, _) => val.to_i128(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Constant::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Int(val, bits) => write!(f, "{}i{}", val, bits),
            Constant::Uint(val, bits) => write!(f, "{}u{}", val, bits),
        }
    }
}
