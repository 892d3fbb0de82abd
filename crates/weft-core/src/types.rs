use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    Bool,
    Int(u16),
    Uint(u16),
    Pointer(Box<Type>),
}

impl Type {
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int(_) | Type::Uint(_))
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Type::Int(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn bits(&self) -> Option<u16> {
        match self {
            Type::Bool => Some(1),
            Type::Int(bits) | Type::Uint(bits) => Some(*bits),
            Type::Pointer(_) => Some(64),
            Type::Void => None,
        }
    }

    /// Inclusive range representable by an integer type, clamped to `i128`.
    pub fn int_range(&self) -> Option<(i128, i128)> {
        match self {
            Type::Int(0) | Type::Uint(0) => Some((0, 0)),
            Type::Int(bits) if *bits >= 128 => Some((i128::MIN, i128::MAX)),
            Type::Int(bits) => {
                let half = 1i128 << (bits - 1);
                Some((-half, half - 1))
            }
            Type::Uint(bits) if *bits >= 127 => Some((0, i128::MAX)),
            Type::Uint(bits) => Some((0, (1i128 << bits) - 1)),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Bool => write!(f, "bool"),
            Type::Int(bits) => write!(f, "i{}", bits),
            Type::Uint(bits) => write!(f, "u{}", bits),
            Type::Pointer(inner) => write!(f, "ptr<{}>", inner),
        }
    }
}
