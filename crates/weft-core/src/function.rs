use crate::block::{BasicBlock, BlockId, BlockParam};
use crate::types::Type;
use crate::values::{BlockParamId, ParamId, TempId, Value};
use crate::{IrError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FuncId(pub u32);

impl std::fmt::Display for FuncId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Linkage {
    External,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<Type>,
    pub returns: Option<Type>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, params: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            params,
            returns: None,
        }
    }

    pub fn returning(mut self, ty: Type) -> Self {
        self.returns = Some(ty);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub signature: FunctionSignature,
    pub linkage: Linkage,
    /// `None` for declarations resolved outside the module.
    pub body: Option<FunctionBody>,
}

impl Function {
    pub fn new(signature: FunctionSignature, linkage: Linkage) -> Self {
        Self {
            signature,
            linkage,
            body: Some(FunctionBody::new()),
        }
    }

    pub fn declaration(signature: FunctionSignature) -> Self {
        Self {
            signature,
            linkage: Linkage::External,
            body: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn is_declaration(&self) -> bool {
        self.body.is_none()
    }

    pub fn body(&self) -> Result<&FunctionBody> {
        self.body.as_ref().ok_or_else(|| {
            IrError::BuilderError(format!("Function {} is a declaration", self.name()))
        })
    }

    pub fn body_mut(&mut self) -> Result<&mut FunctionBody> {
        let name = self.signature.name.clone();
        self.body
            .as_mut()
            .ok_or_else(|| IrError::BuilderError(format!("Function {} is a declaration", name)))
    }

    pub fn entry_block(&self) -> Result<BlockId> {
        Ok(self.body()?.entry_block)
    }

    pub fn param_values(&self) -> Vec<Value> {
        (0..self.signature.params.len())
            .map(|i| Value::Param(ParamId(i as u32)))
            .collect()
    }

    /// Type of a value as seen from inside this function.
    pub fn value_type(&self, value: &Value) -> Result<Type> {
        match value {
            Value::Constant(c) => Ok(c.ty()),
            Value::Param(ParamId(index)) => self
                .signature
                .params
                .get(*index as usize)
                .cloned()
                .ok_or_else(|| {
                    IrError::TypeError(format!(
                        "Function {} has no parameter {}",
                        self.name(),
                        index
                    ))
                }),
            Value::Temp(id) => self.body()?.temp_type(*id).cloned().ok_or_else(|| {
                IrError::TypeError(format!("Value {} is not defined in {}", id, self.name()))
            }),
            Value::BlockParam(id) => self.body()?.block_param_type(*id).cloned().ok_or_else(|| {
                IrError::TypeError(format!("Block parameter {} not found in {}", id, self.name()))
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionBody {
    pub entry_block: BlockId,
    pub blocks: IndexMap<BlockId, BasicBlock>,
    temp_types: HashMap<TempId, Type>,
    next_block_id: u32,
    next_temp_id: u32,
}

impl FunctionBody {
    pub fn new() -> Self {
        let entry_block = BlockId(0);
        let mut blocks = IndexMap::new();
        blocks.insert(entry_block, BasicBlock::new(entry_block, "entry"));

        Self {
            entry_block,
            blocks,
            temp_types: HashMap::new(),
            next_block_id: 1,
            next_temp_id: 0,
        }
    }

    pub fn create_block(&mut self, name: impl Into<String>) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        self.blocks.insert(id, BasicBlock::new(id, name));
        id
    }

    pub fn get_block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(&id)
    }

    pub fn get_block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        self.blocks.get_mut(&id)
    }

    pub fn block(&self, id: BlockId) -> Result<&BasicBlock> {
        self.get_block(id)
            .ok_or_else(|| IrError::BuilderError(format!("Block {} not found", id)))
    }

    pub fn block_mut(&mut self, id: BlockId) -> Result<&mut BasicBlock> {
        self.get_block_mut(id)
            .ok_or_else(|| IrError::BuilderError(format!("Block {} not found", id)))
    }

    pub fn entry_block(&self) -> BlockId {
        self.entry_block
    }

    pub fn new_temp(&mut self, ty: Type) -> Value {
        let id = TempId(self.next_temp_id);
        self.next_temp_id += 1;
        self.temp_types.insert(id, ty);
        Value::Temp(id)
    }

    pub fn temp_type(&self, id: TempId) -> Option<&Type> {
        self.temp_types.get(&id)
    }

    pub fn add_block_param(&mut self, block: BlockId, param: BlockParam) -> Result<Value> {
        let index = self.block_mut(block)?.add_param(param);
        Ok(Value::BlockParam(BlockParamId { block, index }))
    }

    pub fn block_param_type(&self, id: BlockParamId) -> Option<&Type> {
        self.get_block(id.block)?
            .params
            .get(id.index as usize)
            .map(|p| &p.param_type)
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks.values().map(|b| b.instructions.len()).sum()
    }
}

impl Default for FunctionBody {
    fn default() -> Self {
        Self::new()
    }
}
