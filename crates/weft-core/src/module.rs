use crate::function::{FuncId, Function, FunctionSignature};
use crate::{IrError, Result};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named-function registry for one compilation unit.
///
/// Function ids are insertion indices; functions are never removed, so an id stays valid for
/// the lifetime of the module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    functions: IndexMap<String, Function>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: IndexMap::new(),
        }
    }

    pub fn add_function(&mut self, function: Function) -> Result<FuncId> {
        match self.functions.entry(function.signature.name.clone()) {
            Entry::Occupied(entry) => Err(IrError::BuilderError(format!(
                "Function {} already exists",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                let id = FuncId(entry.index() as u32);
                entry.insert(function);
                Ok(id)
            }
        }
    }

    pub fn declare_function(&mut self, signature: FunctionSignature) -> Result<FuncId> {
        self.add_function(Function::declaration(signature))
    }

    /// Returns the function registered under `name`, creating it with `make` if absent.
    ///
    /// The flag is `true` when the function was created by this call.
    pub fn get_or_insert_with<F>(&mut self, name: &str, make: F) -> (FuncId, bool)
    where
        F: FnOnce() -> Function,
    {
        match self.functions.entry(name.to_string()) {
            Entry::Occupied(entry) => (FuncId(entry.index() as u32), false),
            Entry::Vacant(entry) => {
                let id = FuncId(entry.index() as u32);
                entry.insert(make());
                (id, true)
            }
        }
    }

    pub fn function_id(&self, name: &str) -> Option<FuncId> {
        self.functions
            .get_index_of(name)
            .map(|index| FuncId(index as u32))
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn function(&self, id: FuncId) -> Result<&Function> {
        self.functions
            .get_index(id.0 as usize)
            .map(|(_, f)| f)
            .ok_or_else(|| IrError::FunctionNotFound(id.to_string()))
    }

    pub fn function_mut(&mut self, id: FuncId) -> Result<&mut Function> {
        self.functions
            .get_index_mut(id.0 as usize)
            .map(|(_, f)| f)
            .ok_or_else(|| IrError::FunctionNotFound(id.to_string()))
    }

    pub fn functions(&self) -> impl Iterator<Item = (FuncId, &Function)> {
        self.functions
            .values()
            .enumerate()
            .map(|(index, f)| (FuncId(index as u32), f))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
