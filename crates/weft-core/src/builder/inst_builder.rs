use super::IrBuilder;
use crate::{
    block::{BlockId, Terminator},
    function::FuncId,
    instructions::Instruction,
    types::Type,
    values::Value,
    IrError, Result,
};

type BinaryCtor = fn(Value, Value, Value, Type) -> Instruction;
type CompareCtor = fn(Value, Value, Value) -> Instruction;

impl IrBuilder {
    pub fn const_bool(&self, value: bool) -> Value {
        Value::bool(value)
    }

    pub fn const_int(&self, value: i64, bits: u16) -> Value {
        Value::int(value, bits)
    }

    pub fn const_uint(&self, value: u64, bits: u16) -> Value {
        Value::uint(value, bits)
    }

    pub fn add(&mut self, left: Value, right: Value) -> Result<Value> {
        self.binary(left, right, |result, left, right, ty| Instruction::Add {
            result,
            left,
            right,
            ty,
        })
    }

    pub fn sub(&mut self, left: Value, right: Value) -> Result<Value> {
        self.binary(left, right, |result, left, right, ty| Instruction::Sub {
            result,
            left,
            right,
            ty,
        })
    }

    pub fn mul(&mut self, left: Value, right: Value) -> Result<Value> {
        self.binary(left, right, |result, left, right, ty| Instruction::Mul {
            result,
            left,
            right,
            ty,
        })
    }

    pub fn eq(&mut self, left: Value, right: Value) -> Result<Value> {
        self.compare(left, right, |result, left, right| Instruction::Eq {
            result,
            left,
            right,
        })
    }

    pub fn ne(&mut self, left: Value, right: Value) -> Result<Value> {
        self.compare(left, right, |result, left, right| Instruction::Ne {
            result,
            left,
            right,
        })
    }

    pub fn lt(&mut self, left: Value, right: Value) -> Result<Value> {
        self.compare(left, right, |result, left, right| Instruction::Lt {
            result,
            left,
            right,
        })
    }

    pub fn le(&mut self, left: Value, right: Value) -> Result<Value> {
        self.compare(left, right, |result, left, right| Instruction::Le {
            result,
            left,
            right,
        })
    }

    pub fn gt(&mut self, left: Value, right: Value) -> Result<Value> {
        self.compare(left, right, |result, left, right| Instruction::Gt {
            result,
            left,
            right,
        })
    }

    pub fn ge(&mut self, left: Value, right: Value) -> Result<Value> {
        self.compare(left, right, |result, left, right| Instruction::Ge {
            result,
            left,
            right,
        })
    }

    /// Emits a call to `callee`. Argument count and types must match its signature exactly.
    pub fn call(&mut self, callee: FuncId, args: &[Value]) -> Result<()> {
        let signature = self.module().function(callee)?.signature.clone();
        let found = args
            .iter()
            .map(|arg| self.value_type(arg))
            .collect::<Result<Vec<_>>>()?;

        if found != signature.params {
            return Err(IrError::SignatureMismatch {
                name: signature.name,
                expected: format_types(&signature.params),
                found: format_types(&found),
            });
        }

        self.insert_inst(Instruction::Call {
            callee: signature.name,
            args: args.to_vec(),
        })
    }

    pub fn call_named(&mut self, callee: &str, args: &[Value]) -> Result<()> {
        let id = self
            .module()
            .function_id(callee)
            .ok_or_else(|| IrError::FunctionNotFound(callee.to_string()))?;
        self.call(id, args)
    }

    pub fn jump(&mut self, target: BlockId, args: Vec<Value>) -> Result<()> {
        self.set_terminator(Terminator::Jump(target, args))
    }

    pub fn branch(&mut self, condition: Value, then_block: BlockId, else_block: BlockId) -> Result<()> {
        let ty = self.value_type(&condition)?;
        if !ty.is_bool() {
            return Err(IrError::TypeError(format!(
                "Branch condition must be bool, found {}",
                ty
            )));
        }

        self.set_terminator(Terminator::Branch {
            condition,
            then_block,
            then_args: Vec::new(),
            else_block,
            else_args: Vec::new(),
        })
    }

    pub fn return_value(&mut self, value: Option<Value>) -> Result<()> {
        self.set_terminator(Terminator::Return(value))
    }

    pub fn return_void(&mut self) -> Result<()> {
        self.return_value(None)
    }

    fn binary(&mut self, left: Value, right: Value, ctor: BinaryCtor) -> Result<Value> {
        let ty = self.operand_type(&left, &right)?;
        if !ty.is_integer() {
            return Err(IrError::TypeError(format!(
                "Arithmetic requires integer operands, found {}",
                ty
            )));
        }

        let result = self.new_temp(ty.clone())?;
        self.insert_inst(ctor(result.clone(), left, right, ty))?;
        Ok(result)
    }

    fn compare(&mut self, left: Value, right: Value, ctor: CompareCtor) -> Result<Value> {
        self.operand_type(&left, &right)?;

        let result = self.new_temp(Type::Bool)?;
        self.insert_inst(ctor(result.clone(), left, right))?;
        Ok(result)
    }

    fn operand_type(&self, left: &Value, right: &Value) -> Result<Type> {
        let left_ty = self.value_type(left)?;
        let right_ty = self.value_type(right)?;
        if left_ty != right_ty {
            return Err(IrError::TypeError(format!(
                "Operand types differ: {} vs {}",
                left_ty, right_ty
            )));
        }
        Ok(left_ty)
    }
}

fn format_types(types: &[Type]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
