/*! Reference interpreter for emitted modules.
 *
 * Many properties of emitted control flow only show up when the code runs: how many times a
 * loop body executes, which iteration sees the "first" flag, whether an empty range skips the
 * body entirely. The interpreter walks the block graph directly and records every call to a
 * body-less declaration, so tests can observe execution through the trace.
 */

use crate::block::{BlockId, Terminator};
use crate::function::Function;
use crate::instructions::Instruction;
use crate::module::Module;
use crate::types::Type;
use crate::values::{BlockParamId, Value};
use crate::{IrError, Result};
use std::collections::HashMap;
use std::fmt;

const DEFAULT_FUEL: u64 = 1_000_000;
const MAX_CALL_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RtValue {
    Bool(bool),
    Int(i128),
}

impl RtValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RtValue::Bool(b) => Some(*b),
            RtValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            RtValue::Int(v) => Some(*v),
            RtValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for RtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtValue::Bool(b) => write!(f, "{}", b),
            RtValue::Int(v) => write!(f, "{}", v),
        }
    }
}

/// A call that left the module: the callee is a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEvent {
    pub callee: String,
    pub args: Vec<RtValue>,
}

pub struct Interpreter<'m> {
    module: &'m Module,
    trace: Vec<CallEvent>,
    fuel: u64,
}

impl<'m> Interpreter<'m> {
    pub fn new(module: &'m Module) -> Self {
        Self {
            module,
            trace: Vec::new(),
            fuel: DEFAULT_FUEL,
        }
    }

    /// Caps the number of instructions and terminators executed.
    pub fn with_fuel(mut self, fuel: u64) -> Self {
        self.fuel = fuel;
        self
    }

    pub fn trace(&self) -> &[CallEvent] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<CallEvent> {
        self.trace
    }

    pub fn run(&mut self, name: &str, args: &[RtValue]) -> Result<Option<RtValue>> {
        let function = self
            .module
            .get_function(name)
            .ok_or_else(|| IrError::FunctionNotFound(name.to_string()))?;
        self.invoke(function, args.to_vec(), 0)
    }

    fn invoke(
        &mut self,
        function: &'m Function,
        args: Vec<RtValue>,
        depth: usize,
    ) -> Result<Option<RtValue>> {
        if args.len() != function.signature.params.len() {
            return Err(IrError::InterpreterError(format!(
                "{} expects {} arguments, got {}",
                function.name(),
                function.signature.params.len(),
                args.len()
            )));
        }

        let Some(body) = function.body.as_ref() else {
            self.trace.push(CallEvent {
                callee: function.name().to_string(),
                args,
            });
            return Ok(None);
        };

        if depth >= MAX_CALL_DEPTH {
            return Err(IrError::InterpreterError(format!(
                "call depth limit reached in {}",
                function.name()
            )));
        }

        let mut frame = Frame::default();
        for (param, arg) in function.param_values().into_iter().zip(args) {
            frame.values.insert(param, arg);
        }

        let mut current = body.entry_block;
        loop {
            let block = body.block(current)?;

            for inst in &block.instructions {
                self.consume_fuel()?;
                self.execute(&mut frame, inst, depth)?;
            }

            self.consume_fuel()?;
            match &block.terminator {
                Terminator::Jump(target, args) => {
                    frame.enter(*target, args)?;
                    current = *target;
                }
                Terminator::Branch {
                    condition,
                    then_block,
                    then_args,
                    else_block,
                    else_args,
                } => {
                    let taken = frame.eval(condition)?.as_bool().ok_or_else(|| {
                        IrError::InterpreterError(format!("non-bool condition in {}", block.id))
                    })?;
                    let (target, args) = if taken {
                        (*then_block, then_args)
                    } else {
                        (*else_block, else_args)
                    };
                    frame.enter(target, args)?;
                    current = target;
                }
                Terminator::Return(value) => {
                    return value.as_ref().map(|v| frame.eval(v)).transpose();
                }
                Terminator::Invalid => {
                    return Err(IrError::InterpreterError(format!(
                        "reached unterminated {} in {}",
                        block.id,
                        function.name()
                    )));
                }
            }
        }
    }

    fn execute(&mut self, frame: &mut Frame, inst: &Instruction, depth: usize) -> Result<()> {
        match inst {
            Instruction::Add {
                result,
                left,
                right,
                ty,
            } => frame.arith(result, left, right, ty, i128::checked_add),
            Instruction::Sub {
                result,
                left,
                right,
                ty,
            } => frame.arith(result, left, right, ty, i128::checked_sub),
            Instruction::Mul {
                result,
                left,
                right,
                ty,
            } => frame.arith(result, left, right, ty, i128::checked_mul),
            Instruction::Eq {
                result,
                left,
                right,
            } => frame.compare(result, left, right, |a, b| a == b),
            Instruction::Ne {
                result,
                left,
                right,
            } => frame.compare(result, left, right, |a, b| a != b),
            Instruction::Lt {
                result,
                left,
                right,
            } => frame.compare(result, left, right, |a, b| a < b),
            Instruction::Le {
                result,
                left,
                right,
            } => frame.compare(result, left, right, |a, b| a <= b),
            Instruction::Gt {
                result,
                left,
                right,
            } => frame.compare(result, left, right, |a, b| a > b),
            Instruction::Ge {
                result,
                left,
                right,
            } => frame.compare(result, left, right, |a, b| a >= b),
            Instruction::Call { callee, args } => {
                let function = self
                    .module
                    .get_function(callee)
                    .ok_or_else(|| IrError::FunctionNotFound(callee.clone()))?;
                let args = args
                    .iter()
                    .map(|arg| frame.eval(arg))
                    .collect::<Result<Vec<_>>>()?;
                self.invoke(function, args, depth + 1)?;
                Ok(())
            }
        }
    }

    fn consume_fuel(&mut self) -> Result<()> {
        if self.fuel == 0 {
            return Err(IrError::InterpreterError("out of fuel".into()));
        }
        self.fuel -= 1;
        Ok(())
    }
}

#[derive(Default)]
struct Frame {
    values: HashMap<Value, RtValue>,
}

impl Frame {
    fn eval(&self, value: &Value) -> Result<RtValue> {
        if let Value::Constant(c) = value {
            return match c.as_bool() {
                Some(b) => Ok(RtValue::Bool(b)),
                None => c.as_i128().map(RtValue::Int).ok_or_else(|| {
                    IrError::InterpreterError(format!("constant {} does not fit in i128", c))
                }),
            };
        }
        self.values
            .get(value)
            .copied()
            .ok_or_else(|| IrError::InterpreterError(format!("{} read before definition", value)))
    }

    fn int(&self, value: &Value) -> Result<i128> {
        self.eval(value)?
            .as_int()
            .ok_or_else(|| IrError::InterpreterError(format!("{} is not an integer", value)))
    }

    fn enter(&mut self, target: BlockId, args: &[Value]) -> Result<()> {
        let evaluated = args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>>>()?;
        for (index, arg) in evaluated.into_iter().enumerate() {
            let param = Value::BlockParam(BlockParamId {
                block: target,
                index: index as u32,
            });
            self.values.insert(param, arg);
        }
        Ok(())
    }

    fn arith(
        &mut self,
        result: &Value,
        left: &Value,
        right: &Value,
        ty: &Type,
        op: fn(i128, i128) -> Option<i128>,
    ) -> Result<()> {
        let value = op(self.int(left)?, self.int(right)?)
            .filter(|v| {
                ty.int_range()
                    .map_or(true, |(min, max)| (min..=max).contains(v))
            })
            .ok_or_else(|| IrError::InterpreterError(format!("{} overflows {}", result, ty)))?;
        self.values.insert(result.clone(), RtValue::Int(value));
        Ok(())
    }

    fn compare(
        &mut self,
        result: &Value,
        left: &Value,
        right: &Value,
        op: fn(&RtValue, &RtValue) -> bool,
    ) -> Result<()> {
        let left = self.eval(left)?;
        let right = self.eval(right)?;
        if std::mem::discriminant(&left) != std::mem::discriminant(&right) {
            return Err(IrError::InterpreterError(format!(
                "cannot compare {} with {}",
                left, right
            )));
        }
        let outcome = op(&left, &right);
        self.values.insert(result.clone(), RtValue::Bool(outcome));
        Ok(())
    }
}
