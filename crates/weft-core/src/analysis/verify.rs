use super::cfg::ControlFlowGraph;
use crate::block::{BlockId, Terminator};
use crate::function::Function;
use crate::instructions::Instruction;
use crate::module::Module;
use crate::types::Type;
use crate::values::Value;
use crate::{IrError, Result};
use std::collections::HashMap;

/// Checks the structural invariants every emitted function must satisfy.
///
/// Each block carries exactly one terminator, every edge lands on an existing block with
/// matching block arguments, branch conditions are `bool`, calls agree with the callee's
/// signature, and every temp or block parameter is defined on all paths to its uses.
pub fn verify_module(module: &Module) -> Result<()> {
    for (_, function) in module.functions() {
        verify_function(function, Some(module))?;
    }
    Ok(())
}

pub fn verify_function(function: &Function, module: Option<&Module>) -> Result<()> {
    let Some(body) = function.body.as_ref() else {
        return Ok(());
    };
    let name = function.name();

    if body.get_block(body.entry_block).is_none() {
        return Err(fail(name, "missing entry block".to_string()));
    }

    for block in body.blocks.values() {
        for inst in &block.instructions {
            for operand in inst.operands() {
                function
                    .value_type(operand)
                    .map_err(|e| fail(name, format!("{} uses an undefined value: {}", block.id, e)))?;
            }
            if let (Instruction::Call { callee, args }, Some(module)) = (inst, module) {
                verify_call(function, module, block.id, callee, args)?;
            }
        }

        match &block.terminator {
            Terminator::Invalid => {
                return Err(fail(name, format!("{} is not terminated", block.id)));
            }
            Terminator::Jump(target, args) => {
                verify_edge(function, block.id, *target, args)?;
            }
            Terminator::Branch {
                condition,
                then_block,
                then_args,
                else_block,
                else_args,
            } => {
                let ty = function.value_type(condition)?;
                if ty != Type::Bool {
                    return Err(fail(
                        name,
                        format!("{} branches on a {} condition", block.id, ty),
                    ));
                }
                verify_edge(function, block.id, *then_block, then_args)?;
                verify_edge(function, block.id, *else_block, else_args)?;
            }
            Terminator::Return(value) => {
                let found = value.as_ref().map(|v| function.value_type(v)).transpose()?;
                if found != function.signature.returns {
                    return Err(fail(
                        name,
                        format!("{} returns a value not matching the signature", block.id),
                    ));
                }
            }
        }
    }

    verify_dominance(function)
}

/// Where a value becomes available: its block, and the instruction index after which it can be
/// read. Block parameters are available from the start of their block.
fn definition_sites(function: &Function) -> Result<HashMap<Value, (BlockId, usize)>> {
    let mut sites = HashMap::new();
    for block in function.body()?.blocks.values() {
        for index in 0..block.params.len() {
            let param = Value::BlockParam(crate::values::BlockParamId {
                block: block.id,
                index: index as u32,
            });
            sites.insert(param, (block.id, 0));
        }
        for (index, inst) in block.instructions.iter().enumerate() {
            if let Some(result) = inst.result() {
                sites.insert(result.clone(), (block.id, index + 1));
            }
        }
    }
    Ok(sites)
}

fn verify_dominance(function: &Function) -> Result<()> {
    let name = function.name();
    let body = function.body()?;
    let cfg = ControlFlowGraph::from_function(body);
    let sites = definition_sites(function)?;

    let check = |value: &Value, block: BlockId, index: usize| -> Result<()> {
        let Some(&(def_block, available_at)) = sites.get(value) else {
            return Ok(());
        };
        let dominated = if def_block == block {
            available_at <= index
        } else {
            cfg.dominates(def_block, block)
        };
        if dominated {
            Ok(())
        } else {
            Err(fail(
                name,
                format!("{} uses {} which does not dominate it", block, value),
            ))
        }
    };

    for block in body.blocks.values() {
        for (index, inst) in block.instructions.iter().enumerate() {
            for operand in inst.operands() {
                check(operand, block.id, index)?;
            }
        }
        for operand in block.terminator.operands() {
            check(operand, block.id, block.instructions.len())?;
        }
    }

    Ok(())
}

fn verify_edge(function: &Function, from: BlockId, to: BlockId, args: &[Value]) -> Result<()> {
    let name = function.name();
    let target = function
        .body()?
        .get_block(to)
        .ok_or_else(|| fail(name, format!("{} jumps to missing {}", from, to)))?;

    if target.params.len() != args.len() {
        return Err(fail(
            name,
            format!(
                "{} passes {} arguments to {} which takes {}",
                from,
                args.len(),
                to,
                target.params.len()
            ),
        ));
    }

    for (arg, param) in args.iter().zip(&target.params) {
        let ty = function.value_type(arg)?;
        if ty != param.param_type {
            return Err(fail(
                name,
                format!(
                    "{} passes {} to {} parameter {} of type {}",
                    from, ty, to, param.name, param.param_type
                ),
            ));
        }
    }

    Ok(())
}

fn verify_call(
    function: &Function,
    module: &Module,
    block: BlockId,
    callee: &str,
    args: &[Value],
) -> Result<()> {
    let target = module
        .get_function(callee)
        .ok_or_else(|| IrError::FunctionNotFound(callee.to_string()))?;

    let found = args
        .iter()
        .map(|arg| function.value_type(arg))
        .collect::<Result<Vec<_>>>()?;
    if found != target.signature.params {
        return Err(fail(
            function.name(),
            format!("{} calls {} with mismatched arguments", block, callee),
        ));
    }

    Ok(())
}

fn fail(function: &str, message: String) -> IrError {
    IrError::VerificationError(format!("{}: {}", function, message))
}
