use crate::analysis::{verify_function, verify_module, ControlFlowGraph};
use crate::block::{BlockParam, Terminator};
use crate::builder::{emit_if_then_else, IrBuilder};
use crate::function::{Function, FunctionSignature, Linkage};
use crate::instructions::Instruction;
use crate::module::Module;
use crate::types::Type;
use crate::values::Value;
use crate::IrError;
use pretty_assertions::assert_eq;

fn function(name: &str, params: Vec<Type>) -> Function {
    Function::new(FunctionSignature::new(name, params), Linkage::Internal)
}

#[test]
fn test_unterminated_block_rejected() {
    let f = function("f", vec![]);
    let err = verify_function(&f, None).unwrap_err();
    assert!(matches!(err, IrError::VerificationError(_)));
    assert!(err.to_string().contains("not terminated"));
}

#[test]
fn test_dangling_edge_rejected() {
    let mut f = function("f", vec![]);
    let body = f.body_mut().unwrap();
    let entry = body.entry_block();
    body.block_mut(entry)
        .unwrap()
        .set_terminator(Terminator::Jump(crate::BlockId(42), vec![]));

    let err = verify_function(&f, None).unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_block_argument_mismatch_rejected() {
    let mut f = function("f", vec![]);
    let body = f.body_mut().unwrap();
    let entry = body.entry_block();
    let target = body.create_block("target");
    body.add_block_param(target, BlockParam::new("x", Type::Int(32)))
        .unwrap();
    body.block_mut(target)
        .unwrap()
        .set_terminator(Terminator::Return(None));

    body.block_mut(entry)
        .unwrap()
        .set_terminator(Terminator::Jump(target, vec![]));
    assert!(verify_function(&f, None).is_err());

    let body = f.body_mut().unwrap();
    body.block_mut(entry).unwrap().terminator =
        Terminator::Jump(target, vec![Value::uint(1, 32)]);
    assert!(verify_function(&f, None).is_err());

    let body = f.body_mut().unwrap();
    body.block_mut(entry).unwrap().terminator = Terminator::Jump(target, vec![Value::int(1, 32)]);
    verify_function(&f, None).unwrap();
}

#[test]
fn test_return_type_checked() {
    let mut f = Function::new(
        FunctionSignature::new("f", vec![]).returning(Type::Bool),
        Linkage::External,
    );
    let body = f.body_mut().unwrap();
    let entry = body.entry_block();
    body.block_mut(entry)
        .unwrap()
        .set_terminator(Terminator::Return(None));
    assert!(verify_function(&f, None).is_err());

    body_entry(&mut f).terminator = Terminator::Return(Some(Value::bool(true)));
    verify_function(&f, None).unwrap();
}

fn body_entry(f: &mut Function) -> &mut crate::BasicBlock {
    let body = f.body_mut().unwrap();
    let entry = body.entry_block();
    body.block_mut(entry).unwrap()
}

#[test]
fn test_call_checked_against_module() {
    let mut module = Module::new("m");
    module
        .declare_function(FunctionSignature::new("g", vec![Type::Bool]))
        .unwrap();

    let mut f = function("f", vec![]);
    let entry = body_entry(&mut f);
    entry.add_instruction(Instruction::Call {
        callee: "g".into(),
        args: vec![Value::int(0, 8)],
    });
    entry.set_terminator(Terminator::Return(None));
    module.add_function(f).unwrap();

    let err = verify_module(&module).unwrap_err();
    assert!(err.to_string().contains("mismatched arguments"));
}

#[test]
fn test_declarations_always_verify() {
    let decl = Function::declaration(FunctionSignature::new("ext", vec![Type::Int(8)]));
    verify_function(&decl, None).unwrap();
}

#[test]
fn test_dominance_in_diamond() {
    let mut builder = IrBuilder::new(Module::new("m"));
    let func = builder
        .add_function(FunctionSignature::new("f", vec![]), Linkage::Internal)
        .unwrap();
    builder.position_at_entry(func).unwrap();
    let entry = builder.current_block().unwrap();

    let left = builder.create_block("left").unwrap();
    let right = builder.create_block("right").unwrap();
    let join = builder.create_block("join").unwrap();
    let orphan = builder.create_block("orphan").unwrap();

    builder.branch(Value::bool(true), left, right).unwrap();
    for arm in [left, right] {
        builder.position_at_end_of(arm).unwrap();
        builder.jump(join, vec![]).unwrap();
    }
    builder.position_at_end_of(join).unwrap();
    builder.return_void().unwrap();
    builder.position_at_end_of(orphan).unwrap();
    builder.jump(join, vec![]).unwrap();

    let cfg = ControlFlowGraph::from_function(builder.function().unwrap().body().unwrap());

    assert!(cfg.dominates(entry, left));
    assert!(!cfg.dominates(left, join));
    assert!(cfg.post_dominates(join, entry));
    assert!(cfg.post_dominates(join, left));
    assert!(!cfg.post_dominates(left, entry));
    assert!(!cfg.is_reachable(orphan));
    assert_eq!(cfg.exit_blocks(), vec![join]);

    let mut preds = cfg.predecessors(join).to_vec();
    preds.sort();
    assert_eq!(preds, vec![left, right, orphan]);
}

fn builder_with_entry() -> (IrBuilder, crate::FuncId) {
    let mut builder = IrBuilder::new(Module::new("m"));
    let func = builder
        .add_function(FunctionSignature::new("f", vec![]), Linkage::Internal)
        .unwrap();
    builder.position_at_entry(func).unwrap();
    builder.return_void().unwrap();
    (builder, func)
}

#[test]
fn test_value_from_one_arm_rejected_after_merge() {
    let (mut builder, func) = builder_with_entry();
    let diamond = emit_if_then_else(&mut builder, Value::bool(true), "").unwrap();

    builder.position_at_end(func, diamond.true_block).unwrap();
    let arm_value = builder.add(Value::int(1, 32), Value::int(2, 32)).unwrap();
    builder.position_at_end(func, diamond.after_block).unwrap();
    builder.add(arm_value, Value::int(1, 32)).unwrap();

    let err = verify_function(builder.function().unwrap(), None).unwrap_err();
    assert!(matches!(err, IrError::VerificationError(_)));
    assert!(err.to_string().contains("does not dominate"));
}

#[test]
fn test_use_before_definition_in_same_block_rejected() {
    let (mut builder, func) = builder_with_entry();
    let entry = builder.current_block().unwrap();
    let later = builder.add(Value::int(1, 32), Value::int(2, 32)).unwrap();
    builder.position_before(func, entry, 0).unwrap();
    builder.add(later, Value::int(1, 32)).unwrap();

    let err = verify_function(builder.function().unwrap(), None).unwrap_err();
    assert!(err.to_string().contains("does not dominate"));
}

#[test]
fn test_value_defined_before_diamond_usable_everywhere() {
    let (mut builder, func) = builder_with_entry();
    let shared = builder.add(Value::int(1, 32), Value::int(2, 32)).unwrap();
    let diamond = emit_if_then_else(&mut builder, Value::bool(false), "").unwrap();

    for block in [diamond.true_block, diamond.false_block, diamond.after_block] {
        builder.position_at_end(func, block).unwrap();
        builder.mul(shared.clone(), Value::int(3, 32)).unwrap();
    }

    verify_function(builder.function().unwrap(), None).unwrap();
}
