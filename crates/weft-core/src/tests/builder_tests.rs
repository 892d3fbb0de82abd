use crate::block::Terminator;
use crate::builder::{CursorPosition, IrBuilder};
use crate::function::{FunctionSignature, Linkage};
use crate::instructions::Instruction;
use crate::module::Module;
use crate::types::Type;
use crate::values::Value;
use crate::IrError;
use pretty_assertions::assert_eq;

fn builder_with_function(params: Vec<Type>) -> (IrBuilder, crate::FuncId) {
    let mut builder = IrBuilder::new(Module::new("test"));
    let func = builder
        .add_function(FunctionSignature::new("f", params), Linkage::External)
        .unwrap();
    builder.position_at_entry(func).unwrap();
    (builder, func)
}

#[test]
fn test_insert_without_position_fails() {
    let mut builder = IrBuilder::new(Module::new("test"));
    assert_eq!(builder.position(), CursorPosition::Nowhere);

    let result = builder.insert_inst(Instruction::Call {
        callee: "g".into(),
        args: vec![],
    });
    assert!(matches!(result, Err(IrError::BuilderError(_))));
    assert!(builder.current_block().is_err());
}

#[test]
fn test_insert_before_advances_cursor() {
    let (mut builder, func) = builder_with_function(vec![Type::Int(32)]);
    let entry = builder.current_block().unwrap();

    let a = builder.add(Value::int(1, 32), Value::int(2, 32)).unwrap();
    let b = builder.add(a.clone(), Value::int(3, 32)).unwrap();
    assert_eq!(builder.position(), CursorPosition::Before(func, entry, 2));

    builder.position_before(func, entry, 1).unwrap();
    builder.mul(a.clone(), a.clone()).unwrap();
    assert_eq!(builder.position(), CursorPosition::Before(func, entry, 2));

    let block = builder.block(entry).unwrap();
    let opcodes: Vec<_> = block.instructions.iter().map(|i| i.opcode()).collect();
    assert_eq!(opcodes, vec!["add", "mul", "add"]);
}

#[test]
fn test_position_before_out_of_range() {
    let (mut builder, func) = builder_with_function(vec![]);
    let entry = builder.current_block().unwrap();
    assert!(builder.position_before(func, entry, 3).is_err());
}

#[test]
fn test_block_takes_one_terminator() {
    let (mut builder, _) = builder_with_function(vec![]);
    builder.return_void().unwrap();
    assert!(builder.is_terminated().unwrap());

    let err = builder.return_void().unwrap_err();
    assert!(err.to_string().contains("already has terminator"));
}

#[test]
fn test_arithmetic_type_checks() {
    let (mut builder, _) = builder_with_function(vec![]);

    let sum = builder.add(Value::int(1, 64), Value::int(2, 64)).unwrap();
    assert_eq!(builder.value_type(&sum).unwrap(), Type::Int(64));

    let lt = builder.lt(sum, Value::int(10, 64)).unwrap();
    assert_eq!(builder.value_type(&lt).unwrap(), Type::Bool);

    let mixed = builder.add(Value::int(1, 64), Value::uint(2, 64));
    assert!(matches!(mixed, Err(IrError::TypeError(_))));

    let bools = builder.add(Value::bool(true), Value::bool(false));
    assert!(matches!(bools, Err(IrError::TypeError(_))));
}

#[test]
fn test_branch_requires_bool() {
    let (mut builder, _) = builder_with_function(vec![]);
    let a = builder.create_block("a").unwrap();
    let b = builder.create_block("b").unwrap();

    let result = builder.branch(Value::int(1, 8), a, b);
    assert!(matches!(result, Err(IrError::TypeError(_))));
    assert!(!builder.is_terminated().unwrap());
}

#[test]
fn test_split_block_moves_tail_and_terminator() {
    let (mut builder, func) = builder_with_function(vec![]);
    let entry = builder.current_block().unwrap();

    builder.add(Value::int(1, 32), Value::int(1, 32)).unwrap();
    builder.mul(Value::int(2, 32), Value::int(2, 32)).unwrap();
    builder.return_void().unwrap();

    builder.position_before(func, entry, 1).unwrap();
    let tail = builder.split_block("tail").unwrap();

    assert_eq!(builder.position(), CursorPosition::BlockEnd(func, entry));

    let head = builder.block(entry).unwrap();
    assert_eq!(head.instructions.len(), 1);
    assert_eq!(head.terminator, Terminator::Invalid);

    let moved = builder.block(tail).unwrap();
    assert_eq!(moved.name, "tail");
    assert_eq!(moved.instructions[0].opcode(), "mul");
    assert_eq!(moved.terminator, Terminator::Return(None));
}

#[test]
fn test_call_checks_signature() {
    let (mut builder, _) = builder_with_function(vec![]);
    let sink = builder
        .declare_function(FunctionSignature::new("sink", vec![Type::Int(64), Type::Bool]))
        .unwrap();

    builder
        .call(sink, &[Value::int(4, 64), Value::bool(false)])
        .unwrap();

    let err = builder.call(sink, &[Value::int(4, 64)]).unwrap_err();
    match err {
        IrError::SignatureMismatch {
            name,
            expected,
            found,
        } => {
            assert_eq!(name, "sink");
            assert_eq!(expected, "i64, bool");
            assert_eq!(found, "i64");
        }
        other => panic!("unexpected error: {}", other),
    }

    assert!(matches!(
        builder.call_named("missing", &[]),
        Err(IrError::FunctionNotFound(_))
    ));
}

#[test]
fn test_guard_restores_position() {
    let (mut builder, func) = builder_with_function(vec![]);
    let other = builder.create_block("other").unwrap();
    let before = builder.position();

    {
        let mut guard = builder.guard();
        assert_eq!(guard.saved_position(), before);
        guard.position_at_end_of(other).unwrap();
        guard.add(Value::int(1, 8), Value::int(1, 8)).unwrap();
        assert_eq!(guard.position(), CursorPosition::BlockEnd(func, other));
    }

    assert_eq!(builder.position(), before);
    assert_eq!(builder.block(other).unwrap().instructions.len(), 1);
}

#[test]
fn test_duplicate_function_rejected() {
    let mut module = Module::new("dup");
    module
        .declare_function(FunctionSignature::new("k", vec![]))
        .unwrap();
    assert!(module
        .declare_function(FunctionSignature::new("k", vec![]))
        .is_err());

    let (id, created) = module.get_or_insert_with("k", || unreachable!());
    assert!(!created);
    assert_eq!(module.function(id).unwrap().name(), "k");
}
