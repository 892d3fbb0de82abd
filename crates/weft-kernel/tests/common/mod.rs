#![allow(dead_code)]

use weft_core::interp::{CallEvent, Interpreter, RtValue};
use weft_core::{BlockId, FuncId, Function, FunctionSignature, IrBuilder, Linkage, Module, Type};

/// A module with `sink(i64)` and `mark(i64, bool)` declarations and a function
/// `f(p0: i64)` whose entry block returns, with the cursor ahead of the return.
pub fn setup() -> (IrBuilder, FuncId) {
    let mut builder = IrBuilder::new(Module::new("kernels"));
    builder
        .declare_function(FunctionSignature::new("sink", vec![Type::Int(64)]))
        .unwrap();
    builder
        .declare_function(FunctionSignature::new("mark", vec![Type::Int(64), Type::Bool]))
        .unwrap();
    let f = builder
        .add_function(
            FunctionSignature::new("f", vec![Type::Int(64)]),
            Linkage::External,
        )
        .unwrap();
    builder.position_at_entry(f).unwrap();
    builder.return_void().unwrap();
    (builder, f)
}

pub fn run(module: &Module, x: i128) -> Vec<CallEvent> {
    let mut interp = Interpreter::new(module);
    interp.run("f", &[RtValue::Int(x)]).unwrap();
    interp.into_trace()
}

/// Arguments passed to `sink`, in call order.
pub fn sunk(trace: &[CallEvent]) -> Vec<i128> {
    trace
        .iter()
        .filter(|event| event.callee == "sink")
        .map(|event| event.args[0].as_int().unwrap())
        .collect()
}

/// `(induction, is_first)` pairs passed to `mark`, in call order.
pub fn marks(trace: &[CallEvent]) -> Vec<(i128, bool)> {
    trace
        .iter()
        .filter(|event| event.callee == "mark")
        .map(|event| {
            (
                event.args[0].as_int().unwrap(),
                event.args[1].as_bool().unwrap(),
            )
        })
        .collect()
}

pub fn block_named(function: &Function, name: &str) -> BlockId {
    function
        .body()
        .unwrap()
        .blocks
        .values()
        .find(|block| block.name == name)
        .map(|block| block.id)
        .unwrap_or_else(|| panic!("no block named {}", name))
}
