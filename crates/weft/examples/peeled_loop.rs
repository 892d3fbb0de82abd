use weft::{
    FunctionSignature, IrBuilder, KernelSupportLibrary, Linkage, Module, Type, Value,
};

fn main() -> anyhow::Result<()> {
    let mut builder = IrBuilder::new(Module::new("peeled"));
    builder.declare_function(FunctionSignature::new("visit", vec![Type::Int(64), Type::Bool]))?;

    let f = builder.add_function(
        FunctionSignature::new("walk", vec![Type::Int(64)]),
        Linkage::External,
    )?;
    builder.position_at_entry(f)?;
    builder.return_void()?;

    let n = f_param(0);
    let mut lib = KernelSupportLibrary::new(&mut builder, true, false);
    lib.for_loop("i", Value::int(0, 64), n, Value::int(1, 64), true, |lib, i, first| {
        KernelSupportLibrary::emit_and_call_outlined_kernel(
            lib.builder(),
            "visit_one",
            &[i, first],
            |b, params| b.call_named("visit", params),
        )
    })?;

    let module = builder.into_module();
    print!("{}", weft::render_verified(&module)?);
    Ok(())
}

fn f_param(index: u32) -> Value {
    Value::Param(weft::core::values::ParamId(index))
}
