use pretty_assertions::assert_eq;
use std::fs;
use tempfile::NamedTempFile;
use weft_core::{ForLoop, FunctionSignature, IrBuilder, Linkage, LoopHints, Module, Type, Value};
use weft_emit::{EmitterConfig, Emitter, IndentStyle, TextEmitter};

fn counted_loop_module() -> Module {
    let mut builder = IrBuilder::new(Module::new("demo"));
    let sink = builder
        .declare_function(FunctionSignature::new("sink", vec![Type::Int(64)]))
        .unwrap();
    let f = builder
        .add_function(FunctionSignature::new("f", vec![]), Linkage::External)
        .unwrap();
    builder.position_at_entry(f).unwrap();
    builder.return_void().unwrap();

    let lp = ForLoop::emit(
        &mut builder,
        "i",
        Value::int(0, 64),
        Value::int(2, 64),
        Value::int(1, 64),
        LoopHints::new(true, false),
    )
    .unwrap();
    builder.position_at_end_of(lp.body_block()).unwrap();
    builder.call(sink, &[lp.indvar().clone()]).unwrap();

    builder.into_module()
}

#[test]
fn test_render_counted_loop() {
    let output = TextEmitter::default()
        .render(&counted_loop_module())
        .unwrap();

    let expected = "\
module demo

declare sink(p0: i64)

function f() {
    block0:  ; entry
        jump block1(0i64)
    block1(block1.0: i64):  ; i.header [loop_header]
        v0: bool = ge block1.0, 2i64
        branch v0, block4, block2
    block2:  ; i.body
        call sink(block1.0)
        jump block3
    block3:  ; i.latch [no_unroll]
        v1: i64 = add block1.0, 1i64
        jump block1(v1)
    block4:  ; i.exit [loop_exit]
        return
}
";
    assert_eq!(output, expected);
}

#[test]
fn test_render_without_types_or_metadata() {
    let config = EmitterConfig {
        include_types: false,
        include_metadata: false,
        indent_style: IndentStyle::Spaces(2),
        ..EmitterConfig::default()
    };
    let output = TextEmitter::new(config)
        .render(&counted_loop_module())
        .unwrap();

    assert!(output.contains("  block1(block1.0):  ; i.header\n"));
    assert!(output.contains("    v0 = ge block1.0, 2i64\n"));
    assert!(!output.contains("[loop_exit]"));
}

#[test]
fn test_internal_functions_are_marked() {
    let mut builder = IrBuilder::new(Module::new("kernels"));
    let k = builder
        .add_function(
            FunctionSignature::new("k", vec![Type::Bool]).returning(Type::Bool),
            Linkage::Internal,
        )
        .unwrap();
    builder.position_at_entry(k).unwrap();
    builder.return_value(Some(Value::bool(true))).unwrap();

    let output = TextEmitter::default()
        .emit_to_string(&builder.into_module())
        .unwrap();
    assert!(output.contains("function internal k(p0: bool) -> bool {"));
    assert!(output.contains("return true"));
}

#[test]
fn test_config_from_json_and_write_to_file() {
    let config = EmitterConfig::from_json(r#"{"indent_style": "Tabs", "include_types": false}"#)
        .unwrap();
    assert_eq!(config.indent_style, IndentStyle::Tabs);
    assert!(config.include_metadata);
    assert!(!config.use_colors);

    let mut file = NamedTempFile::new().unwrap();
    TextEmitter::new(config)
        .write_to(&counted_loop_module(), &mut file)
        .unwrap();

    let written = fs::read_to_string(file.path()).unwrap();
    assert!(written.starts_with("module demo\n"));
    assert!(written.contains("\tblock0:  ; entry\n\t\tjump block1(0i64)\n"));
}
