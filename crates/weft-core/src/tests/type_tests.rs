use crate::metadata::LoopHints;
use crate::types::Type;
use crate::values::{Constant, Value};
use pretty_assertions::assert_eq;

#[test]
fn test_integer_ranges() {
    assert_eq!(Type::Uint(8).int_range(), Some((0, 255)));
    assert_eq!(Type::Int(8).int_range(), Some((-128, 127)));
    assert_eq!(Type::Bool.int_range(), None);
    assert!(Type::Int(32).is_signed());
    assert!(!Type::Uint(32).is_signed());
}

#[test]
fn test_type_display() {
    assert_eq!(Type::Int(64).to_string(), "i64");
    assert_eq!(Type::Uint(32).to_string(), "u32");
    assert_eq!(Type::Pointer(Box::new(Type::Bool)).to_string(), "ptr<bool>");
}

#[test]
fn test_constant_values() {
    let five = Value::int(5, 64);
    assert!(five.is_constant());
    assert_eq!(five.to_string(), "5i64");
    assert_eq!(five.as_constant().unwrap().ty(), Type::Int(64));
    assert_eq!(five.as_constant().unwrap().as_i128(), Some(5));

    assert_eq!(Value::uint(7, 32).to_string(), "7u32");
    assert_eq!(Value::bool(true).as_constant().unwrap().as_bool(), Some(true));
    assert_eq!(
        Constant::zero(&Type::Uint(16)).unwrap().to_string(),
        "0u16"
    );
}

#[test]
fn test_loop_hints_from_json() {
    let hints = LoopHints::from_json(r#"{"prevent_unrolling": true}"#).unwrap();
    assert_eq!(hints, LoopHints::new(true, false));
    assert!(!hints.is_empty());

    let empty = LoopHints::from_json("{}").unwrap();
    assert!(empty.is_empty());

    assert!(LoopHints::from_json("[1, 2]").is_err());
}
