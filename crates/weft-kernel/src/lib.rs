/*! Structured control flow on top of the weft builder.
 *
 * Code generators want to say "loop from here to there", "do this only if", or "call this
 * helper, creating it the first time". Each of those needs several blocks, correct edges, and
 * careful cursor handling so the next emitted instruction lands after the construct. The
 * `KernelSupportLibrary` packages those patterns: every method leaves the cursor at the end of
 * the block where control continues, so constructs compose and nest freely.
 *
 * ```no_run
 * use weft_core::{FunctionSignature, IrBuilder, Linkage, Module, Value};
 * use weft_kernel::KernelSupportLibrary;
 *
 * # fn main() -> weft_core::Result<()> {
 * let mut builder = IrBuilder::new(Module::new("example"));
 * let f = builder.add_function(FunctionSignature::new("f", vec![]), Linkage::External)?;
 * builder.position_at_entry(f)?;
 * builder.return_void()?;
 *
 * let mut lib = KernelSupportLibrary::new(&mut builder, true, false);
 * lib.for_loop("i", Value::int(0, 64), Value::int(8, 64), Value::int(1, 64), false, |lib, _i, first| {
 *     lib.emit_if_then(first, |_| Ok(()))
 * })?;
 * # Ok(())
 * # }
 * ```
 */

pub mod conditional;
pub mod loops;
pub mod outline;
pub mod support;

pub use support::KernelSupportLibrary;
pub use weft_core::{IrError, LoopHints, Result};
