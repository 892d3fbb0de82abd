/*! Structural checks over emitted IR.
 *
 * Emission code is easy to get subtly wrong: a block left without a terminator, an edge to a
 * block that was never created, a continuation that only one arm of a conditional reaches.
 * The CFG view answers reachability and dominance questions, and the verifier rejects
 * malformed functions outright.
 */

pub mod cfg;
pub mod verify;

pub use cfg::{ControlFlowGraph, Loop, LoopAnalysis};
pub use verify::{verify_function, verify_module};
