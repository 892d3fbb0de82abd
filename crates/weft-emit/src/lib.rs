/*! Turn IR back into readable text.
 *
 * Emitted control flow is only trustworthy once someone has looked at it. Whether you're
 * debugging a new emitter, reviewing where a loop's hints ended up, or diffing two versions of a
 * kernel, this crate renders a module as plain text that keeps block structure and metadata
 * visible.
 */

pub mod config;
pub mod emitter;
pub mod text_emitter;

pub use config::{EmitterConfig, IndentStyle};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
pub use text_emitter::TextEmitter;
