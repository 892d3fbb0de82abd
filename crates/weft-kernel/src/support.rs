use weft_core::{IrBuilder, LoopHints};

/// Emits structured control flow through a borrowed builder.
///
/// The loop hints are fixed at construction and attached to every loop this instance emits.
pub struct KernelSupportLibrary<'a> {
    pub(crate) builder: &'a mut IrBuilder,
    hints: LoopHints,
}

impl<'a> KernelSupportLibrary<'a> {
    /// Binds a library to `builder` with the given loop hints.
    pub fn new(
        builder: &'a mut IrBuilder,
        prevent_unrolling: bool,
        prevent_vectorization: bool,
    ) -> Self {
        Self::with_hints(
            builder,
            LoopHints::new(prevent_unrolling, prevent_vectorization),
        )
    }

    /// Like [`new`](Self::new), taking the hints as one value.
    pub fn with_hints(builder: &'a mut IrBuilder, hints: LoopHints) -> Self {
        Self { builder, hints }
    }

    pub fn builder(&mut self) -> &mut IrBuilder {
        self.builder
    }

    pub fn hints(&self) -> LoopHints {
        self.hints
    }
}
