use crate::support::KernelSupportLibrary;
use tracing::trace;
use weft_core::{ForLoop, Result, Value};

impl KernelSupportLibrary<'_> {
    /// Counted loop over `start..end` by `step` with the first iteration peeled.
    ///
    /// Guarded by `start < end`, the body is emitted once as straight-line code for `start`
    /// with `is_first = true`, then once more as the template of a real loop over the
    /// remaining range with `is_first = false`. The generator therefore runs exactly twice,
    /// whatever the trip count.
    pub fn for_peeled<B>(
        &mut self,
        name: &str,
        start: Value,
        end: Value,
        step: Value,
        mut body: B,
    ) -> Result<()>
    where
        B: FnMut(&mut Self, Value, bool) -> Result<()>,
    {
        ForLoop::bounds_type(self.builder, name, &start, &end, &step)?;
        trace!(loop_name = name, "peeling first iteration");

        let in_range = self.builder.lt(start.clone(), end.clone())?;
        self.emit_if_then(in_range, |lib| {
            body(lib, start.clone(), true)?;
            let next = lib.builder.add(start, step.clone())?;
            lib.for_each(name, next, end, step, |lib, induction| {
                body(lib, induction, false)
            })
        })
    }

    /// Counted loop over `start..end` by `step`; the body sees a runtime `bool` telling it
    /// whether it runs for the first iteration.
    ///
    /// With `peel_first_iteration` the first iteration is split off as in
    /// [`for_peeled`](Self::for_peeled) and the flag is a constant. Otherwise the body is
    /// emitted once, into the loop body block, and the flag is `induction == start`.
    pub fn for_loop<B>(
        &mut self,
        name: &str,
        start: Value,
        end: Value,
        step: Value,
        peel_first_iteration: bool,
        mut body: B,
    ) -> Result<()>
    where
        B: FnMut(&mut Self, Value, Value) -> Result<()>,
    {
        if peel_first_iteration {
            return self.for_peeled(name, start, end, step, |lib, induction, is_first| {
                let flag = lib.builder.const_bool(is_first);
                body(lib, induction, flag)
            });
        }

        let lp = self.begin_loop(name, start.clone(), end, step)?;
        let is_first = self.builder.eq(lp.indvar().clone(), start)?;
        body(self, lp.indvar().clone(), is_first)?;
        self.builder.position_at_end(lp.function, lp.exit_block())
    }

    /// Counted loop over `start..end` by `step` without a first-iteration flag.
    pub fn for_each<B>(
        &mut self,
        name: &str,
        start: Value,
        end: Value,
        step: Value,
        mut body: B,
    ) -> Result<()>
    where
        B: FnMut(&mut Self, Value) -> Result<()>,
    {
        let lp = self.begin_loop(name, start, end, step)?;
        body(self, lp.indvar().clone())?;
        self.builder.position_at_end(lp.function, lp.exit_block())
    }

    /// Builds the loop skeleton and leaves the cursor at the end of its body block.
    fn begin_loop(&mut self, name: &str, start: Value, end: Value, step: Value) -> Result<ForLoop> {
        let lp = ForLoop::emit(self.builder, name, start, end, step, self.hints())?;
        self.builder.position_at_end(lp.function, lp.body_block())?;
        Ok(lp)
    }
}
