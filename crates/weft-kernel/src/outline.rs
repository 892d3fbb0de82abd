use crate::support::KernelSupportLibrary;
use tracing::{debug, trace};
use weft_core::{Function, FunctionSignature, IrBuilder, Linkage, Result, Value};

impl KernelSupportLibrary<'_> {
    /// Calls the kernel named `kernel_name` with `arguments`, generating it first if the
    /// module has no function of that name.
    ///
    /// A new kernel takes one parameter per argument, typed like the argument, returns nothing
    /// and has internal linkage. Its entry block starts out as a bare `return`; `body` runs
    /// with the cursor just before that return and receives the kernel's parameters. The
    /// caller's cursor is restored afterwards, also when `body` fails, and the call is emitted
    /// there.
    ///
    /// An existing kernel is reused as is and `body` is not run. Arguments that don't match
    /// its parameters yield `IrError::SignatureMismatch`.
    pub fn emit_and_call_outlined_kernel<F>(
        builder: &mut IrBuilder,
        kernel_name: &str,
        arguments: &[Value],
        body: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut IrBuilder, &[Value]) -> Result<()>,
    {
        builder.current_block()?;

        let param_types = arguments
            .iter()
            .map(|arg| builder.value_type(arg))
            .collect::<Result<Vec<_>>>()?;

        let (kernel, created) = builder.module_mut().get_or_insert_with(kernel_name, || {
            Function::new(
                FunctionSignature::new(kernel_name, param_types),
                Linkage::Internal,
            )
        });

        if created {
            debug!(kernel = kernel_name, arity = arguments.len(), "generating outlined kernel");

            let mut guard = builder.guard();
            guard.position_at_entry(kernel)?;
            guard.return_void()?;
            let params = guard.module().function(kernel)?.param_values();
            body(&mut *guard, &params)?;
        } else {
            trace!(kernel = kernel_name, "reusing outlined kernel");
        }

        builder.call(kernel, arguments)
    }

    /// Method form of [`emit_and_call_outlined_kernel`](Self::emit_and_call_outlined_kernel).
    pub fn outlined_kernel<F>(&mut self, kernel_name: &str, arguments: &[Value], body: F) -> Result<()>
    where
        F: FnOnce(&mut IrBuilder, &[Value]) -> Result<()>,
    {
        Self::emit_and_call_outlined_kernel(self.builder, kernel_name, arguments, body)
    }
}
