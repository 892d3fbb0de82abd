use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use anyhow::Result;
use colored::Color;
use std::io::Write;
use weft_core::{
    block::BlockMetadata, BasicBlock, Function, Instruction, Linkage, Module, Terminator, Value,
};

/// Renders a module as text, one function at a time in registration order.
///
/// ```text
/// function internal kernel(p0: i64) {
///     block0:  ; entry
///         v0: bool = lt p0, 5i64
///         return
/// }
/// ```
pub struct TextEmitter {
    config: EmitterConfig,
}

impl TextEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Renders `module` using the configured indentation and colors.
    pub fn render(&self, module: &Module) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(module, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn write_to<W: Write>(&self, module: &Module, writer: &mut W) -> EmitResult {
        let mut context = EmitContext::from_config(&self.config);
        self.emit(module, writer, &mut context)
    }

    fn emit_function<W: Write>(
        &self,
        function: &Function,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let params = function
            .signature
            .params
            .iter()
            .enumerate()
            .map(|(i, ty)| format!("p{}: {}", i, ty))
            .collect::<Vec<_>>()
            .join(", ");
        let returns = function
            .signature
            .returns
            .as_ref()
            .map(|ty| format!(" -> {}", ty))
            .unwrap_or_default();

        let Some(body) = function.body.as_ref() else {
            let line = format!("declare {}({}){}", function.name(), params, returns);
            return EmitHelper::write_colored_line(writer, context, &line, Color::Blue);
        };

        let linkage = match function.linkage {
            Linkage::External => "",
            Linkage::Internal => "internal ",
        };
        let header = format!(
            "function {}{}({}){}",
            linkage,
            function.name(),
            params,
            returns
        );

        EmitHelper::write_block(writer, context, &header, |w, ctx| {
            for block in body.blocks.values() {
                self.emit_block(function, block, w, ctx)?;
            }
            Ok(())
        })
    }

    fn emit_block<W: Write>(
        &self,
        function: &Function,
        block: &BasicBlock,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let mut label = block.id.to_string();
        if !block.params.is_empty() {
            let params = block
                .params
                .iter()
                .enumerate()
                .map(|(i, param)| {
                    if self.config.include_types {
                        format!("{}.{}: {}", block.id, i, param.param_type)
                    } else {
                        format!("{}.{}", block.id, i)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            label.push_str(&format!("({})", params));
        }
        label.push_str(&format!(":  ; {}", block.name));
        if self.config.include_metadata {
            label.push_str(&format_metadata(&block.metadata));
        }
        EmitHelper::write_colored_line(writer, context, &label, Color::Cyan)?;

        context.indent();
        for inst in &block.instructions {
            let line = self.format_instruction(function, inst);
            EmitHelper::write_line(writer, context, &line)?;
        }
        EmitHelper::write_line(writer, context, &format_terminator(&block.terminator))?;
        context.dedent();
        Ok(())
    }

    fn format_instruction(&self, function: &Function, inst: &Instruction) -> String {
        let operands = join_values(inst.operands());

        if let Instruction::Call { callee, .. } = inst {
            return format!("call {}({})", callee, operands);
        }

        match inst.result() {
            Some(result) => {
                let ty = function
                    .value_type(result)
                    .ok()
                    .filter(|_| self.config.include_types)
                    .map(|ty| format!(": {}", ty))
                    .unwrap_or_default();
                format!("{}{} = {} {}", result, ty, inst.opcode(), operands)
            }
            None => format!("{} {}", inst.opcode(), operands),
        }
    }
}

impl Default for TextEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter for TextEmitter {
    type Item = Module;

    fn emit<W: Write>(
        &self,
        module: &Module,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let header = format!("module {}", module.name);
        EmitHelper::write_colored_line(writer, context, &header, Color::Green)?;
        for (_, function) in module.functions() {
            writeln!(writer)?;
            self.emit_function(function, writer, context)?;
        }
        Ok(())
    }
}

fn join_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_target(block: &weft_core::BlockId, args: &[Value]) -> String {
    if args.is_empty() {
        block.to_string()
    } else {
        format!("{}({})", block, join_values(args))
    }
}

fn format_terminator(term: &Terminator) -> String {
    match term {
        Terminator::Jump(target, args) => format!("jump {}", format_target(target, args)),
        Terminator::Branch {
            condition,
            then_block,
            then_args,
            else_block,
            else_args,
        } => format!(
            "branch {}, {}, {}",
            condition,
            format_target(then_block, then_args),
            format_target(else_block, else_args)
        ),
        Terminator::Return(Some(value)) => format!("return {}", value),
        Terminator::Return(None) => "return".to_string(),
        Terminator::Invalid => "<unterminated>".to_string(),
    }
}

fn format_metadata(metadata: &BlockMetadata) -> String {
    let mut tags = Vec::new();
    if metadata.is_loop_header {
        tags.push("loop_header");
    }
    if metadata.is_loop_exit {
        tags.push("loop_exit");
    }
    if let Some(hints) = metadata.loop_hints {
        if hints.prevent_unrolling {
            tags.push("no_unroll");
        }
        if hints.prevent_vectorization {
            tags.push("no_vectorize");
        }
    }

    if tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", tags.join(", "))
    }
}
