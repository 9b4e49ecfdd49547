//! Rebuilding method bodies in the target identity space.

use ilweld_metadata::{
    CilBody, ExceptionHandler, Instruction, Local, MethodId, MethodOverride, Operand, TypeSig,
};

use crate::diagnostics::DiagnosticCode;
use crate::importer::{BodyNode, EditedMethodBody, ImportOp, Importer};

impl Importer<'_> {
    /// Wire pass: import bodies and explicit overrides for every created
    /// method. Stubs keep the target original's body.
    pub(crate) fn import_bodies_and_overrides(&mut self) -> ImportOp<()> {
        for plan in 0..self.plans.len() {
            let methods = self.plans[plan].created_methods.clone();
            for (source, target) in methods {
                // Stubs are target originals; their bodies are never touched
                // here, only the edited ones get a final pass.
                if self.stub_methods.contains(&source) {
                    continue;
                }
                let body = self.import_method_body(source, target, false)?;
                self.target.method_mut(target).body = body;

                let overrides = self.src().method(source).overrides.clone();
                let mut new_overrides = Vec::with_capacity(overrides.len());
                for ov in overrides {
                    let body_ref = self.import_method_ref(ov.body)?;
                    let declaration = self.import_method_ref(ov.declaration)?;
                    if let (Some(body_ref), Some(declaration)) = (body_ref, declaration) {
                        new_overrides.push(MethodOverride {
                            body: body_ref,
                            declaration,
                        });
                    }
                }
                self.target.method_mut(target).overrides = new_overrides;
            }
        }
        Ok(())
    }

    /// Final pass over the edited methods: translate the source body onto
    /// the target method, remapping parameters onto the target's parameter
    /// slots, and record it for the merger.
    pub(crate) fn fix_edited_methods(&mut self) -> ImportOp<()> {
        let edited = self.edited_methods_to_fix.clone();
        for (source_method, target_method) in edited {
            let new_body = self.import_method_body(source_method, target_method, true)?;
            let impl_attributes = self.src().method(source_method).impl_attributes;
            let declaring = match self.src().method(source_method).declaring_type {
                Some(t) => t,
                None => {
                    return self
                        .fatal_internal("edited source method has no declaring type".to_string())
                }
            };
            let plan = match self.type_map.get(&declaring) {
                Some(&p) => p,
                None => {
                    return self.fatal_internal(
                        "declaring type of the edited method was never planned".to_string(),
                    )
                }
            };
            self.plans[plan].edited_method_bodies.push(EditedMethodBody {
                target_method,
                new_body,
                impl_attributes,
            });
        }
        Ok(())
    }

    /// Rebuild one body. The scratch map is cleared per body; locals and
    /// instructions map index-for-index, parameters map with the hidden
    /// `this` of each side skipped independently.
    pub(crate) fn import_method_body(
        &mut self,
        source_method: MethodId,
        target_method: MethodId,
        edited: bool,
    ) -> ImportOp<Option<CilBody>> {
        let source_body = match self.src().method(source_method).body.clone() {
            Some(b) => b,
            None => return Ok(None),
        };

        let mut new_body = CilBody {
            keep_old_max_stack: source_body.keep_old_max_stack,
            init_locals: source_body.init_locals,
            header_size: source_body.header_size,
            max_stack: source_body.max_stack,
            local_var_sig_tok: source_body.local_var_sig_tok,
            variables: Vec::with_capacity(source_body.variables.len()),
            instructions: Vec::with_capacity(source_body.instructions.len()),
            exception_handlers: Vec::with_capacity(source_body.exception_handlers.len()),
        };

        self.body_map.clear();
        for (index, local) in source_body.variables.iter().enumerate() {
            let ty = self.import_type_sig(&local.ty)?.unwrap_or(TypeSig::Object);
            new_body.variables.push(Local {
                ty,
                name: local.name.clone(),
            });
            self.body_map
                .insert(BodyNode::Local(index), BodyNode::Local(index));
        }

        self.map_parameters(source_method, target_method, edited)?;

        for (index, instruction) in source_body.instructions.iter().enumerate() {
            new_body.instructions.push(Instruction {
                opcode: instruction.opcode,
                operand: instruction.operand.clone(),
                offset: instruction.offset,
                sequence_point: instruction.sequence_point.clone(),
            });
            self.body_map
                .insert(BodyNode::Instr(index), BodyNode::Instr(index));
        }

        for handler in &source_body.exception_handlers {
            let catch_type = match handler.catch_type {
                Some(t) => self.import_type_def_or_ref(t)?,
                None => None,
            };
            new_body.exception_handlers.push(ExceptionHandler {
                kind: handler.kind,
                try_start: self.map_instr_index(handler.try_start),
                try_end: self.map_instr_index(handler.try_end),
                filter_start: self.map_instr_index(handler.filter_start),
                handler_start: self.map_instr_index(handler.handler_start),
                handler_end: self.map_instr_index(handler.handler_end),
                catch_type,
            });
        }

        // Second pass: translate operands now that every in-body handle is
        // registered.
        for index in 0..new_body.instructions.len() {
            let operand = new_body.instructions[index].operand.clone();
            new_body.instructions[index].operand = self.import_operand(operand)?;
        }

        Ok(Some(new_body))
    }

    /// Register source→target parameter slots. Sides skip their own hidden
    /// `this` independently; a static toggle is only legal on the edited
    /// method, where it is diagnosed and the import continues.
    fn map_parameters(
        &mut self,
        source_method: MethodId,
        target_method: MethodId,
        edited: bool,
    ) -> ImportOp<()> {
        let (source_has_this, source_params) = {
            let sig = &self.src().method(source_method).signature;
            (sig.has_this, sig.params.len())
        };
        let (target_has_this, target_params) = {
            let sig = &self.target.method(target_method).signature;
            (sig.has_this, sig.params.len())
        };
        if source_has_this != target_has_this && edited {
            let name = self.target.method(target_method).name.clone();
            self.report(
                DiagnosticCode::IM0009,
                format!("{}: {name}", DiagnosticCode::IM0009.default_message()),
            );
        }
        if source_params != target_params {
            return self.fatal_internal(format!(
                "parameter count changed from {target_params} to {source_params}"
            ));
        }
        let source_base = u16::from(source_has_this);
        let target_base = u16::from(target_has_this);
        if source_has_this && target_has_this {
            self.body_map
                .insert(BodyNode::Param(0), BodyNode::Param(0));
        }
        for index in 0..source_params as u16 {
            self.body_map.insert(
                BodyNode::Param(source_base + index),
                BodyNode::Param(target_base + index),
            );
        }
        Ok(())
    }

    fn map_instr_index(&self, index: Option<usize>) -> Option<usize> {
        index.and_then(|i| match self.body_map.get(&BodyNode::Instr(i)) {
            Some(&BodyNode::Instr(mapped)) => Some(mapped),
            _ => None,
        })
    }

    fn import_operand(&mut self, operand: Operand) -> ImportOp<Operand> {
        let imported = match operand {
            Operand::Local(index) => match self.body_map.get(&BodyNode::Local(index)) {
                Some(&BodyNode::Local(mapped)) => Operand::Local(mapped),
                _ => Operand::Local(index),
            },
            Operand::Param(index) => match self.body_map.get(&BodyNode::Param(index)) {
                Some(&BodyNode::Param(mapped)) => Operand::Param(mapped),
                _ => Operand::Param(index),
            },
            Operand::Instr(index) => match self.body_map.get(&BodyNode::Instr(index)) {
                Some(&BodyNode::Instr(mapped)) => Operand::Instr(mapped),
                _ => Operand::Instr(index),
            },
            Operand::InstrList(targets) => Operand::InstrList(
                targets
                    .into_iter()
                    .map(|i| match self.body_map.get(&BodyNode::Instr(i)) {
                        Some(&BodyNode::Instr(mapped)) => mapped,
                        _ => i,
                    })
                    .collect(),
            ),
            Operand::Type(tdr) => match self.import_type_def_or_ref(tdr)? {
                Some(t) => Operand::Type(t),
                None => Operand::None,
            },
            Operand::Method(m) => match self.import_method_ref(m)? {
                Some(m) => Operand::Method(m),
                None => Operand::None,
            },
            Operand::Field(f) => match self.import_field_ref(f)? {
                Some(f) => Operand::Field(f),
                None => Operand::None,
            },
            Operand::Sig(sig) => match self.import_calling_convention_sig(&sig)? {
                Some(s) => Operand::Sig(Box::new(s)),
                None => Operand::None,
            },
            // Primitive constants are left intact.
            other => other,
        };
        Ok(imported)
    }
}
