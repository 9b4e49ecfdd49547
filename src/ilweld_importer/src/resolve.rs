//! Translating type handles from the source identity space into the target.

use ilweld_metadata::{
    AssemblyRefId, ModuleRefId, TypeDefOrRef, TypeRef, TypeRefId, TypeRefScope, TypeSpecId,
};

use crate::diagnostics::DiagnosticCode;
use crate::importer::{ImportOp, Importer};
use crate::scope::ScopeKind;

/// Bound on nested type-reference scope chains; longer chains resolve to
/// null instead of overflowing the stack.
pub(crate) const MAX_SCOPE_RECURSION: usize = 500;

impl Importer<'_> {
    /// Resolve a source type handle to its target counterpart. `Ok(None)`
    /// means the reference could not be resolved; a diagnostic has already
    /// been emitted where one is warranted.
    pub(crate) fn import_type_def_or_ref(
        &mut self,
        tdr: TypeDefOrRef,
    ) -> ImportOp<Option<TypeDefOrRef>> {
        match tdr {
            TypeDefOrRef::Def(id) => match self.type_map.get(&id) {
                Some(&plan) => Ok(Some(TypeDefOrRef::Def(self.plans[plan].target_type))),
                None => {
                    let full = self.src().type_def(id).full_name();
                    self.fatal_internal(format!("source type was never planned: {full}"))
                }
            },
            TypeDefOrRef::Ref(id) => self.import_type_ref(id),
            TypeDefOrRef::Spec(id) => self.import_type_spec(id),
        }
    }

    fn import_type_ref(&mut self, type_ref: TypeRefId) -> ImportOp<Option<TypeDefOrRef>> {
        if let Some(&cached) = self.type_ref_map.get(&type_ref) {
            return Ok(Some(cached));
        }

        // Walk to the outermost enclosing reference; its scope decides
        // everything.
        let mut chain = vec![type_ref];
        let mut outer_scope = self.src().type_ref(type_ref).scope;
        while let TypeRefScope::TypeRef(outer) = outer_scope {
            if chain.len() >= MAX_SCOPE_RECURSION {
                return Ok(None);
            }
            chain.push(outer);
            outer_scope = self.src().type_ref(outer).scope;
        }

        match self.classify_type_ref_scope(outer_scope) {
            ScopeKind::Target => {
                let mut walk = chain.iter().rev();
                let &outermost = walk.next().expect("chain is never empty");
                let (ns, name) = {
                    let tr = self.src().type_ref(outermost);
                    (tr.namespace.clone(), tr.name.clone())
                };
                let mut resolved = match self.target.find_top_level_type(&ns, &name) {
                    Some(t) => t,
                    None => {
                        self.report(
                            DiagnosticCode::IM0003,
                            format!("{}: {ns}.{name}", DiagnosticCode::IM0003.default_message()),
                        );
                        return Ok(None);
                    }
                };
                for &nested in walk {
                    let (ns, name) = {
                        let tr = self.src().type_ref(nested);
                        (tr.namespace.clone(), tr.name.clone())
                    };
                    resolved = match self.target.find_nested_type(resolved, &ns, &name) {
                        Some(t) => t,
                        None => {
                            self.report(
                                DiagnosticCode::IM0003,
                                format!(
                                    "{}: {name}",
                                    DiagnosticCode::IM0003.default_message()
                                ),
                            );
                            return Ok(None);
                        }
                    };
                }
                let result = TypeDefOrRef::Def(resolved);
                self.type_ref_map.insert(type_ref, result);
                Ok(Some(result))
            }
            ScopeKind::Source => {
                let full = self.src().type_ref(type_ref).full_name();
                self.fatal_internal(format!(
                    "type reference {full} is scoped to the source module"
                ))
            }
            ScopeKind::Foreign => match self.import_foreign_type_ref(type_ref, 0)? {
                Some(new_ref) => Ok(Some(TypeDefOrRef::Ref(new_ref))),
                None => Ok(None),
            },
        }
    }

    /// Synthesize a target-side reference for a foreign type, translating
    /// the scope chain and carrying custom attributes over.
    fn import_foreign_type_ref(
        &mut self,
        type_ref: TypeRefId,
        depth: usize,
    ) -> ImportOp<Option<TypeRefId>> {
        if depth >= MAX_SCOPE_RECURSION {
            return Ok(None);
        }
        if let Some(&TypeDefOrRef::Ref(cached)) = self.type_ref_map.get(&type_ref) {
            return Ok(Some(cached));
        }

        let (scope, namespace, name, attrs) = {
            let tr = self.src().type_ref(type_ref);
            (
                tr.scope,
                tr.namespace.clone(),
                tr.name.clone(),
                tr.custom_attributes.clone(),
            )
        };
        let new_scope = match scope {
            TypeRefScope::AssemblyRef(id) => {
                TypeRefScope::AssemblyRef(self.import_assembly_ref(id))
            }
            TypeRefScope::ModuleRef(id) => TypeRefScope::ModuleRef(self.import_module_ref(id)),
            TypeRefScope::Module => {
                return self.fatal_internal(format!(
                    "module-scoped type reference {namespace}.{name} classified as foreign"
                ));
            }
            TypeRefScope::TypeRef(outer) => {
                match self.import_foreign_type_ref(outer, depth + 1)? {
                    Some(new_outer) => TypeRefScope::TypeRef(new_outer),
                    None => return Ok(None),
                }
            }
        };

        let new_ref = self
            .target
            .alloc_type_ref(TypeRef::new(new_scope, namespace, name));
        // Register before attribute import so cyclic references terminate.
        self.type_ref_map
            .insert(type_ref, TypeDefOrRef::Ref(new_ref));
        let imported_attrs = self.import_custom_attributes(&attrs)?;
        self.target.type_ref_mut(new_ref).custom_attributes = imported_attrs;
        Ok(Some(new_ref))
    }

    fn import_type_spec(&mut self, spec: TypeSpecId) -> ImportOp<Option<TypeDefOrRef>> {
        let sig = self.src().type_spec(spec).sig.clone();
        match self.import_type_sig(&sig)? {
            Some(imported) => {
                let new_spec = self.target.alloc_type_spec(imported);
                Ok(Some(TypeDefOrRef::Spec(new_spec)))
            }
            None => Ok(None),
        }
    }

    /// Reuse a matching target assembly reference or clone the source one.
    pub(crate) fn import_assembly_ref(&mut self, id: AssemblyRefId) -> AssemblyRefId {
        let info = self.src().assembly_ref(id).info.clone();
        let existing = self
            .target
            .assembly_refs()
            .find(|(_, r)| r.info.matches(&info))
            .map(|(id, _)| id);
        match existing {
            Some(found) => found,
            None => self.target.alloc_assembly_ref(info),
        }
    }

    pub(crate) fn import_module_ref(&mut self, id: ModuleRefId) -> ModuleRefId {
        let name = self.src().module_ref(id).name.clone();
        let existing = self
            .target
            .module_refs()
            .find(|(_, r)| r.name.eq_ignore_ascii_case(&name))
            .map(|(id, _)| id);
        match existing {
            Some(found) => found,
            None => self.target.alloc_module_ref(name),
        }
    }
}
