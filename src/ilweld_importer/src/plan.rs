//! Deciding the fate of every source type: merged onto an existing target
//! type or created fresh, recursing through nested types.

use ilweld_metadata::{EventId, FieldId, MethodId, PropertyId, TypeDef, TypeDefId};

use crate::compare::{method_ref_key, SigComparer};
use crate::diagnostics::DiagnosticCode;
use crate::importer::{EditedMethodBody, ImportOp, Importer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlanKind {
    New,
    Merged { rename_duplicates: bool },
}

/// One planned source type. `created_*` lists pair each freshly created
/// target row with the source row it came from; for merged types these are
/// exactly the "new members" handed to the merger.
#[derive(Debug)]
pub(crate) struct TypePlan {
    pub kind: PlanKind,
    pub source_type: TypeDefId,
    pub target_type: TypeDefId,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub created_fields: Vec<(FieldId, FieldId)>,
    pub created_methods: Vec<(MethodId, MethodId)>,
    pub created_properties: Vec<(PropertyId, PropertyId)>,
    pub created_events: Vec<(EventId, EventId)>,
    pub edited_method_bodies: Vec<EditedMethodBody>,
}

impl TypePlan {
    fn new(kind: PlanKind, source_type: TypeDefId, target_type: TypeDefId, parent: Option<usize>) -> Self {
        TypePlan {
            kind,
            source_type,
            target_type,
            parent,
            children: Vec::new(),
            created_fields: Vec::new(),
            created_methods: Vec::new(),
            created_properties: Vec::new(),
            created_events: Vec::new(),
            edited_method_bodies: Vec::new(),
        }
    }
}

impl Importer<'_> {
    /// Locate the source-side counterpart of the edited target method.
    pub(crate) fn find_edited_method(&mut self, target_method: MethodId) -> ImportOp<MethodId> {
        let target_type = match self.target.method(target_method).declaring_type {
            Some(t) => t,
            None => return self.fatal_internal("edited method has no declaring type".to_string()),
        };

        // Declaring chain of the edited method, outermost first.
        let mut chain = vec![target_type];
        while let Some(up) = self.target.type_def(*chain.last().unwrap()).enclosing_type {
            chain.push(up);
        }
        chain.reverse();
        let names: Vec<(String, String)> = chain
            .iter()
            .map(|&t| {
                let td = self.target.type_def(t);
                (td.namespace.clone(), td.name.clone())
            })
            .collect();

        let mut source_type = match self.src().find_top_level_type(&names[0].0, &names[0].1) {
            Some(t) => t,
            None => {
                let full = self.target.type_def(chain[0]).full_name();
                return self.fatal(
                    DiagnosticCode::IM0001,
                    format!(
                        "{}: {full}",
                        DiagnosticCode::IM0001.default_message()
                    ),
                );
            }
        };
        for (ns, name) in &names[1..] {
            source_type = match self.src().find_nested_type(source_type, ns, name) {
                Some(t) => t,
                None => {
                    return self.fatal(
                        DiagnosticCode::IM0001,
                        format!("{}: {name}", DiagnosticCode::IM0001.default_message()),
                    )
                }
            };
        }

        // Signature match ignores scope, and tolerates a static toggle so
        // the unsupported edit is still found and diagnosed later.
        let target_name = self.target.method(target_method).name.clone();
        let target_sig = self.target.method(target_method).signature.clone();
        let methods = self.src().type_def(source_type).methods.clone();
        let mut candidates = Vec::new();
        {
            let cmp = SigComparer::new(self.src(), self.target);
            for &m in &methods {
                let md = self.src().method(m);
                if md.name == target_name
                    && cmp.method_sigs_equal_ignore_this(&md.signature, &target_sig)
                {
                    candidates.push(m);
                }
            }
        }
        match candidates.len() {
            0 => self.fatal(
                DiagnosticCode::IM0002,
                format!("{}: {target_name}", DiagnosticCode::IM0002.default_message()),
            ),
            1 => Ok(candidates[0]),
            _ => {
                // Disambiguate on the first explicit override.
                let target_override = self
                    .target
                    .method(target_method)
                    .overrides
                    .first()
                    .and_then(|ov| method_ref_key(self.target, ov.declaration));
                let picked = candidates.iter().copied().find(|&m| {
                    let source_override = self
                        .src()
                        .method(m)
                        .overrides
                        .first()
                        .and_then(|ov| method_ref_key(self.src(), ov.declaration));
                    source_override.is_some() && source_override == target_override
                });
                match picked {
                    Some(m) => Ok(m),
                    None => self.fatal(
                        DiagnosticCode::IM0002,
                        format!("{}: {target_name}", DiagnosticCode::IM0002.default_message()),
                    ),
                }
            }
        }
    }

    /// Build the full type plan: the edited declaring chain is merged in
    /// place, the global type is merged with renaming, and every other
    /// top-level source type becomes a new target type.
    pub(crate) fn plan_types(
        &mut self,
        source_method: MethodId,
        target_method: MethodId,
    ) -> ImportOp<()> {
        let mut source_type = match self.src().method(source_method).declaring_type {
            Some(t) => t,
            None => return self.fatal_internal("source method has no declaring type".to_string()),
        };
        let mut target_type = match self.target.method(target_method).declaring_type {
            Some(t) => t,
            None => return self.fatal_internal("edited method has no declaring type".to_string()),
        };
        loop {
            let source_up = self.src().type_def(source_type).enclosing_type;
            let target_up = self.target.type_def(target_type).enclosing_type;
            match (source_up, target_up) {
                (Some(s), Some(t)) => {
                    source_type = s;
                    target_type = t;
                }
                (None, None) => break,
                _ => {
                    return self.fatal_internal(
                        "declaring type nesting depth differs between source and target"
                            .to_string(),
                    )
                }
            }
        }
        self.plan_merged_pair(source_type, target_type, false, None)?;

        if let (Some(source_global), Some(target_global)) =
            (self.src().global_type(), self.target.global_type())
        {
            if !self.type_map.contains_key(&source_global) {
                self.plan_merged_pair(source_global, target_global, true, None)?;
            }
        }

        let top_level: Vec<TypeDefId> = self.src().top_level_types.clone();
        for t in top_level {
            if !self.type_map.contains_key(&t) {
                self.plan_new_type(t, None)?;
            }
        }

        self.edited_methods_to_fix.push((source_method, target_method));
        Ok(())
    }

    fn plan_merged_pair(
        &mut self,
        source_type: TypeDefId,
        target_type: TypeDefId,
        rename_duplicates: bool,
        parent: Option<usize>,
    ) -> ImportOp<usize> {
        let plan_id = self.plans.len();
        self.plans.push(TypePlan::new(
            PlanKind::Merged { rename_duplicates },
            source_type,
            target_type,
            parent,
        ));
        self.type_map.insert(source_type, plan_id);
        if let Some(p) = parent {
            self.plans[p].children.push(plan_id);
        }

        let nested: Vec<TypeDefId> = self.src().type_def(source_type).nested_types.clone();
        for source_nested in nested {
            let (ns, name) = {
                let td = self.src().type_def(source_nested);
                (td.namespace.clone(), td.name.clone())
            };
            match self.target.find_nested_type(target_type, &ns, &name) {
                // Name match merges the pair; a target-side type with no
                // source counterpart is left alone.
                Some(target_nested) => {
                    self.plan_merged_pair(source_nested, target_nested, rename_duplicates, Some(plan_id))?;
                }
                None => {
                    self.plan_new_type(source_nested, Some((plan_id, target_type)))?;
                }
            }
        }
        Ok(plan_id)
    }

    fn plan_new_type(
        &mut self,
        source_type: TypeDefId,
        parent: Option<(usize, TypeDefId)>,
    ) -> ImportOp<usize> {
        let (namespace, mut name, attributes) = {
            let td = self.src().type_def(source_type);
            (td.namespace.clone(), td.name.clone(), td.attributes)
        };
        if parent.is_none() {
            name = self.unique_top_level_name(&namespace, &name);
        }
        let mut shell = TypeDef::new(namespace, name);
        shell.attributes = attributes;
        let target_type = self.target.alloc_type_def(shell);

        let plan_id = self.plans.len();
        match parent {
            Some((parent_plan, enclosing_target)) => {
                self.target.type_def_mut(target_type).enclosing_type = Some(enclosing_target);
                // A nested type under a fresh parent lives inside the new
                // tree; under a merged parent the merger adds it.
                if self.plans[parent_plan].kind == PlanKind::New {
                    self.target
                        .type_def_mut(enclosing_target)
                        .nested_types
                        .push(target_type);
                }
                self.plans.push(TypePlan::new(
                    PlanKind::New,
                    source_type,
                    target_type,
                    Some(parent_plan),
                ));
                self.plans[parent_plan].children.push(plan_id);
            }
            None => {
                self.plans
                    .push(TypePlan::new(PlanKind::New, source_type, target_type, None));
            }
        }
        self.type_map.insert(source_type, plan_id);

        let nested: Vec<TypeDefId> = self.src().type_def(source_type).nested_types.clone();
        for source_nested in nested {
            self.plan_new_type(source_nested, Some((plan_id, target_type)))?;
        }
        Ok(plan_id)
    }

    /// Pick a top-level name that collides with nothing already in the
    /// target nor with a name claimed by an earlier new type. The `__N__`
    /// prefix leaves any generic arity suffix in place.
    fn unique_top_level_name(&mut self, namespace: &str, name: &str) -> String {
        let is_free = |me: &Self, candidate: &str| {
            me.target.find_top_level_type(namespace, candidate).is_none()
                && !me
                    .claimed_type_names
                    .contains(&(namespace.to_string(), candidate.to_string()))
        };
        let mut picked = name.to_string();
        if !is_free(self, &picked) {
            let mut counter = 0usize;
            loop {
                let candidate = format!("__{counter}__{name}");
                if is_free(self, &candidate) {
                    picked = candidate;
                    break;
                }
                counter += 1;
            }
        }
        self.claimed_type_names
            .insert((namespace.to_string(), picked.clone()));
        picked
    }
}
