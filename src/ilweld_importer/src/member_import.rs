//! Translating members: fields, methods, properties, events, params,
//! generic params, custom attributes, marshal descriptors, security and
//! member references.
//!
//! Member import is split into a creation pass that allocates target rows
//! and registers them in the identity maps, and a fill pass that translates
//! signatures and attached records. Registering before filling is what makes
//! cyclic references terminate.

use ilweld_metadata::{
    CaArgument, CaNamedArgument, CaValue, CallingConventionSig, CustomAttribute, DeclSecurity,
    EventDef, EventId, FieldDef, FieldId, FieldRef, FieldSig, GenericParam, GenericParamId,
    ImplMap, InterfaceImpl, MarshalType, MemberRef, MemberRefId, MemberRefParent, MethodDef,
    MethodId, MethodRef, MethodSig, MethodSpec, Param, PropertyDef, PropertyId, PropertySig,
    SecurityAttribute, TypeDefId, TypeDefOrRef, TypeSig,
};

use crate::compare::SigComparer;
use crate::diagnostics::DiagnosticCode;
use crate::importer::{ImportOp, Importer};
use crate::plan::PlanKind;
use crate::scope::ScopeKind;

impl Importer<'_> {
    /// Creation pass: allocate target rows for every source field and method
    /// and register the identity maps. Members of merged types that match a
    /// target original become stubs instead.
    pub(crate) fn create_members(&mut self) -> ImportOp<()> {
        // Pre-map the edited methods so member matching treats them as
        // stubs even when the static flag was toggled.
        let edited = self.edited_methods_to_fix.clone();
        for (source_method, target_method) in edited {
            self.method_map.insert(source_method, target_method);
            self.stub_methods.insert(source_method);
        }
        for plan in 0..self.plans.len() {
            self.create_type_members(plan)?;
        }
        Ok(())
    }

    fn create_type_members(&mut self, plan: usize) -> ImportOp<()> {
        let kind = self.plans[plan].kind;
        let source_type = self.plans[plan].source_type;
        let target_type = self.plans[plan].target_type;
        let match_existing = matches!(
            kind,
            PlanKind::Merged {
                rename_duplicates: false
            }
        );
        let append_to_type = kind == PlanKind::New;

        let fields: Vec<FieldId> = self.src().type_def(source_type).fields.clone();
        for field in fields {
            if match_existing {
                if let Some(existing) = self.find_matching_target_field(field, target_type) {
                    self.field_map.insert(field, existing);
                    continue;
                }
            }
            let new_field = self.create_field_row(field);
            self.field_map.insert(field, new_field);
            if append_to_type {
                self.target.type_def_mut(target_type).fields.push(new_field);
            }
            self.plans[plan].created_fields.push((field, new_field));
        }

        let methods: Vec<MethodId> = self.src().type_def(source_type).methods.clone();
        for method in methods {
            if self.method_map.contains_key(&method) {
                continue;
            }
            if match_existing {
                if let Some(existing) = self.find_matching_target_method(method, target_type) {
                    self.method_map.insert(method, existing);
                    self.stub_methods.insert(method);
                    continue;
                }
            }
            let new_method = self.create_method_row(method, target_type);
            self.method_map.insert(method, new_method);
            if append_to_type {
                self.target
                    .type_def_mut(target_type)
                    .methods
                    .push(new_method);
            }
            self.plans[plan].created_methods.push((method, new_method));
        }
        Ok(())
    }

    fn create_field_row(&mut self, source: FieldId) -> FieldId {
        let (name, attributes) = {
            let fd = self.src().field(source);
            (fd.name.clone(), fd.attributes)
        };
        let mut row = FieldDef::new(name, FieldSig { ty: TypeSig::Void });
        row.attributes = attributes;
        self.target.alloc_field(row)
    }

    fn create_method_row(&mut self, source: MethodId, declaring_type: TypeDefId) -> MethodId {
        let (name, attributes, impl_attributes, semantics) = {
            let md = self.src().method(source);
            (md.name.clone(), md.attributes, md.impl_attributes, md.semantics)
        };
        let mut row = MethodDef::new(name, MethodSig::static_method(TypeSig::Void, Vec::new()));
        row.attributes = attributes;
        row.impl_attributes = impl_attributes;
        row.semantics = semantics;
        row.declaring_type = Some(declaring_type);
        self.target.alloc_method(row)
    }

    /// Fill pass for fresh target types: base type, interfaces, layout,
    /// generic params, attributes and security. Merged target types keep
    /// their own type-level state.
    pub(crate) fn fill_type_infos(&mut self) -> ImportOp<()> {
        for plan in 0..self.plans.len() {
            if self.plans[plan].kind != PlanKind::New {
                continue;
            }
            let source_type = self.plans[plan].source_type;
            let target_type = self.plans[plan].target_type;
            let (base, interfaces, layout, generic_params, attrs, security) = {
                let td = self.src().type_def(source_type);
                (
                    td.base_type,
                    td.interface_impls.clone(),
                    td.class_layout,
                    td.generic_params.clone(),
                    td.custom_attributes.clone(),
                    td.decl_security.clone(),
                )
            };
            let base = match base {
                Some(b) => self.import_type_def_or_ref(b)?,
                None => None,
            };
            let mut new_interfaces = Vec::with_capacity(interfaces.len());
            for ii in &interfaces {
                if let Some(interface) = self.import_type_def_or_ref(ii.interface)? {
                    let custom_attributes = self.import_custom_attributes(&ii.custom_attributes)?;
                    new_interfaces.push(InterfaceImpl {
                        interface,
                        custom_attributes,
                    });
                }
            }
            let new_generic_params = self.import_generic_params(&generic_params)?;
            let custom_attributes = self.import_custom_attributes(&attrs)?;
            let decl_security = self.import_decl_securities(&security)?;
            let td = self.target.type_def_mut(target_type);
            td.base_type = base;
            td.interface_impls = new_interfaces;
            td.class_layout = layout;
            td.generic_params = new_generic_params;
            td.custom_attributes = custom_attributes;
            td.decl_security = decl_security;
        }
        Ok(())
    }

    /// Fill pass over every created field and method row.
    pub(crate) fn fill_members(&mut self) -> ImportOp<()> {
        for plan in 0..self.plans.len() {
            let fields = self.plans[plan].created_fields.clone();
            for (source, target) in fields {
                self.fill_field(source, target)?;
            }
            let methods = self.plans[plan].created_methods.clone();
            for (source, target) in methods {
                self.fill_method(source, target)?;
            }
        }
        Ok(())
    }

    fn fill_field(&mut self, source: FieldId, target: FieldId) -> ImportOp<()> {
        let (sig, constant, marshal, rva, initial_value, field_offset, impl_map, attrs) = {
            let fd = self.src().field(source);
            (
                fd.signature.clone(),
                fd.constant.clone(),
                fd.marshal.clone(),
                fd.rva,
                fd.initial_value.clone(),
                fd.field_offset,
                fd.impl_map.clone(),
                fd.custom_attributes.clone(),
            )
        };
        let imported_sig = self.import_field_sig(&sig)?;
        let marshal = match marshal {
            Some(m) => Some(self.import_marshal(&m)?),
            None => None,
        };
        let impl_map = impl_map.map(|im| ImplMap {
            module: self.import_module_ref(im.module),
            name: im.name,
            attributes: im.attributes,
        });
        let custom_attributes = self.import_custom_attributes(&attrs)?;
        let rva = if self.options.keep_imported_rva { rva } else { 0 };
        let fd = self.target.field_mut(target);
        if let Some(sig) = imported_sig {
            fd.signature = sig;
        }
        fd.constant = constant;
        fd.marshal = marshal;
        fd.rva = rva;
        fd.initial_value = initial_value;
        fd.field_offset = field_offset;
        fd.impl_map = impl_map;
        fd.custom_attributes = custom_attributes;
        Ok(())
    }

    fn fill_method(&mut self, source: MethodId, target: MethodId) -> ImportOp<()> {
        let (sig, param_ids, generic_param_ids, impl_map, attrs, security) = {
            let md = self.src().method(source);
            (
                md.signature.clone(),
                md.params.clone(),
                md.generic_params.clone(),
                md.impl_map.clone(),
                md.custom_attributes.clone(),
                md.decl_security.clone(),
            )
        };
        let imported_sig = self.import_method_sig(&sig)?;
        let mut new_params = Vec::with_capacity(param_ids.len());
        for param_id in param_ids {
            let param = self.src().param(param_id).clone();
            let marshal = match param.marshal {
                Some(m) => Some(self.import_marshal(&m)?),
                None => None,
            };
            let custom_attributes = self.import_custom_attributes(&param.custom_attributes)?;
            new_params.push(self.target.alloc_param(Param {
                rid: 0,
                sequence: param.sequence,
                name: param.name,
                attributes: param.attributes,
                constant: param.constant,
                marshal,
                custom_attributes,
            }));
        }
        let new_generic_params = self.import_generic_params(&generic_param_ids)?;
        let impl_map = impl_map.map(|im| ImplMap {
            module: self.import_module_ref(im.module),
            name: im.name,
            attributes: im.attributes,
        });
        let custom_attributes = self.import_custom_attributes(&attrs)?;
        let decl_security = self.import_decl_securities(&security)?;
        let md = self.target.method_mut(target);
        if let Some(sig) = imported_sig {
            md.signature = sig;
        }
        md.params = new_params;
        md.generic_params = new_generic_params;
        md.impl_map = impl_map;
        md.custom_attributes = custom_attributes;
        md.decl_security = decl_security;
        Ok(())
    }

    /// Properties and events come after methods so accessors can be rebound
    /// through the method map.
    pub(crate) fn import_properties_and_events(&mut self) -> ImportOp<()> {
        for plan in 0..self.plans.len() {
            let kind = self.plans[plan].kind;
            let source_type = self.plans[plan].source_type;
            let target_type = self.plans[plan].target_type;
            let match_existing = matches!(
                kind,
                PlanKind::Merged {
                    rename_duplicates: false
                }
            );
            let append_to_type = kind == PlanKind::New;

            let properties: Vec<PropertyId> =
                self.src().type_def(source_type).properties.clone();
            for property in properties {
                if match_existing {
                    if let Some(existing) =
                        self.find_matching_target_property(property, target_type)
                    {
                        self.property_map.insert(property, existing);
                        continue;
                    }
                }
                let new_property = self.import_property(property)?;
                self.property_map.insert(property, new_property);
                if append_to_type {
                    self.target
                        .type_def_mut(target_type)
                        .properties
                        .push(new_property);
                }
                self.plans[plan].created_properties.push((property, new_property));
            }

            let events: Vec<EventId> = self.src().type_def(source_type).events.clone();
            for event in events {
                if match_existing {
                    if let Some(existing) = self.find_matching_target_event(event, target_type) {
                        self.event_map.insert(event, existing);
                        continue;
                    }
                }
                let new_event = self.import_event(event)?;
                self.event_map.insert(event, new_event);
                if append_to_type {
                    self.target.type_def_mut(target_type).events.push(new_event);
                }
                self.plans[plan].created_events.push((event, new_event));
            }
        }
        Ok(())
    }

    fn import_property(&mut self, source: PropertyId) -> ImportOp<PropertyId> {
        let pd = self.src().property(source).clone();
        let signature = self.import_property_sig(&pd.signature)?.unwrap_or(PropertySig {
            has_this: pd.signature.has_this,
            ret: TypeSig::Void,
            params: Vec::new(),
        });
        let get_method = pd.get_method.and_then(|m| self.method_map.get(&m).copied());
        let set_method = pd.set_method.and_then(|m| self.method_map.get(&m).copied());
        let other_methods = pd
            .other_methods
            .iter()
            .filter_map(|m| self.method_map.get(m).copied())
            .collect();
        let custom_attributes = self.import_custom_attributes(&pd.custom_attributes)?;
        Ok(self.target.alloc_property(PropertyDef {
            rid: 0,
            name: pd.name,
            attributes: pd.attributes,
            signature,
            constant: pd.constant,
            get_method,
            set_method,
            other_methods,
            custom_attributes,
        }))
    }

    fn import_event(&mut self, source: EventId) -> ImportOp<EventId> {
        let ed = self.src().event(source).clone();
        let event_type = match ed.event_type {
            Some(t) => self.import_type_def_or_ref(t)?,
            None => None,
        };
        let add_method = ed.add_method.and_then(|m| self.method_map.get(&m).copied());
        let remove_method = ed.remove_method.and_then(|m| self.method_map.get(&m).copied());
        let fire_method = ed.fire_method.and_then(|m| self.method_map.get(&m).copied());
        let other_methods = ed
            .other_methods
            .iter()
            .filter_map(|m| self.method_map.get(m).copied())
            .collect();
        let custom_attributes = self.import_custom_attributes(&ed.custom_attributes)?;
        Ok(self.target.alloc_event(EventDef {
            rid: 0,
            name: ed.name,
            attributes: ed.attributes,
            event_type,
            add_method,
            remove_method,
            fire_method,
            other_methods,
            custom_attributes,
        }))
    }

    fn import_generic_params(
        &mut self,
        ids: &[GenericParamId],
    ) -> ImportOp<Vec<GenericParamId>> {
        let mut out = Vec::with_capacity(ids.len());
        for &id in ids {
            let gp = self.src().generic_param(id).clone();
            let mut constraints = Vec::with_capacity(gp.constraints.len());
            for constraint in gp.constraints {
                if let Some(t) = self.import_type_def_or_ref(constraint)? {
                    constraints.push(t);
                }
            }
            let custom_attributes = self.import_custom_attributes(&gp.custom_attributes)?;
            out.push(self.target.alloc_generic_param(GenericParam {
                rid: 0,
                number: gp.number,
                name: gp.name,
                attributes: gp.attributes,
                constraints,
                custom_attributes,
            }));
        }
        Ok(out)
    }

    // -- member matching against the target --

    fn find_matching_target_field(
        &self,
        source: FieldId,
        target_type: TypeDefId,
    ) -> Option<FieldId> {
        let fd = self.src().field(source);
        let cmp = SigComparer::new(self.src(), self.target);
        self.target
            .type_def(target_type)
            .fields
            .iter()
            .copied()
            .find(|&f| {
                let candidate = self.target.field(f);
                candidate.name == fd.name
                    && cmp.type_sigs_equal(&fd.signature.ty, &candidate.signature.ty)
            })
    }

    fn find_matching_target_method(
        &self,
        source: MethodId,
        target_type: TypeDefId,
    ) -> Option<MethodId> {
        let md = self.src().method(source);
        self.find_target_method(target_type, &md.name, &md.signature)
    }

    pub(crate) fn find_target_method(
        &self,
        target_type: TypeDefId,
        name: &str,
        signature: &MethodSig,
    ) -> Option<MethodId> {
        let cmp = SigComparer::new(self.src(), self.target);
        self.target
            .type_def(target_type)
            .methods
            .iter()
            .copied()
            .find(|&m| {
                let candidate = self.target.method(m);
                candidate.name == name
                    && cmp.method_sigs_equal(signature, &candidate.signature)
            })
    }

    pub(crate) fn find_target_field(
        &self,
        target_type: TypeDefId,
        name: &str,
        signature: &FieldSig,
    ) -> Option<FieldId> {
        let cmp = SigComparer::new(self.src(), self.target);
        self.target
            .type_def(target_type)
            .fields
            .iter()
            .copied()
            .find(|&f| {
                let candidate = self.target.field(f);
                candidate.name == name && cmp.type_sigs_equal(&signature.ty, &candidate.signature.ty)
            })
    }

    fn find_matching_target_property(
        &self,
        source: PropertyId,
        target_type: TypeDefId,
    ) -> Option<PropertyId> {
        let pd = self.src().property(source);
        let cmp = SigComparer::new(self.src(), self.target);
        self.target
            .type_def(target_type)
            .properties
            .iter()
            .copied()
            .find(|&p| {
                let candidate = self.target.property(p);
                candidate.name == pd.name
                    && cmp.property_sigs_equal(&pd.signature, &candidate.signature)
            })
    }

    fn find_matching_target_event(
        &self,
        source: EventId,
        target_type: TypeDefId,
    ) -> Option<EventId> {
        let ed = self.src().event(source);
        let cmp = SigComparer::new(self.src(), self.target);
        self.target
            .type_def(target_type)
            .events
            .iter()
            .copied()
            .find(|&e| {
                let candidate = self.target.event(e);
                if candidate.name != ed.name {
                    return false;
                }
                match (ed.event_type, candidate.event_type) {
                    (Some(a), Some(b)) => cmp.type_def_or_refs_equal(a, b),
                    (None, None) => true,
                    _ => false,
                }
            })
    }

    // -- member references --

    /// Translate any method reference. Stub members redirect to the target
    /// original; unresolvable references produce IM0004 and `None`.
    pub(crate) fn import_method_ref(&mut self, method: MethodRef) -> ImportOp<Option<MethodRef>> {
        match method {
            MethodRef::Def(id) => {
                if let Some(&mapped) = self.method_map.get(&id) {
                    return Ok(Some(MethodRef::Def(mapped)));
                }
                let name = self.src().method(id).name.clone();
                self.report(
                    DiagnosticCode::IM0004,
                    format!("{}: {name}", DiagnosticCode::IM0004.default_message()),
                );
                Ok(None)
            }
            MethodRef::Member(id) => self.import_method_member_ref(id),
            MethodRef::Spec(id) => {
                let (inner, instantiation, attrs) = {
                    let ms = self.src().method_spec(id);
                    (
                        ms.method,
                        ms.instantiation.clone(),
                        ms.custom_attributes.clone(),
                    )
                };
                let method = match self.import_method_ref(inner)? {
                    Some(m) => m,
                    None => return Ok(None),
                };
                let instantiation = match self.import_generic_inst_method_sig(&instantiation)? {
                    Some(s) => s,
                    None => return Ok(None),
                };
                let custom_attributes = self.import_custom_attributes(&attrs)?;
                let new_spec = self.target.alloc_method_spec(MethodSpec {
                    rid: 0,
                    method,
                    instantiation,
                    custom_attributes,
                });
                Ok(Some(MethodRef::Spec(new_spec)))
            }
        }
    }

    fn import_method_member_ref(&mut self, id: MemberRefId) -> ImportOp<Option<MethodRef>> {
        let (class, name, signature, attrs) = {
            let mr = self.src().member_ref(id);
            (
                mr.class,
                mr.name.clone(),
                mr.signature.clone(),
                mr.custom_attributes.clone(),
            )
        };
        match class {
            MemberRefParent::Type(tdr) => {
                let imported = match self.import_type_def_or_ref(tdr)? {
                    Some(t) => t,
                    None => return Ok(None),
                };
                if let TypeDefOrRef::Def(target_type) = imported {
                    // The reference lands in the target module: bind it to
                    // the real method row.
                    let method_sig = match &signature {
                        CallingConventionSig::Method(s) => s.clone(),
                        _ => {
                            return self.fatal_internal(format!(
                                "member reference {name} has a non-method signature"
                            ))
                        }
                    };
                    match self.find_target_method(target_type, &name, &method_sig) {
                        Some(m) => Ok(Some(MethodRef::Def(m))),
                        None => {
                            self.report(
                                DiagnosticCode::IM0004,
                                format!("{}: {name}", DiagnosticCode::IM0004.default_message()),
                            );
                            Ok(None)
                        }
                    }
                } else {
                    let signature = match self.import_calling_convention_sig(&signature)? {
                        Some(s) => s,
                        None => return Ok(None),
                    };
                    let custom_attributes = self.import_custom_attributes(&attrs)?;
                    let new_ref = self.target.alloc_member_ref(MemberRef {
                        rid: 0,
                        class: MemberRefParent::Type(imported),
                        name,
                        signature,
                        custom_attributes,
                    });
                    Ok(Some(MethodRef::Member(new_ref)))
                }
            }
            MemberRefParent::ModuleRef(module_ref) => {
                let module_name = self.src().module_ref(module_ref).name.clone();
                match self.classify_module_name(&module_name) {
                    ScopeKind::Target => {
                        let method_sig = match &signature {
                            CallingConventionSig::Method(s) => s.clone(),
                            _ => {
                                return self.fatal_internal(format!(
                                    "member reference {name} has a non-method signature"
                                ))
                            }
                        };
                        let found = self
                            .target
                            .global_type()
                            .and_then(|g| self.find_target_method(g, &name, &method_sig));
                        match found {
                            Some(m) => Ok(Some(MethodRef::Def(m))),
                            None => {
                                self.report(
                                    DiagnosticCode::IM0004,
                                    format!(
                                        "{}: {name}",
                                        DiagnosticCode::IM0004.default_message()
                                    ),
                                );
                                Ok(None)
                            }
                        }
                    }
                    ScopeKind::Source => self.fatal_internal(format!(
                        "member reference {name} is scoped to the source module"
                    )),
                    ScopeKind::Foreign => {
                        let new_module = self.import_module_ref(module_ref);
                        let signature = match self.import_calling_convention_sig(&signature)? {
                            Some(s) => s,
                            None => return Ok(None),
                        };
                        let custom_attributes = self.import_custom_attributes(&attrs)?;
                        let new_ref = self.target.alloc_member_ref(MemberRef {
                            rid: 0,
                            class: MemberRefParent::ModuleRef(new_module),
                            name,
                            signature,
                            custom_attributes,
                        });
                        Ok(Some(MethodRef::Member(new_ref)))
                    }
                }
            }
            MemberRefParent::Method(method) => {
                let mapped = match self.method_map.get(&method) {
                    Some(&m) => m,
                    None => {
                        self.report(
                            DiagnosticCode::IM0004,
                            format!("{}: {name}", DiagnosticCode::IM0004.default_message()),
                        );
                        return Ok(None);
                    }
                };
                let signature = match self.import_calling_convention_sig(&signature)? {
                    Some(s) => s,
                    None => return Ok(None),
                };
                let custom_attributes = self.import_custom_attributes(&attrs)?;
                let new_ref = self.target.alloc_member_ref(MemberRef {
                    rid: 0,
                    class: MemberRefParent::Method(mapped),
                    name,
                    signature,
                    custom_attributes,
                });
                Ok(Some(MethodRef::Member(new_ref)))
            }
        }
    }

    /// Translate any field reference; unresolvable references produce
    /// IM0005 and `None`.
    pub(crate) fn import_field_ref(&mut self, field: FieldRef) -> ImportOp<Option<FieldRef>> {
        match field {
            FieldRef::Def(id) => {
                if let Some(&mapped) = self.field_map.get(&id) {
                    return Ok(Some(FieldRef::Def(mapped)));
                }
                let name = self.src().field(id).name.clone();
                self.report(
                    DiagnosticCode::IM0005,
                    format!("{}: {name}", DiagnosticCode::IM0005.default_message()),
                );
                Ok(None)
            }
            FieldRef::Member(id) => {
                let (class, name, signature, attrs) = {
                    let mr = self.src().member_ref(id);
                    (
                        mr.class,
                        mr.name.clone(),
                        mr.signature.clone(),
                        mr.custom_attributes.clone(),
                    )
                };
                let parent = match class {
                    MemberRefParent::Type(tdr) => match self.import_type_def_or_ref(tdr)? {
                        Some(t) => t,
                        None => return Ok(None),
                    },
                    _ => {
                        return self.fatal_internal(format!(
                            "field reference {name} has a non-type parent"
                        ))
                    }
                };
                if let TypeDefOrRef::Def(target_type) = parent {
                    let field_sig = match &signature {
                        CallingConventionSig::Field(s) => s.clone(),
                        _ => {
                            return self.fatal_internal(format!(
                                "field reference {name} has a non-field signature"
                            ))
                        }
                    };
                    match self.find_target_field(target_type, &name, &field_sig) {
                        Some(f) => Ok(Some(FieldRef::Def(f))),
                        None => {
                            self.report(
                                DiagnosticCode::IM0005,
                                format!("{}: {name}", DiagnosticCode::IM0005.default_message()),
                            );
                            Ok(None)
                        }
                    }
                } else {
                    let signature = match self.import_calling_convention_sig(&signature)? {
                        Some(s) => s,
                        None => return Ok(None),
                    };
                    let custom_attributes = self.import_custom_attributes(&attrs)?;
                    let new_ref = self.target.alloc_member_ref(MemberRef {
                        rid: 0,
                        class: MemberRefParent::Type(parent),
                        name,
                        signature,
                        custom_attributes,
                    });
                    Ok(Some(FieldRef::Member(new_ref)))
                }
            }
        }
    }

    // -- custom attributes, marshalling, security --

    pub(crate) fn import_custom_attributes(
        &mut self,
        attrs: &[CustomAttribute],
    ) -> ImportOp<Vec<CustomAttribute>> {
        let mut out = Vec::with_capacity(attrs.len());
        for ca in attrs {
            if let Some(imported) = self.import_custom_attribute(ca)? {
                out.push(imported);
            }
        }
        Ok(out)
    }

    fn import_custom_attribute(
        &mut self,
        ca: &CustomAttribute,
    ) -> ImportOp<Option<CustomAttribute>> {
        let ctor = match self.import_method_ref(ca.ctor)? {
            Some(c) => c,
            None => return Ok(None),
        };
        // Undecoded blobs are carried over byte for byte.
        if let Some(blob) = &ca.raw_blob {
            return Ok(Some(CustomAttribute {
                ctor,
                raw_blob: Some(blob.clone()),
                ctor_args: Vec::new(),
                named_args: Vec::new(),
            }));
        }
        let mut ctor_args = Vec::with_capacity(ca.ctor_args.len());
        for arg in &ca.ctor_args {
            match self.import_ca_argument(arg)? {
                Some(a) => ctor_args.push(a),
                None => return Ok(None),
            }
        }
        let named_args = match self.import_named_args(&ca.named_args)? {
            Some(n) => n,
            None => return Ok(None),
        };
        Ok(Some(CustomAttribute {
            ctor,
            raw_blob: None,
            ctor_args,
            named_args,
        }))
    }

    fn import_ca_argument(&mut self, arg: &CaArgument) -> ImportOp<Option<CaArgument>> {
        let ty = match self.import_type_sig(&arg.ty)? {
            Some(t) => t,
            None => return Ok(None),
        };
        let value = match self.import_ca_value(&arg.value)? {
            Some(v) => v,
            None => return Ok(None),
        };
        Ok(Some(CaArgument { ty, value }))
    }

    fn import_ca_value(&mut self, value: &CaValue) -> ImportOp<Option<CaValue>> {
        match value {
            CaValue::Type(Some(sig)) => {
                Ok(self.import_type_sig(sig)?.map(|t| CaValue::Type(Some(t))))
            }
            CaValue::Single(inner) => match self.import_ca_argument(inner)? {
                Some(a) => Ok(Some(CaValue::Single(Box::new(a)))),
                None => Ok(None),
            },
            CaValue::Array(Some(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match self.import_ca_argument(item)? {
                        Some(a) => out.push(a),
                        None => return Ok(None),
                    }
                }
                Ok(Some(CaValue::Array(Some(out))))
            }
            other => Ok(Some(other.clone())),
        }
    }

    fn import_named_args(
        &mut self,
        args: &[CaNamedArgument],
    ) -> ImportOp<Option<Vec<CaNamedArgument>>> {
        let mut out = Vec::with_capacity(args.len());
        for arg in args {
            match self.import_ca_argument(&arg.argument)? {
                Some(a) => out.push(CaNamedArgument {
                    is_field: arg.is_field,
                    name: arg.name.clone(),
                    argument: a,
                }),
                None => return Ok(None),
            }
        }
        Ok(Some(out))
    }

    /// Rebuild a marshal descriptor field-wise, translating embedded types.
    pub(crate) fn import_marshal(&mut self, marshal: &MarshalType) -> ImportOp<MarshalType> {
        let imported = match marshal {
            MarshalType::SafeArray {
                variant_type,
                user_defined_sub_type,
            } => {
                let sub = match user_defined_sub_type {
                    Some(t) => self.import_type_def_or_ref(*t)?,
                    None => None,
                };
                MarshalType::SafeArray {
                    variant_type: *variant_type,
                    user_defined_sub_type: sub,
                }
            }
            MarshalType::Custom {
                guid,
                native_type_name,
                marshaler,
                cookie,
            } => {
                let marshaler = match marshaler {
                    Some(t) => self.import_type_def_or_ref(*t)?,
                    None => None,
                };
                MarshalType::Custom {
                    guid: guid.clone(),
                    native_type_name: native_type_name.clone(),
                    marshaler,
                    cookie: cookie.clone(),
                }
            }
            other => other.clone(),
        };
        Ok(imported)
    }

    pub(crate) fn import_decl_securities(
        &mut self,
        list: &[DeclSecurity],
    ) -> ImportOp<Vec<DeclSecurity>> {
        let mut out = Vec::with_capacity(list.len());
        for ds in list {
            let mut attributes = Vec::with_capacity(ds.attributes.len());
            for sa in &ds.attributes {
                let attribute_type = match self.import_type_def_or_ref(sa.attribute_type)? {
                    Some(t) => t,
                    None => continue,
                };
                match self.import_named_args(&sa.named_args)? {
                    Some(named_args) => attributes.push(SecurityAttribute {
                        attribute_type,
                        named_args,
                    }),
                    None => continue,
                }
            }
            out.push(DeclSecurity {
                action: ds.action,
                attributes,
            });
        }
        Ok(out)
    }
}
