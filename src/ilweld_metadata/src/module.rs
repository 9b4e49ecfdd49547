//! The module: per-table arenas plus assembly identity.

use crate::ids::{
    AssemblyRefId, EventId, FieldId, GenericParamId, MemberRefId, MethodId, MethodSpecId,
    ModuleRefId, ParamId, PropertyId, TypeDefId, TypeRefId, TypeSpecId,
};
use crate::members::{
    EventDef, FieldDef, GenericParam, MemberRef, MethodDef, MethodSpec, Param, PropertyDef,
};
use crate::signatures::TypeSig;
use crate::types::{TypeDef, TypeRef, TypeSpec};

/// Identity of an assembly: the four components that make up its full name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyInfo {
    pub name: String,
    pub version: (u16, u16, u16, u16),
    pub culture: String,
    pub public_key_token: Option<Vec<u8>>,
}

impl AssemblyInfo {
    pub fn new(name: impl Into<String>, version: (u16, u16, u16, u16)) -> Self {
        AssemblyInfo {
            name: name.into(),
            version,
            culture: String::new(),
            public_key_token: None,
        }
    }

    pub fn full_name(&self) -> String {
        let culture = if self.culture.is_empty() {
            "neutral"
        } else {
            &self.culture
        };
        let token = match &self.public_key_token {
            None => "null".to_string(),
            Some(bytes) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
        };
        let (a, b, c, d) = self.version;
        format!(
            "{}, Version={a}.{b}.{c}.{d}, Culture={culture}, PublicKeyToken={token}",
            self.name
        )
    }

    /// Full-name equality; names and cultures compare case-insensitively.
    pub fn matches(&self, other: &AssemblyInfo) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.version == other.version
            && self.culture.eq_ignore_ascii_case(&other.culture)
            && self.public_key_token == other.public_key_token
    }
}

#[derive(Debug, Clone)]
pub struct AssemblyRef {
    pub rid: u32,
    pub info: AssemblyInfo,
}

#[derive(Debug, Clone)]
pub struct ModuleRef {
    pub rid: u32,
    pub name: String,
}

/// A parsed module. Rows live in per-table arenas and are addressed by the
/// typed ids in [`crate::ids`]; every allocation assigns the next row id, so
/// descriptors created during an import receive fresh identities in the
/// target module.
#[derive(Debug, Clone)]
pub struct ModuleDef {
    pub name: String,
    pub assembly: Option<AssemblyInfo>,
    pub top_level_types: Vec<TypeDefId>,
    type_defs: Vec<TypeDef>,
    type_refs: Vec<TypeRef>,
    type_specs: Vec<TypeSpec>,
    methods: Vec<MethodDef>,
    fields: Vec<FieldDef>,
    properties: Vec<PropertyDef>,
    events: Vec<EventDef>,
    params: Vec<Param>,
    generic_params: Vec<GenericParam>,
    member_refs: Vec<MemberRef>,
    method_specs: Vec<MethodSpec>,
    assembly_refs: Vec<AssemblyRef>,
    module_refs: Vec<ModuleRef>,
    next_rid: u32,
}

impl ModuleDef {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleDef {
            name: name.into(),
            assembly: None,
            top_level_types: Vec::new(),
            type_defs: Vec::new(),
            type_refs: Vec::new(),
            type_specs: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            params: Vec::new(),
            generic_params: Vec::new(),
            member_refs: Vec::new(),
            method_specs: Vec::new(),
            assembly_refs: Vec::new(),
            module_refs: Vec::new(),
            next_rid: 1,
        }
    }

    pub fn with_assembly(name: impl Into<String>, assembly: AssemblyInfo) -> Self {
        let mut module = ModuleDef::new(name);
        module.assembly = Some(assembly);
        module
    }

    fn update_row_id(&mut self) -> u32 {
        let rid = self.next_rid;
        self.next_rid += 1;
        rid
    }

    /// The highest row id handed out so far.
    pub fn last_row_id(&self) -> u32 {
        self.next_rid - 1
    }

    pub fn alloc_type_def(&mut self, mut def: TypeDef) -> TypeDefId {
        def.rid = self.update_row_id();
        self.type_defs.push(def);
        TypeDefId(self.type_defs.len() as u32 - 1)
    }

    pub fn alloc_type_ref(&mut self, mut type_ref: TypeRef) -> TypeRefId {
        type_ref.rid = self.update_row_id();
        self.type_refs.push(type_ref);
        TypeRefId(self.type_refs.len() as u32 - 1)
    }

    pub fn alloc_type_spec(&mut self, sig: TypeSig) -> TypeSpecId {
        let rid = self.update_row_id();
        self.type_specs.push(TypeSpec { rid, sig });
        TypeSpecId(self.type_specs.len() as u32 - 1)
    }

    pub fn alloc_method(&mut self, mut method: MethodDef) -> MethodId {
        method.rid = self.update_row_id();
        self.methods.push(method);
        MethodId(self.methods.len() as u32 - 1)
    }

    pub fn alloc_field(&mut self, mut field: FieldDef) -> FieldId {
        field.rid = self.update_row_id();
        self.fields.push(field);
        FieldId(self.fields.len() as u32 - 1)
    }

    pub fn alloc_property(&mut self, mut property: PropertyDef) -> PropertyId {
        property.rid = self.update_row_id();
        self.properties.push(property);
        PropertyId(self.properties.len() as u32 - 1)
    }

    pub fn alloc_event(&mut self, mut event: EventDef) -> EventId {
        event.rid = self.update_row_id();
        self.events.push(event);
        EventId(self.events.len() as u32 - 1)
    }

    pub fn alloc_param(&mut self, mut param: Param) -> ParamId {
        param.rid = self.update_row_id();
        self.params.push(param);
        ParamId(self.params.len() as u32 - 1)
    }

    pub fn alloc_generic_param(&mut self, mut generic_param: GenericParam) -> GenericParamId {
        generic_param.rid = self.update_row_id();
        self.generic_params.push(generic_param);
        GenericParamId(self.generic_params.len() as u32 - 1)
    }

    pub fn alloc_member_ref(&mut self, mut member_ref: MemberRef) -> MemberRefId {
        member_ref.rid = self.update_row_id();
        self.member_refs.push(member_ref);
        MemberRefId(self.member_refs.len() as u32 - 1)
    }

    pub fn alloc_method_spec(&mut self, mut method_spec: MethodSpec) -> MethodSpecId {
        method_spec.rid = self.update_row_id();
        self.method_specs.push(method_spec);
        MethodSpecId(self.method_specs.len() as u32 - 1)
    }

    pub fn alloc_assembly_ref(&mut self, info: AssemblyInfo) -> AssemblyRefId {
        let rid = self.update_row_id();
        self.assembly_refs.push(AssemblyRef { rid, info });
        AssemblyRefId(self.assembly_refs.len() as u32 - 1)
    }

    pub fn alloc_module_ref(&mut self, name: impl Into<String>) -> ModuleRefId {
        let rid = self.update_row_id();
        self.module_refs.push(ModuleRef {
            rid,
            name: name.into(),
        });
        ModuleRefId(self.module_refs.len() as u32 - 1)
    }

    pub fn type_def(&self, id: TypeDefId) -> &TypeDef {
        &self.type_defs[id.0 as usize]
    }

    pub fn type_def_mut(&mut self, id: TypeDefId) -> &mut TypeDef {
        &mut self.type_defs[id.0 as usize]
    }

    pub fn type_ref(&self, id: TypeRefId) -> &TypeRef {
        &self.type_refs[id.0 as usize]
    }

    pub fn type_ref_mut(&mut self, id: TypeRefId) -> &mut TypeRef {
        &mut self.type_refs[id.0 as usize]
    }

    pub fn type_spec(&self, id: TypeSpecId) -> &TypeSpec {
        &self.type_specs[id.0 as usize]
    }

    pub fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.0 as usize]
    }

    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodDef {
        &mut self.methods[id.0 as usize]
    }

    pub fn field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.0 as usize]
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut FieldDef {
        &mut self.fields[id.0 as usize]
    }

    pub fn property(&self, id: PropertyId) -> &PropertyDef {
        &self.properties[id.0 as usize]
    }

    pub fn property_mut(&mut self, id: PropertyId) -> &mut PropertyDef {
        &mut self.properties[id.0 as usize]
    }

    pub fn event(&self, id: EventId) -> &EventDef {
        &self.events[id.0 as usize]
    }

    pub fn event_mut(&mut self, id: EventId) -> &mut EventDef {
        &mut self.events[id.0 as usize]
    }

    pub fn param(&self, id: ParamId) -> &Param {
        &self.params[id.0 as usize]
    }

    pub fn generic_param(&self, id: GenericParamId) -> &GenericParam {
        &self.generic_params[id.0 as usize]
    }

    pub fn member_ref(&self, id: MemberRefId) -> &MemberRef {
        &self.member_refs[id.0 as usize]
    }

    pub fn method_spec(&self, id: MethodSpecId) -> &MethodSpec {
        &self.method_specs[id.0 as usize]
    }

    pub fn assembly_ref(&self, id: AssemblyRefId) -> &AssemblyRef {
        &self.assembly_refs[id.0 as usize]
    }

    pub fn module_ref(&self, id: ModuleRefId) -> &ModuleRef {
        &self.module_refs[id.0 as usize]
    }

    pub fn assembly_refs(&self) -> impl Iterator<Item = (AssemblyRefId, &AssemblyRef)> {
        self.assembly_refs
            .iter()
            .enumerate()
            .map(|(i, r)| (AssemblyRefId(i as u32), r))
    }

    pub fn module_refs(&self) -> impl Iterator<Item = (ModuleRefId, &ModuleRef)> {
        self.module_refs
            .iter()
            .enumerate()
            .map(|(i, r)| (ModuleRefId(i as u32), r))
    }

    /// The global `<Module>` type, when the module has one.
    pub fn global_type(&self) -> Option<TypeDefId> {
        self.top_level_types
            .iter()
            .copied()
            .find(|&id| self.type_def(id).is_global())
    }

    pub fn find_top_level_type(&self, namespace: &str, name: &str) -> Option<TypeDefId> {
        self.top_level_types.iter().copied().find(|&id| {
            let td = self.type_def(id);
            td.namespace == namespace && td.name == name
        })
    }

    pub fn find_nested_type(
        &self,
        enclosing: TypeDefId,
        namespace: &str,
        name: &str,
    ) -> Option<TypeDefId> {
        self.type_def(enclosing)
            .nested_types
            .iter()
            .copied()
            .find(|&id| {
                let td = self.type_def(id);
                td.namespace == namespace && td.name == name
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::{MethodSig, TypeSig};

    #[test]
    fn row_ids_are_monotonic() {
        let mut module = ModuleDef::new("a.dll");
        let t = module.alloc_type_def(TypeDef::new("Ns", "A"));
        let m = module.alloc_method(MethodDef::new(
            "M",
            MethodSig::static_method(TypeSig::Void, vec![]),
        ));
        assert_eq!(module.type_def(t).rid, 1);
        assert_eq!(module.method(m).rid, 2);
        assert_eq!(module.last_row_id(), 2);
    }

    #[test]
    fn global_type_is_found_by_name() {
        let mut module = ModuleDef::new("a.dll");
        let g = module.alloc_type_def(TypeDef::new("", "<Module>"));
        module.top_level_types.push(g);
        let t = module.alloc_type_def(TypeDef::new("Ns", "A"));
        module.top_level_types.push(t);
        assert_eq!(module.global_type(), Some(g));
        assert_eq!(module.find_top_level_type("Ns", "A"), Some(t));
        assert_eq!(module.find_top_level_type("Ns", "B"), None);
    }

    #[test]
    fn assembly_full_name_formats_token_and_culture() {
        let mut info = AssemblyInfo::new("Lib", (1, 2, 3, 4));
        assert_eq!(
            info.full_name(),
            "Lib, Version=1.2.3.4, Culture=neutral, PublicKeyToken=null"
        );
        info.public_key_token = Some(vec![0xb7, 0x7a, 0x5c]);
        assert!(info.full_name().ends_with("PublicKeyToken=b77a5c"));
    }

    #[test]
    fn assembly_matches_is_case_insensitive_on_name() {
        let a = AssemblyInfo::new("Lib", (1, 0, 0, 0));
        let b = AssemblyInfo::new("lib", (1, 0, 0, 0));
        let c = AssemblyInfo::new("lib", (2, 0, 0, 0));
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }
}
