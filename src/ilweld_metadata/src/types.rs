//! Type rows: definitions, references and specs.

use bitflags::bitflags;

use crate::custom_attrs::CustomAttribute;
use crate::ids::{
    AssemblyRefId, EventId, FieldId, GenericParamId, MethodId, ModuleRefId, PropertyId, TypeDefId,
    TypeRefId, TypeSpecId,
};
use crate::members::{ClassLayout, DeclSecurity, InterfaceImpl};
use crate::signatures::TypeSig;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeAttributes: u32 {
        const VISIBILITY_MASK    = 0x0000_0007;
        const PUBLIC             = 0x0000_0001;
        const NESTED_PUBLIC      = 0x0000_0002;
        const NESTED_PRIVATE     = 0x0000_0003;
        const NESTED_FAMILY      = 0x0000_0004;
        const NESTED_ASSEMBLY    = 0x0000_0005;
        const NESTED_FAM_AND_ASM = 0x0000_0006;
        const NESTED_FAM_OR_ASM  = 0x0000_0007;
        const SEQUENTIAL_LAYOUT  = 0x0000_0008;
        const EXPLICIT_LAYOUT    = 0x0000_0010;
        const INTERFACE          = 0x0000_0020;
        const ABSTRACT           = 0x0000_0080;
        const SEALED             = 0x0000_0100;
        const SPECIAL_NAME       = 0x0000_0400;
        const IMPORT             = 0x0000_1000;
        const SERIALIZABLE       = 0x0000_2000;
        const UNICODE_CLASS      = 0x0001_0000;
        const AUTO_CLASS         = 0x0002_0000;
        const BEFORE_FIELD_INIT  = 0x0010_0000;
        const RT_SPECIAL_NAME    = 0x0000_0800;
        const HAS_SECURITY       = 0x0004_0000;
    }
}

/// A type defined in a module.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub rid: u32,
    pub namespace: String,
    pub name: String,
    pub attributes: TypeAttributes,
    pub base_type: Option<TypeDefOrRef>,
    pub enclosing_type: Option<TypeDefId>,
    pub nested_types: Vec<TypeDefId>,
    pub fields: Vec<FieldId>,
    pub methods: Vec<MethodId>,
    pub properties: Vec<PropertyId>,
    pub events: Vec<EventId>,
    pub generic_params: Vec<GenericParamId>,
    pub interface_impls: Vec<InterfaceImpl>,
    pub class_layout: Option<ClassLayout>,
    pub custom_attributes: Vec<CustomAttribute>,
    pub decl_security: Vec<DeclSecurity>,
}

impl TypeDef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeDef {
            rid: 0,
            namespace: namespace.into(),
            name: name.into(),
            attributes: TypeAttributes::empty(),
            base_type: None,
            enclosing_type: None,
            nested_types: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            generic_params: Vec::new(),
            interface_impls: Vec::new(),
            class_layout: None,
            custom_attributes: Vec::new(),
            decl_security: Vec::new(),
        }
    }

    /// The module's global type holds global fields and methods.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty() && self.name == "<Module>"
    }

    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// The scope a type reference resolves in. Nested type references use the
/// enclosing `TypeRef` as their scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRefScope {
    AssemblyRef(AssemblyRefId),
    ModuleRef(ModuleRefId),
    /// The defining module itself.
    Module,
    TypeRef(TypeRefId),
}

#[derive(Debug, Clone)]
pub struct TypeRef {
    pub rid: u32,
    pub scope: TypeRefScope,
    pub namespace: String,
    pub name: String,
    pub custom_attributes: Vec<CustomAttribute>,
}

impl TypeRef {
    pub fn new(scope: TypeRefScope, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef {
            rid: 0,
            scope,
            namespace: namespace.into(),
            name: name.into(),
            custom_attributes: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub rid: u32,
    pub sig: TypeSig,
}

/// Coded index over the three kinds of type rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDefOrRef {
    Def(TypeDefId),
    Ref(TypeRefId),
    Spec(TypeSpecId),
}
