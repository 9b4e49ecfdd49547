//! Member rows: methods, fields, properties, events, params, generic params,
//! member references and the smaller attached records.

use bitflags::bitflags;

use crate::body::CilBody;
use crate::custom_attrs::{CaNamedArgument, CustomAttribute};
use crate::ids::{
    FieldId, GenericParamId, MemberRefId, MethodId, MethodSpecId, ModuleRefId, ParamId, TypeDefId,
};
use crate::signatures::{CallingConventionSig, FieldSig, GenericInstMethodSig, MethodSig, PropertySig};
use crate::types::TypeDefOrRef;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodAttributes: u16 {
        const MEMBER_ACCESS_MASK = 0x0007;
        const PRIVATE            = 0x0001;
        const FAM_AND_ASSEM      = 0x0002;
        const ASSEMBLY           = 0x0003;
        const FAMILY             = 0x0004;
        const FAM_OR_ASSEM       = 0x0005;
        const PUBLIC             = 0x0006;
        const STATIC             = 0x0010;
        const FINAL              = 0x0020;
        const VIRTUAL            = 0x0040;
        const HIDE_BY_SIG        = 0x0080;
        const NEW_SLOT           = 0x0100;
        const STRICT             = 0x0200;
        const ABSTRACT           = 0x0400;
        const SPECIAL_NAME       = 0x0800;
        const RT_SPECIAL_NAME    = 0x1000;
        const PINVOKE_IMPL       = 0x2000;
        const HAS_SECURITY       = 0x4000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodImplAttributes: u16 {
        const CODE_TYPE_MASK   = 0x0003;
        const NATIVE           = 0x0001;
        const OPTIL            = 0x0002;
        const RUNTIME          = 0x0003;
        const UNMANAGED        = 0x0004;
        const NO_INLINING      = 0x0008;
        const FORWARD_REF      = 0x0010;
        const SYNCHRONIZED     = 0x0020;
        const NO_OPTIMIZATION  = 0x0040;
        const PRESERVE_SIG     = 0x0080;
        const AGGRESSIVE_INLINING = 0x0100;
        const INTERNAL_CALL    = 0x1000;
    }
}

bitflags! {
    /// Which accessor role a method plays for a property or event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodSemantics: u16 {
        const SETTER    = 0x0001;
        const GETTER    = 0x0002;
        const OTHER     = 0x0004;
        const ADD_ON    = 0x0008;
        const REMOVE_ON = 0x0010;
        const FIRE      = 0x0020;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldAttributes: u16 {
        const FIELD_ACCESS_MASK = 0x0007;
        const PRIVATE           = 0x0001;
        const FAM_AND_ASSEM     = 0x0002;
        const ASSEMBLY          = 0x0003;
        const FAMILY            = 0x0004;
        const FAM_OR_ASSEM      = 0x0005;
        const PUBLIC            = 0x0006;
        const STATIC            = 0x0010;
        const INIT_ONLY         = 0x0020;
        const LITERAL           = 0x0040;
        const NOT_SERIALIZED    = 0x0080;
        const SPECIAL_NAME      = 0x0200;
        const PINVOKE_IMPL      = 0x2000;
        const RT_SPECIAL_NAME   = 0x0400;
        const HAS_FIELD_MARSHAL = 0x1000;
        const HAS_FIELD_RVA     = 0x0100;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamAttributes: u16 {
        const IN              = 0x0001;
        const OUT             = 0x0002;
        const OPTIONAL        = 0x0010;
        const HAS_DEFAULT     = 0x1000;
        const HAS_FIELD_MARSHAL = 0x2000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PropertyAttributes: u16 {
        const SPECIAL_NAME    = 0x0200;
        const RT_SPECIAL_NAME = 0x0400;
        const HAS_DEFAULT     = 0x1000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventAttributes: u16 {
        const SPECIAL_NAME    = 0x0200;
        const RT_SPECIAL_NAME = 0x0400;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GenericParamAttributes: u16 {
        const VARIANCE_MASK          = 0x0003;
        const COVARIANT              = 0x0001;
        const CONTRAVARIANT          = 0x0002;
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PInvokeAttributes: u16 {
        const NO_MANGLE          = 0x0001;
        const CHAR_SET_ANSI      = 0x0002;
        const CHAR_SET_UNICODE   = 0x0004;
        const CHAR_SET_AUTO      = 0x0006;
        const SUPPORTS_LAST_ERROR = 0x0040;
        const CALL_CONV_WINAPI   = 0x0100;
        const CALL_CONV_CDECL    = 0x0200;
        const CALL_CONV_STDCALL  = 0x0300;
        const CALL_CONV_THISCALL = 0x0400;
        const CALL_CONV_FASTCALL = 0x0500;
    }
}

/// A method defined in a module.
#[derive(Debug, Clone)]
pub struct MethodDef {
    pub rid: u32,
    pub name: String,
    pub attributes: MethodAttributes,
    pub impl_attributes: MethodImplAttributes,
    pub semantics: MethodSemantics,
    pub signature: MethodSig,
    pub declaring_type: Option<TypeDefId>,
    pub params: Vec<ParamId>,
    pub generic_params: Vec<GenericParamId>,
    pub body: Option<CilBody>,
    pub impl_map: Option<ImplMap>,
    pub overrides: Vec<MethodOverride>,
    pub custom_attributes: Vec<CustomAttribute>,
    pub decl_security: Vec<DeclSecurity>,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, signature: MethodSig) -> Self {
        MethodDef {
            rid: 0,
            name: name.into(),
            attributes: MethodAttributes::empty(),
            impl_attributes: MethodImplAttributes::empty(),
            semantics: MethodSemantics::empty(),
            signature,
            declaring_type: None,
            params: Vec::new(),
            generic_params: Vec::new(),
            body: None,
            impl_map: None,
            overrides: Vec::new(),
            custom_attributes: Vec::new(),
            decl_security: Vec::new(),
        }
    }

    pub fn is_static(&self) -> bool {
        self.attributes.contains(MethodAttributes::STATIC)
    }

    pub fn is_virtual(&self) -> bool {
        self.attributes.contains(MethodAttributes::VIRTUAL)
    }

    /// Number of parameter slots instructions can address, counting the
    /// hidden `this` of instance methods.
    pub fn full_param_count(&self) -> usize {
        let this = if self.signature.has_this && !self.signature.explicit_this {
            1
        } else {
            0
        };
        this + self.signature.params.len()
    }
}

/// An explicit override entry: `body` implements `declaration`.
#[derive(Debug, Clone)]
pub struct MethodOverride {
    pub body: MethodRef,
    pub declaration: MethodRef,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub rid: u32,
    pub sequence: u16,
    pub name: String,
    pub attributes: ParamAttributes,
    pub constant: Option<Constant>,
    pub marshal: Option<MarshalType>,
    pub custom_attributes: Vec<CustomAttribute>,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub rid: u32,
    pub name: String,
    pub attributes: FieldAttributes,
    pub signature: FieldSig,
    pub constant: Option<Constant>,
    pub marshal: Option<MarshalType>,
    pub rva: u32,
    pub initial_value: Option<Vec<u8>>,
    pub field_offset: Option<u32>,
    pub impl_map: Option<ImplMap>,
    pub custom_attributes: Vec<CustomAttribute>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, signature: FieldSig) -> Self {
        FieldDef {
            rid: 0,
            name: name.into(),
            attributes: FieldAttributes::empty(),
            signature,
            constant: None,
            marshal: None,
            rva: 0,
            initial_value: None,
            field_offset: None,
            impl_map: None,
            custom_attributes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub rid: u32,
    pub name: String,
    pub attributes: PropertyAttributes,
    pub signature: PropertySig,
    pub constant: Option<Constant>,
    pub get_method: Option<MethodId>,
    pub set_method: Option<MethodId>,
    pub other_methods: Vec<MethodId>,
    pub custom_attributes: Vec<CustomAttribute>,
}

#[derive(Debug, Clone)]
pub struct EventDef {
    pub rid: u32,
    pub name: String,
    pub attributes: EventAttributes,
    pub event_type: Option<TypeDefOrRef>,
    pub add_method: Option<MethodId>,
    pub remove_method: Option<MethodId>,
    pub fire_method: Option<MethodId>,
    pub other_methods: Vec<MethodId>,
    pub custom_attributes: Vec<CustomAttribute>,
}

#[derive(Debug, Clone)]
pub struct GenericParam {
    pub rid: u32,
    pub number: u16,
    pub name: String,
    pub attributes: GenericParamAttributes,
    pub constraints: Vec<TypeDefOrRef>,
    pub custom_attributes: Vec<CustomAttribute>,
}

/// A reference to a member of another type or module.
#[derive(Debug, Clone)]
pub struct MemberRef {
    pub rid: u32,
    pub class: MemberRefParent,
    pub name: String,
    pub signature: CallingConventionSig,
    pub custom_attributes: Vec<CustomAttribute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRefParent {
    Type(TypeDefOrRef),
    ModuleRef(ModuleRefId),
    /// Vararg call sites reference the method they instantiate.
    Method(MethodId),
}

#[derive(Debug, Clone)]
pub struct MethodSpec {
    pub rid: u32,
    pub method: MethodRef,
    pub instantiation: GenericInstMethodSig,
    pub custom_attributes: Vec<CustomAttribute>,
}

/// Any way of naming a method: a definition, a member reference or a generic
/// instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodRef {
    Def(MethodId),
    Member(MemberRefId),
    Spec(MethodSpecId),
}

/// Any way of naming a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRef {
    Def(FieldId),
    Member(MemberRefId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Bool(bool),
    Char(char),
    I1(i8),
    U1(u8),
    I2(i16),
    U2(u16),
    I4(i32),
    U4(u32),
    I8(i64),
    U8(u64),
    R4(f32),
    R8(f64),
    String(Option<String>),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeType(pub u32);

impl NativeType {
    pub const BOOLEAN: NativeType = NativeType(0x02);
    pub const I4: NativeType = NativeType(0x07);
    pub const LP_STR: NativeType = NativeType(0x14);
    pub const LP_WSTR: NativeType = NativeType(0x15);
    pub const IUNKNOWN: NativeType = NativeType(0x19);
    pub const FUNC: NativeType = NativeType(0x26);
    pub const ARRAY: NativeType = NativeType(0x2a);
    pub const MAX: NativeType = NativeType(0x50);
}

/// Field/parameter marshalling descriptors, one variant per blob layout.
#[derive(Debug, Clone, PartialEq)]
pub enum MarshalType {
    /// Undecoded blob, kept byte for byte.
    Raw(Vec<u8>),
    FixedSysString {
        size: u32,
    },
    SafeArray {
        variant_type: u32,
        user_defined_sub_type: Option<TypeDefOrRef>,
    },
    FixedArray {
        size: u32,
        element_type: NativeType,
    },
    Array {
        element_type: NativeType,
        param_number: Option<u16>,
        num_elements: Option<u32>,
        flags: Option<u32>,
    },
    Custom {
        guid: String,
        native_type_name: String,
        marshaler: Option<TypeDefOrRef>,
        cookie: String,
    },
    Interface {
        kind: NativeType,
        iid_param_index: Option<u32>,
    },
    Plain(NativeType),
}

#[derive(Debug, Clone)]
pub struct ImplMap {
    pub module: ModuleRefId,
    pub name: String,
    pub attributes: PInvokeAttributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassLayout {
    pub packing_size: u16,
    pub class_size: u32,
}

#[derive(Debug, Clone)]
pub struct InterfaceImpl {
    pub interface: TypeDefOrRef,
    pub custom_attributes: Vec<CustomAttribute>,
}

#[derive(Debug, Clone)]
pub struct DeclSecurity {
    pub action: u16,
    pub attributes: Vec<SecurityAttribute>,
}

#[derive(Debug, Clone)]
pub struct SecurityAttribute {
    pub attribute_type: TypeDefOrRef,
    pub named_args: Vec<CaNamedArgument>,
}
