//! Type and calling-convention signature trees.

use crate::ids::{MethodId, TypeDefId};
use crate::types::TypeDefOrRef;

/// A type signature. The corlib primitives are unit variants, so the
/// canonical form of a primitive is the same in every module.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSig {
    Void,
    Boolean,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    String,
    Object,
    IntPtr,
    UIntPtr,
    TypedByRef,
    Class(TypeDefOrRef),
    ValueType(TypeDefOrRef),
    Ptr(Box<TypeSig>),
    ByRef(Box<TypeSig>),
    SZArray(Box<TypeSig>),
    Array {
        element: Box<TypeSig>,
        rank: u32,
        sizes: Vec<u32>,
        lower_bounds: Vec<i32>,
    },
    Pinned(Box<TypeSig>),
    ValueArray {
        element: Box<TypeSig>,
        length: u32,
    },
    CModReqd {
        modifier: TypeDefOrRef,
        inner: Box<TypeSig>,
    },
    CModOpt {
        modifier: TypeDefOrRef,
        inner: Box<TypeSig>,
    },
    Module {
        index: u32,
        inner: Box<TypeSig>,
    },
    FnPtr(Box<MethodSig>),
    GenericInst {
        is_value_type: bool,
        ty: TypeDefOrRef,
        args: Vec<TypeSig>,
    },
    /// Generic type parameter; `owner` is the declaring type in the owning
    /// module.
    Var {
        number: u16,
        owner: Option<TypeDefId>,
    },
    /// Generic method parameter; `owner` is the declaring method in the
    /// owning module.
    MVar {
        number: u16,
        owner: Option<MethodId>,
    },
    Sentinel,
}

impl TypeSig {
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeSig::Void
                | TypeSig::Boolean
                | TypeSig::Char
                | TypeSig::I1
                | TypeSig::U1
                | TypeSig::I2
                | TypeSig::U2
                | TypeSig::I4
                | TypeSig::U4
                | TypeSig::I8
                | TypeSig::U8
                | TypeSig::R4
                | TypeSig::R8
                | TypeSig::String
                | TypeSig::Object
                | TypeSig::IntPtr
                | TypeSig::UIntPtr
                | TypeSig::TypedByRef
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallingConvention {
    Default,
    C,
    StdCall,
    ThisCall,
    FastCall,
    VarArg,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub calling_convention: CallingConvention,
    pub has_this: bool,
    pub explicit_this: bool,
    pub gen_param_count: u16,
    pub ret: TypeSig,
    pub params: Vec<TypeSig>,
    /// Extra arguments after the vararg sentinel, present on call sites only.
    pub params_after_sentinel: Option<Vec<TypeSig>>,
}

impl MethodSig {
    pub fn static_method(ret: TypeSig, params: Vec<TypeSig>) -> Self {
        MethodSig {
            calling_convention: CallingConvention::Default,
            has_this: false,
            explicit_this: false,
            gen_param_count: 0,
            ret,
            params,
            params_after_sentinel: None,
        }
    }

    pub fn instance_method(ret: TypeSig, params: Vec<TypeSig>) -> Self {
        MethodSig {
            has_this: true,
            ..MethodSig::static_method(ret, params)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSig {
    pub ty: TypeSig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySig {
    pub has_this: bool,
    pub ret: TypeSig,
    pub params: Vec<TypeSig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalSig {
    pub locals: Vec<TypeSig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericInstMethodSig {
    pub args: Vec<TypeSig>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallingConventionSig {
    Method(MethodSig),
    Field(FieldSig),
    Property(PropertySig),
    GenericInstMethod(GenericInstMethodSig),
    LocalVars(LocalSig),
}
