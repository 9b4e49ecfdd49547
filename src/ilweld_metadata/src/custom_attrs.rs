//! Custom attribute values.

use crate::members::MethodRef;
use crate::signatures::TypeSig;

#[derive(Debug, Clone)]
pub struct CustomAttribute {
    pub ctor: MethodRef,
    /// When present the blob was never decoded and is carried byte for byte;
    /// `ctor_args`/`named_args` are empty in that case.
    pub raw_blob: Option<Vec<u8>>,
    pub ctor_args: Vec<CaArgument>,
    pub named_args: Vec<CaNamedArgument>,
}

#[derive(Debug, Clone)]
pub struct CaArgument {
    pub ty: TypeSig,
    pub value: CaValue,
}

#[derive(Debug, Clone)]
pub enum CaValue {
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
    /// A `System.Type` argument; `None` encodes a null type.
    Type(Option<TypeSig>),
    /// A boxed argument.
    Single(Box<CaArgument>),
    /// An array argument; `None` encodes a null array.
    Array(Option<Vec<CaArgument>>),
}

#[derive(Debug, Clone)]
pub struct CaNamedArgument {
    pub is_field: bool,
    pub name: String,
    pub argument: CaArgument,
}
