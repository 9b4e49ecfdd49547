//! Object model for managed-module metadata.
//!
//! A [`ModuleDef`] owns per-table arenas of type and member rows; rows are
//! addressed through `Copy` newtype handles that are only meaningful relative
//! to the module that allocated them. Binary image parsing is not part of
//! this crate; a concrete reader plugs in through [`ModuleReader`].

pub mod body;
pub mod custom_attrs;
pub mod ids;
pub mod members;
pub mod module;
pub mod opcode;
pub mod reader;
pub mod signatures;
pub mod types;

pub use body::{CilBody, ExceptionHandler, ExceptionHandlerKind, Instruction, Local, Operand, SequencePoint};
pub use custom_attrs::{CaArgument, CaNamedArgument, CaValue, CustomAttribute};
pub use ids::*;
pub use members::{
    ClassLayout, Constant, DeclSecurity, EventAttributes, EventDef, FieldAttributes, FieldDef,
    FieldRef, GenericParam, GenericParamAttributes, ImplMap, InterfaceImpl, MarshalType, MemberRef,
    MemberRefParent, MethodAttributes, MethodDef, MethodImplAttributes, MethodOverride, MethodRef,
    MethodSemantics, MethodSpec, NativeType, PInvokeAttributes, Param, ParamAttributes,
    PropertyAttributes, PropertyDef, SecurityAttribute,
};
pub use module::{AssemblyInfo, AssemblyRef, ModuleDef, ModuleRef};
pub use opcode::OpCode;
pub use reader::{DebugFile, DebugFileFormat, ModuleReader, ReadError};
pub use signatures::{
    CallingConvention, CallingConventionSig, FieldSig, GenericInstMethodSig, LocalSig, MethodSig,
    PropertySig, TypeSig,
};
pub use types::{TypeAttributes, TypeDef, TypeDefOrRef, TypeRef, TypeRefScope, TypeSpec};
