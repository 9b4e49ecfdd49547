//! Builders for in-memory modules used by the importer tests.
#![allow(dead_code)]

use ilweld_metadata::{
    AssemblyInfo, CilBody, FieldDef, FieldId, FieldSig, Instruction, MethodAttributes, MethodDef,
    MethodId, MethodSig, ModuleDef, OpCode, TypeDef, TypeDefId, TypeSig,
};

pub fn assembly(name: &str) -> AssemblyInfo {
    AssemblyInfo::new(name, (1, 0, 0, 0))
}

/// A module with a global `<Module>` type, like every compiler emits.
pub fn new_module(assembly_name: &str, file_name: &str) -> ModuleDef {
    let mut module = ModuleDef::with_assembly(file_name, assembly(assembly_name));
    let global = module.alloc_type_def(TypeDef::new("", "<Module>"));
    module.top_level_types.push(global);
    module
}

pub fn add_class(module: &mut ModuleDef, namespace: &str, name: &str) -> TypeDefId {
    let t = module.alloc_type_def(TypeDef::new(namespace, name));
    module.top_level_types.push(t);
    t
}

pub fn add_nested_class(module: &mut ModuleDef, enclosing: TypeDefId, name: &str) -> TypeDefId {
    let mut td = TypeDef::new("", name);
    td.enclosing_type = Some(enclosing);
    let t = module.alloc_type_def(td);
    module.type_def_mut(enclosing).nested_types.push(t);
    t
}

pub fn add_method(
    module: &mut ModuleDef,
    declaring_type: TypeDefId,
    name: &str,
    signature: MethodSig,
    body: Option<CilBody>,
) -> MethodId {
    let mut md = MethodDef::new(name, signature.clone());
    if !signature.has_this {
        md.attributes |= MethodAttributes::STATIC;
    }
    md.declaring_type = Some(declaring_type);
    md.body = body;
    let id = module.alloc_method(md);
    module.type_def_mut(declaring_type).methods.push(id);
    id
}

pub fn add_virtual_method(
    module: &mut ModuleDef,
    declaring_type: TypeDefId,
    name: &str,
    signature: MethodSig,
    body: Option<CilBody>,
) -> MethodId {
    let id = add_method(module, declaring_type, name, signature, body);
    module.method_mut(id).attributes |= MethodAttributes::VIRTUAL;
    id
}

pub fn add_field(
    module: &mut ModuleDef,
    declaring_type: TypeDefId,
    name: &str,
    ty: TypeSig,
) -> FieldId {
    let id = module.alloc_field(FieldDef::new(name, FieldSig { ty }));
    module.type_def_mut(declaring_type).fields.push(id);
    id
}

pub fn body_with(instructions: Vec<Instruction>) -> CilBody {
    CilBody {
        max_stack: 8,
        instructions,
        ..CilBody::default()
    }
}

pub fn ret_body() -> CilBody {
    body_with(vec![Instruction::new(OpCode::Ret)])
}
