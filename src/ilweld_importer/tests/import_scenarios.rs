//! End-to-end import scenarios: a target module, a recompiled source module
//! and one edited method.

mod support;

use ilweld_importer::{ImportResult, Importer};
use ilweld_metadata::{
    CallingConventionSig, Instruction, Local, MemberRef, MemberRefParent, MethodRef, MethodSig,
    ModuleDef, OpCode, Operand, TypeDefOrRef, TypeRef, TypeRefScope, TypeSig,
};

use support::*;

/// Target with class `Ns.C` holding one instance method `M()` with a single
/// `ret` body; returns (module, edited method id).
fn simple_target() -> (ModuleDef, ilweld_metadata::MethodId) {
    let mut target = new_module("App", "app.dll");
    let c = add_class(&mut target, "Ns", "C");
    let m = add_method(
        &mut target,
        c,
        "M",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );
    (target, m)
}

fn simple_source() -> ModuleDef {
    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let c = add_class(&mut source, "Ns", "C");
    add_method(
        &mut source,
        c,
        "M",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );
    source
}

fn run(target: &mut ModuleDef, source: ModuleDef, edited: ilweld_metadata::MethodId) -> ImportResult {
    Importer::new(target).import_module(source, edited)
}

#[test]
fn unmodified_recompile_produces_only_the_edited_body() {
    let (mut target, edited) = simple_target();
    let source = simple_source();
    let result = run(&mut target, source, edited);

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert!(result.new_non_nested_types.is_empty());
    assert_eq!(result.merged_non_nested_types.len(), 1);
    let merged = &result.merged_non_nested_types[0];
    assert!(merged.new_fields.is_empty());
    assert!(merged.new_methods.is_empty());
    assert!(merged.new_properties.is_empty());
    assert!(merged.new_events.is_empty());
    assert!(!merged.rename_duplicates);
    assert_eq!(merged.edited_method_bodies.len(), 1);

    let edited_body = &merged.edited_method_bodies[0];
    assert_eq!(edited_body.target_method, edited);
    let body = edited_body.new_body.as_ref().expect("edited body");
    assert_eq!(body.instructions.len(), 1);
    assert_eq!(body.instructions[0].opcode, OpCode::Ret);
}

#[test]
fn renamed_local_comes_back_with_the_new_name() {
    let (mut target, edited) = simple_target();
    target
        .method_mut(edited)
        .body
        .as_mut()
        .unwrap()
        .variables
        .push(Local {
            ty: TypeSig::I4,
            name: Some("x".to_string()),
        });

    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let c = add_class(&mut source, "Ns", "C");
    let mut body = ret_body();
    body.variables.push(Local {
        ty: TypeSig::I4,
        name: Some("total".to_string()),
    });
    add_method(
        &mut source,
        c,
        "M",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(body),
    );

    let result = run(&mut target, source, edited);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.merged_non_nested_types.len(), 1);
    let merged = &result.merged_non_nested_types[0];
    assert_eq!(merged.edited_method_bodies.len(), 1);
    let body = merged.edited_method_bodies[0].new_body.as_ref().unwrap();
    assert_eq!(body.variables.len(), 1);
    assert_eq!(body.variables[0].name.as_deref(), Some("total"));
    assert_eq!(body.variables[0].ty, TypeSig::I4);
}

#[test]
fn added_field_shows_up_as_a_new_member_of_the_merged_type() {
    let (mut target, edited) = simple_target();

    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let c = add_class(&mut source, "Ns", "C");
    add_method(
        &mut source,
        c,
        "M",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );
    add_field(&mut source, c, "counter", TypeSig::I4);

    let result = run(&mut target, source, edited);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let merged = &result.merged_non_nested_types[0];
    assert_eq!(merged.new_fields.len(), 1);
    let field = target.field(merged.new_fields[0]);
    assert_eq!(field.name, "counter");
    assert_eq!(field.signature.ty, TypeSig::I4);
}

#[test]
fn colliding_global_helper_is_renamed() {
    let (mut target, edited) = simple_target();
    let target_global = target.global_type().unwrap();
    add_method(
        &mut target,
        target_global,
        "Helper",
        MethodSig::static_method(TypeSig::Void, vec![TypeSig::I4]),
        Some(ret_body()),
    );

    let mut source = simple_source();
    let source_global = source.global_type().unwrap();
    add_method(
        &mut source,
        source_global,
        "Helper",
        MethodSig::static_method(TypeSig::Void, vec![TypeSig::I4]),
        Some(ret_body()),
    );

    let result = run(&mut target, source, edited);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let global_merge = result
        .merged_non_nested_types
        .iter()
        .find(|m| m.target_type == target_global)
        .expect("global merge");
    assert!(global_merge.rename_duplicates);
    assert_eq!(global_merge.new_methods.len(), 1);
    assert_eq!(target.method(global_merge.new_methods[0]).name, "Helper_0");
}

#[test]
fn static_toggle_on_the_edited_method_is_diagnosed_but_imported() {
    let (mut target, edited) = simple_target();

    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let c = add_class(&mut source, "Ns", "C");
    add_method(
        &mut source,
        c,
        "M",
        MethodSig::static_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );

    let result = run(&mut target, source, edited);
    let im0009: Vec<_> = result
        .diagnostics
        .with_code(ilweld_importer::diagnostics::DiagnosticCode::IM0009)
        .collect();
    assert_eq!(im0009.len(), 1);

    // The body is still imported.
    let merged = &result.merged_non_nested_types[0];
    assert_eq!(merged.edited_method_bodies.len(), 1);
    assert!(merged.edited_method_bodies[0].new_body.is_some());
}

#[test]
fn call_into_a_foreign_assembly_synthesizes_ref_rows_in_the_target() {
    let (mut target, edited) = simple_target();

    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let c = add_class(&mut source, "Ns", "C");
    let console_asm = source.alloc_assembly_ref(assembly("System.Console"));
    let console = source.alloc_type_ref(TypeRef::new(
        TypeRefScope::AssemblyRef(console_asm),
        "System",
        "Console",
    ));
    let write_line = source.alloc_member_ref(MemberRef {
        rid: 0,
        class: MemberRefParent::Type(TypeDefOrRef::Ref(console)),
        name: "WriteLine".to_string(),
        signature: CallingConventionSig::Method(MethodSig::static_method(
            TypeSig::Void,
            vec![TypeSig::String],
        )),
        custom_attributes: Vec::new(),
    });
    let body = body_with(vec![
        Instruction::with_operand(OpCode::Ldstr, Operand::String("hi".to_string())),
        Instruction::with_operand(OpCode::Call, Operand::Method(MethodRef::Member(write_line))),
        Instruction::new(OpCode::Ret),
    ]);
    add_method(
        &mut source,
        c,
        "M",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(body),
    );

    let result = run(&mut target, source, edited);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let merged = &result.merged_non_nested_types[0];
    let body = merged.edited_method_bodies[0].new_body.as_ref().unwrap();
    assert_eq!(body.instructions.len(), 3);
    let Operand::Method(MethodRef::Member(imported_ref)) = body.instructions[1].operand else {
        panic!("expected an imported member reference");
    };
    let member = target.member_ref(imported_ref);
    assert_eq!(member.name, "WriteLine");
    let MemberRefParent::Type(TypeDefOrRef::Ref(type_ref)) = member.class else {
        panic!("expected a type reference parent");
    };
    let tr = target.type_ref(type_ref);
    assert_eq!(tr.namespace, "System");
    assert_eq!(tr.name, "Console");
    let TypeRefScope::AssemblyRef(assembly_ref) = tr.scope else {
        panic!("expected an assembly reference scope");
    };
    assert_eq!(target.assembly_ref(assembly_ref).info.name, "System.Console");
}

#[test]
fn edit_in_a_nested_type_merges_the_whole_chain() {
    let mut target = new_module("App", "app.dll");
    let outer = add_class(&mut target, "Ns", "Outer");
    let inner = add_nested_class(&mut target, outer, "Inner");
    let edited = add_method(
        &mut target,
        inner,
        "M",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );

    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let s_outer = add_class(&mut source, "Ns", "Outer");
    let s_inner = add_nested_class(&mut source, s_outer, "Inner");
    add_method(
        &mut source,
        s_inner,
        "M",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );
    // A brand-new nested helper type next to the edited one.
    let s_extra = add_nested_class(&mut source, s_outer, "Extra");
    add_method(
        &mut source,
        s_extra,
        "Run",
        MethodSig::static_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );

    let result = run(&mut target, source, edited);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.merged_non_nested_types.len(), 1);
    let merged_outer = &result.merged_non_nested_types[0];
    assert_eq!(merged_outer.target_type, outer);

    // The inner merge carries the edited body; the extra type is new.
    let mut saw_inner_merge = false;
    let mut saw_new_extra = false;
    for nested in &merged_outer.nested_types {
        match nested {
            ilweld_importer::ImportedType::Merged(m) => {
                assert_eq!(m.target_type, inner);
                assert_eq!(m.edited_method_bodies.len(), 1);
                saw_inner_merge = true;
            }
            ilweld_importer::ImportedType::New(n) => {
                assert_eq!(target.type_def(n.target_type).name, "Extra");
                assert_eq!(target.type_def(n.target_type).enclosing_type, Some(outer));
                saw_new_extra = true;
            }
        }
    }
    assert!(saw_inner_merge);
    assert!(saw_new_extra);
}
