//! Focused checks for the quantified importer properties: naming, renaming,
//! stub redirection, parameter remapping and the scope-recursion bound.

mod support;

use ilweld_importer::diagnostics::DiagnosticCode;
use ilweld_importer::{ImportResult, Importer};
use ilweld_metadata::{
    DebugFile, DebugFileFormat, Instruction, MethodId, MethodRef, MethodSig, ModuleDef,
    ModuleReader, OpCode, Operand, ReadError, TypeDefOrRef, TypeRef, TypeRefScope, TypeSig,
};

use support::*;

fn simple_target() -> (ModuleDef, MethodId) {
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

fn source_with_edited_method(body: ilweld_metadata::CilBody) -> ModuleDef {
    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let c = add_class(&mut source, "Ns", "C");
    add_method(
        &mut source,
        c,
        "M",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(body),
    );
    source
}

fn run(target: &mut ModuleDef, source: ModuleDef, edited: MethodId) -> ImportResult {
    Importer::new(target).import_module(source, edited)
}

#[test]
fn new_top_level_types_get_unique_prefixed_names() {
    let (mut target, edited) = simple_target();
    add_class(&mut target, "Ns", "Helper");
    add_class(&mut target, "Ns", "Gen`1");

    let mut source = source_with_edited_method(ret_body());
    add_class(&mut source, "Ns", "Helper");
    add_class(&mut source, "Ns", "Gen`1");
    add_class(&mut source, "Ns", "Fresh");

    let result = run(&mut target, source, edited);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let names: Vec<String> = result
        .new_non_nested_types
        .iter()
        .map(|n| target.type_def(n.target_type).name.clone())
        .collect();
    assert!(names.contains(&"__0__Helper".to_string()), "{names:?}");
    // The arity suffix stays at the end of the name.
    assert!(names.contains(&"__0__Gen`1".to_string()), "{names:?}");
    assert!(names.contains(&"Fresh".to_string()), "{names:?}");

    // Uniqueness among target top-level names and the new ones combined.
    let mut all: Vec<(String, String)> = names
        .iter()
        .map(|n| ("Ns".to_string(), n.clone()))
        .collect();
    for &t in &target.top_level_types {
        let td = target.type_def(t);
        all.push((td.namespace.clone(), td.name.clone()));
    }
    let before = all.len();
    all.sort();
    all.dedup();
    assert_eq!(before, all.len());
}

#[test]
fn rename_scheme_skips_names_the_compiler_already_took() {
    let (mut target, edited) = simple_target();
    let target_global = target.global_type().unwrap();
    add_method(
        &mut target,
        target_global,
        "Helper",
        MethodSig::static_method(TypeSig::Void, vec![TypeSig::I4]),
        Some(ret_body()),
    );
    add_method(
        &mut target,
        target_global,
        "Helper_0",
        MethodSig::static_method(TypeSig::Void, vec![TypeSig::I4]),
        Some(ret_body()),
    );

    let mut source = source_with_edited_method(ret_body());
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
        .unwrap();
    assert_eq!(target.method(global_merge.new_methods[0]).name, "Helper_1");
}

#[test]
fn renaming_a_virtual_method_is_rejected_with_im0008() {
    let (mut target, edited) = simple_target();
    let target_global = target.global_type().unwrap();
    add_virtual_method(
        &mut target,
        target_global,
        "V",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );

    let mut source = source_with_edited_method(ret_body());
    let source_global = source.global_type().unwrap();
    add_virtual_method(
        &mut source,
        source_global,
        "V",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );

    let result = run(&mut target, source, edited);
    assert_eq!(result.diagnostics.with_code(DiagnosticCode::IM0008).count(), 1);
    // The colliding member keeps its name.
    let global_merge = result
        .merged_non_nested_types
        .iter()
        .find(|m| m.target_type == target_global)
        .unwrap();
    assert_eq!(target.method(global_merge.new_methods[0]).name, "V");
}

#[test]
fn references_to_stub_members_redirect_to_the_target_originals() {
    let (mut target, edited) = simple_target();
    let target_type = target.method(edited).declaring_type.unwrap();
    let target_helper = add_method(
        &mut target,
        target_type,
        "H",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );
    let rows_before = target.last_row_id();

    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let c = add_class(&mut source, "Ns", "C");
    let source_helper = add_method(
        &mut source,
        c,
        "H",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );
    let body = body_with(vec![
        Instruction::with_operand(OpCode::Ldarg0, Operand::Param(0)),
        Instruction::with_operand(OpCode::Call, Operand::Method(MethodRef::Def(source_helper))),
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
    assert!(merged.new_methods.is_empty());
    // No new rows were created for the stub.
    assert_eq!(target.last_row_id(), rows_before);

    let body = merged.edited_method_bodies[0].new_body.as_ref().unwrap();
    assert_eq!(
        body.instructions[1].operand,
        Operand::Method(MethodRef::Def(target_helper))
    );
}

#[test]
fn edited_method_parameters_are_remapped_onto_target_slots() {
    let mut target = new_module("App", "app.dll");
    let c = add_class(&mut target, "Ns", "C");
    let edited = add_method(
        &mut target,
        c,
        "M",
        MethodSig::instance_method(TypeSig::Void, vec![TypeSig::I4]),
        Some(ret_body()),
    );

    // The edit made the method static; its first real parameter sits at
    // slot 0 in the source but slot 1 in the instance target.
    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let sc = add_class(&mut source, "Ns", "C");
    let body = body_with(vec![
        Instruction::with_operand(OpCode::Ldarg, Operand::Param(0)),
        Instruction::new(OpCode::Pop),
        Instruction::new(OpCode::Ret),
    ]);
    add_method(
        &mut source,
        sc,
        "M",
        MethodSig::static_method(TypeSig::Void, vec![TypeSig::I4]),
        Some(body),
    );

    let result = run(&mut target, source, edited);
    assert_eq!(result.diagnostics.with_code(DiagnosticCode::IM0009).count(), 1);
    let merged = &result.merged_non_nested_types[0];
    let body = merged.edited_method_bodies[0].new_body.as_ref().unwrap();
    assert_eq!(body.instructions.len(), 3);
    assert_eq!(body.instructions[0].opcode, OpCode::Ldarg);
    assert_eq!(body.instructions[0].operand, Operand::Param(1));
    assert_eq!(
        merged.edited_method_bodies[0].impl_attributes,
        ilweld_metadata::MethodImplAttributes::empty()
    );
}

#[test]
fn unresolvable_target_type_ref_reports_im0003() {
    let (mut target, edited) = simple_target();

    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let c = add_class(&mut source, "Ns", "C");
    let app_ref = source.alloc_assembly_ref(assembly("App"));
    let missing = source.alloc_type_ref(TypeRef::new(
        TypeRefScope::AssemblyRef(app_ref),
        "Ns",
        "DoesNotExist",
    ));
    let body = body_with(vec![
        Instruction::with_operand(OpCode::Ldtoken, Operand::Type(TypeDefOrRef::Ref(missing))),
        Instruction::new(OpCode::Pop),
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
    assert_eq!(result.diagnostics.with_code(DiagnosticCode::IM0003).count(), 1);
    let merged = &result.merged_non_nested_types[0];
    let body = merged.edited_method_bodies[0].new_body.as_ref().unwrap();
    // The operand is nulled out but the instruction stream keeps its shape.
    assert_eq!(body.instructions.len(), 3);
    assert_eq!(body.instructions[0].operand, Operand::None);
}

#[test]
fn scope_chains_longer_than_the_bound_resolve_to_null() {
    let (mut target, edited) = simple_target();

    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let c = add_class(&mut source, "Ns", "C");
    let foreign = source.alloc_assembly_ref(assembly("Elsewhere"));
    let mut scope = TypeRefScope::AssemblyRef(foreign);
    let mut innermost = None;
    for depth in 0..=500 {
        let tr = source.alloc_type_ref(TypeRef::new(scope, "", format!("Nested{depth}")));
        scope = TypeRefScope::TypeRef(tr);
        innermost = Some(tr);
    }
    let body = body_with(vec![
        Instruction::with_operand(
            OpCode::Ldtoken,
            Operand::Type(TypeDefOrRef::Ref(innermost.unwrap())),
        ),
        Instruction::new(OpCode::Pop),
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
    let merged = &result.merged_non_nested_types[0];
    let body = merged.edited_method_bodies[0].new_body.as_ref().unwrap();
    assert_eq!(body.instructions[0].operand, Operand::None);
}

#[test]
fn missing_declaring_type_fails_with_im0001() {
    let (mut target, edited) = simple_target();

    // The compiled module lost the edited class entirely.
    let source = new_module("App.Edit0", "app.edit0.dll");

    let result = run(&mut target, source, edited);
    assert!(!result.is_success());
    assert_eq!(result.diagnostics.with_code(DiagnosticCode::IM0001).count(), 1);
    assert!(result.new_non_nested_types.is_empty());
    assert!(result.merged_non_nested_types.is_empty());
}

#[test]
fn missing_edited_method_fails_with_im0002() {
    let (mut target, edited) = simple_target();

    let mut source = new_module("App.Edit0", "app.edit0.dll");
    let c = add_class(&mut source, "Ns", "C");
    add_method(
        &mut source,
        c,
        "SomethingElse",
        MethodSig::instance_method(TypeSig::Void, vec![]),
        Some(ret_body()),
    );

    let result = run(&mut target, source, edited);
    assert!(!result.is_success());
    assert_eq!(result.diagnostics.with_code(DiagnosticCode::IM0002).count(), 1);
}

/// Reader that hands back a pre-built module, standing in for a real
/// metadata parser behind the `ModuleReader` seam.
struct FixedReader {
    module: ModuleDef,
}

impl ModuleReader for FixedReader {
    fn read_module(&self, _raw: &[u8], _debug: &DebugFile) -> Result<ModuleDef, ReadError> {
        Ok(self.module.clone())
    }
}

#[test]
fn raw_bytes_entry_goes_through_the_reader() {
    let (mut target, edited) = simple_target();
    let reader = FixedReader {
        module: source_with_edited_method(ret_body()),
    };
    let result =
        Importer::new(&mut target).import(&reader, &[0x4d, 0x5a], &DebugFile::none(), edited);
    assert!(result.is_success());
    assert_eq!(result.merged_non_nested_types.len(), 1);
}

#[test]
fn portable_pdb_input_fails_fast() {
    let (mut target, edited) = simple_target();
    let reader = FixedReader {
        module: source_with_edited_method(ret_body()),
    };
    let debug = DebugFile {
        format: DebugFileFormat::PortablePdb,
        raw: vec![0x42],
    };
    let result = Importer::new(&mut target).import(&reader, &[0x4d, 0x5a], &debug, edited);
    assert!(!result.is_success());
    assert!(result.merged_non_nested_types.is_empty());
    // The assertion reaches the stream without a stable code.
    assert!(result.diagnostics.iter().any(|d| d.code.is_none()));
}

#[test]
fn unedited_body_round_trips_instruction_for_instruction() {
    let (mut target, edited) = simple_target();

    let mut source = source_with_edited_method(ret_body());
    let source_global = source.global_type().unwrap();
    let mut body = body_with(vec![
        Instruction::with_operand(OpCode::LdcI4, Operand::I4(41)),
        Instruction::with_operand(OpCode::LdcI4S, Operand::I1(1)),
        Instruction::new(OpCode::Add),
        Instruction::new(OpCode::Ret),
    ]);
    for (offset, instruction) in body.instructions.iter_mut().enumerate() {
        instruction.offset = offset as u32 * 2;
    }
    add_method(
        &mut source,
        source_global,
        "Calc",
        MethodSig::static_method(TypeSig::I4, vec![]),
        Some(body),
    );

    let result = run(&mut target, source, edited);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let global_merge = result
        .merged_non_nested_types
        .iter()
        .find(|m| m.rename_duplicates)
        .unwrap();
    let imported = target
        .method(global_merge.new_methods[0])
        .body
        .as_ref()
        .unwrap();
    assert_eq!(imported.instructions.len(), 4);
    let expected = [
        (OpCode::LdcI4, Operand::I4(41), 0),
        (OpCode::LdcI4S, Operand::I1(1), 2),
        (OpCode::Add, Operand::None, 4),
        (OpCode::Ret, Operand::None, 6),
    ];
    for (instruction, (opcode, operand, offset)) in
        imported.instructions.iter().zip(expected.iter())
    {
        assert_eq!(instruction.opcode, *opcode);
        assert_eq!(instruction.operand, *operand);
        assert_eq!(instruction.offset, *offset);
    }
}
