//! The import orchestrator.

use std::collections::{HashMap, HashSet};

use log::{debug, info};
use thiserror::Error;

use ilweld_metadata::{
    CilBody, DebugFile, DebugFileFormat, EventId, FieldId, MethodId, MethodImplAttributes,
    ModuleDef, ModuleReader, PropertyId, TypeDefId, TypeRefId, TypeDefOrRef,
};

use crate::diagnostics::{DiagnosticCode, DiagnosticCollection};
use crate::plan::{PlanKind, TypePlan};

/// Raised internally when the input is too inconsistent to continue; caught
/// at the public entry and turned into a failed [`ImportResult`].
#[derive(Debug, Error)]
#[error("module import aborted")]
pub(crate) struct ImporterAborted;

pub(crate) type ImportOp<T> = Result<T, ImporterAborted>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Keep RVAs of imported fields instead of zeroing them.
    pub keep_imported_rva: bool,
}

/// A source type that becomes a fresh type in the target module.
#[derive(Debug, Clone)]
pub struct NewImportedType {
    pub target_type: TypeDefId,
    pub source_type: TypeDefId,
}

/// A method of a merged type whose body is replaced.
#[derive(Debug, Clone)]
pub struct EditedMethodBody {
    pub target_method: MethodId,
    pub new_body: Option<CilBody>,
    pub impl_attributes: MethodImplAttributes,
}

/// A source type folded onto an existing target type: new members, new
/// nested types and replaced method bodies, to be applied by a downstream
/// merger.
#[derive(Debug, Clone)]
pub struct MergedImportedType {
    pub target_type: TypeDefId,
    pub source_type: TypeDefId,
    pub rename_duplicates: bool,
    pub nested_types: Vec<ImportedType>,
    pub new_fields: Vec<FieldId>,
    pub new_methods: Vec<MethodId>,
    pub new_properties: Vec<PropertyId>,
    pub new_events: Vec<EventId>,
    pub edited_method_bodies: Vec<EditedMethodBody>,
}

impl MergedImportedType {
    pub fn is_empty(&self) -> bool {
        self.new_fields.is_empty()
            && self.new_methods.is_empty()
            && self.new_properties.is_empty()
            && self.new_events.is_empty()
            && self.edited_method_bodies.is_empty()
            && self.nested_types.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum ImportedType {
    New(NewImportedType),
    Merged(MergedImportedType),
}

#[derive(Debug, Default)]
pub struct ImportResult {
    pub diagnostics: DiagnosticCollection,
    pub new_non_nested_types: Vec<NewImportedType>,
    pub merged_non_nested_types: Vec<MergedImportedType>,
}

impl ImportResult {
    pub fn is_success(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Per-body scratch handle: locals, parameters and instructions are indices
/// relative to their owning body or method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum BodyNode {
    Local(usize),
    Param(u16),
    Instr(usize),
}

/// Imports the types and members of a freshly compiled module into a target
/// module around one edited method. Single use: create, call
/// [`Importer::import`] (or [`Importer::import_module`]) once, read the
/// result.
pub struct Importer<'a> {
    pub(crate) target: &'a mut ModuleDef,
    pub(crate) source: Option<ModuleDef>,
    pub(crate) options: ImportOptions,
    pub(crate) diagnostics: DiagnosticCollection,
    pub(crate) plans: Vec<TypePlan>,
    pub(crate) type_map: HashMap<TypeDefId, usize>,
    pub(crate) type_ref_map: HashMap<TypeRefId, TypeDefOrRef>,
    pub(crate) method_map: HashMap<MethodId, MethodId>,
    pub(crate) field_map: HashMap<FieldId, FieldId>,
    pub(crate) property_map: HashMap<PropertyId, PropertyId>,
    pub(crate) event_map: HashMap<EventId, EventId>,
    pub(crate) stub_methods: HashSet<MethodId>,
    pub(crate) edited_methods_to_fix: Vec<(MethodId, MethodId)>,
    pub(crate) body_map: HashMap<BodyNode, BodyNode>,
    pub(crate) claimed_type_names: HashSet<(String, String)>,
}

impl<'a> Importer<'a> {
    pub fn new(target: &'a mut ModuleDef) -> Self {
        Self::with_options(target, ImportOptions::default())
    }

    pub fn with_options(target: &'a mut ModuleDef, options: ImportOptions) -> Self {
        Importer {
            target,
            source: None,
            options,
            diagnostics: DiagnosticCollection::new(),
            plans: Vec::new(),
            type_map: HashMap::new(),
            type_ref_map: HashMap::new(),
            method_map: HashMap::new(),
            field_map: HashMap::new(),
            property_map: HashMap::new(),
            event_map: HashMap::new(),
            stub_methods: HashSet::new(),
            edited_methods_to_fix: Vec::new(),
            body_map: HashMap::new(),
            claimed_type_names: HashSet::new(),
        }
    }

    /// Parse `raw` through `reader` and import the result around
    /// `target_method`. Only [`DebugFileFormat::None`] and
    /// [`DebugFileFormat::Pdb`] are supported; anything else fails fast.
    pub fn import(
        &mut self,
        reader: &dyn ModuleReader,
        raw: &[u8],
        debug_file: &DebugFile,
        target_method: MethodId,
    ) -> ImportResult {
        match debug_file.format {
            DebugFileFormat::None | DebugFileFormat::Pdb => {}
            DebugFileFormat::PortablePdb | DebugFileFormat::Embedded => {
                self.diagnostics.add_internal_error(format!(
                    "debug file format {:?} is not supported",
                    debug_file.format
                ));
                return self.take_result(false);
            }
        }
        let source = match reader.read_module(raw, debug_file) {
            Ok(module) => module,
            Err(err) => {
                self.diagnostics
                    .add_internal_error(format!("could not read the compiled module: {err}"));
                return self.take_result(false);
            }
        };
        self.import_module(source, target_method)
    }

    /// Import an already-parsed source module around `target_method`.
    pub fn import_module(&mut self, source: ModuleDef, target_method: MethodId) -> ImportResult {
        self.source = Some(source);
        let run = self.run_import(target_method);
        let result = self.take_result(run.is_ok());
        // Release the loaded source image on every exit path.
        self.source = None;
        result
    }

    fn run_import(&mut self, target_method: MethodId) -> ImportOp<()> {
        let source_method = self.find_edited_method(target_method)?;
        debug!(
            "planning import of {} top-level source types",
            self.src().top_level_types.len()
        );
        self.plan_types(source_method, target_method)?;
        self.create_members()?;
        self.fill_type_infos()?;
        self.fill_members()?;
        self.import_properties_and_events()?;
        self.rename_merged_duplicates()?;
        debug!("importing method bodies for {} planned types", self.plans.len());
        self.import_bodies_and_overrides()?;
        self.fix_edited_methods()?;
        Ok(())
    }

    fn take_result(&mut self, succeeded: bool) -> ImportResult {
        let (new_tops, merged_tops) = if succeeded {
            self.build_result_types()
        } else {
            (Vec::new(), Vec::new())
        };
        let diagnostics = std::mem::take(&mut self.diagnostics);
        info!(
            "import finished: {} new types, {} merged types, {} diagnostics",
            new_tops.len(),
            merged_tops.len(),
            diagnostics.len()
        );
        ImportResult {
            diagnostics,
            new_non_nested_types: new_tops,
            merged_non_nested_types: merged_tops,
        }
    }

    fn build_result_types(&self) -> (Vec<NewImportedType>, Vec<MergedImportedType>) {
        let mut new_tops = Vec::new();
        let mut merged_tops = Vec::new();
        for (idx, plan) in self.plans.iter().enumerate() {
            if plan.parent.is_some() {
                continue;
            }
            match plan.kind {
                PlanKind::New => new_tops.push(self.build_new_type(idx)),
                PlanKind::Merged { .. } => {
                    let merged = self.build_merged_type(idx);
                    // Empty merges carry no work for the merger.
                    if !merged.is_empty() {
                        merged_tops.push(merged);
                    }
                }
            }
        }
        (new_tops, merged_tops)
    }

    fn build_new_type(&self, idx: usize) -> NewImportedType {
        let plan = &self.plans[idx];
        NewImportedType {
            target_type: plan.target_type,
            source_type: plan.source_type,
        }
    }

    fn build_merged_type(&self, idx: usize) -> MergedImportedType {
        let plan = &self.plans[idx];
        let rename_duplicates = matches!(
            plan.kind,
            PlanKind::Merged {
                rename_duplicates: true
            }
        );
        let mut nested_types = Vec::new();
        for &child in &plan.children {
            match self.plans[child].kind {
                PlanKind::New => nested_types.push(ImportedType::New(self.build_new_type(child))),
                PlanKind::Merged { .. } => {
                    let merged = self.build_merged_type(child);
                    if !merged.is_empty() {
                        nested_types.push(ImportedType::Merged(merged));
                    }
                }
            }
        }
        MergedImportedType {
            target_type: plan.target_type,
            source_type: plan.source_type,
            rename_duplicates,
            nested_types,
            new_fields: plan.created_fields.iter().map(|&(_, t)| t).collect(),
            new_methods: plan.created_methods.iter().map(|&(_, t)| t).collect(),
            new_properties: plan.created_properties.iter().map(|&(_, t)| t).collect(),
            new_events: plan.created_events.iter().map(|&(_, t)| t).collect(),
            edited_method_bodies: plan.edited_method_bodies.clone(),
        }
    }

    pub(crate) fn src(&self) -> &ModuleDef {
        self.source.as_ref().expect("source module not loaded")
    }

    pub(crate) fn report(&mut self, code: DiagnosticCode, message: String) {
        self.diagnostics.add_error(code, message);
    }

    pub(crate) fn fatal<T>(&mut self, code: DiagnosticCode, message: String) -> ImportOp<T> {
        self.report(code, message);
        Err(ImporterAborted)
    }

    pub(crate) fn fatal_internal<T>(&mut self, message: String) -> ImportOp<T> {
        self.diagnostics.add_internal_error(message);
        Err(ImporterAborted)
    }
}
