//! Classifying resolution scopes as source, target or foreign.

use ilweld_metadata::{AssemblyInfo, TypeRefScope};

use crate::importer::Importer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    Source,
    Target,
    Foreign,
}

impl Importer<'_> {
    pub(crate) fn classify_assembly(&self, info: &AssemblyInfo) -> ScopeKind {
        if self
            .src()
            .assembly
            .as_ref()
            .is_some_and(|a| a.matches(info))
        {
            ScopeKind::Source
        } else if self
            .target
            .assembly
            .as_ref()
            .is_some_and(|a| a.matches(info))
        {
            ScopeKind::Target
        } else {
            ScopeKind::Foreign
        }
    }

    pub(crate) fn classify_module_name(&self, name: &str) -> ScopeKind {
        if self.src().name.eq_ignore_ascii_case(name) {
            ScopeKind::Source
        } else if self.target.name.eq_ignore_ascii_case(name) {
            ScopeKind::Target
        } else {
            ScopeKind::Foreign
        }
    }

    /// Classify a non-nested resolution scope of a source type reference.
    /// `TypeRefScope::TypeRef` must be walked off by the caller first.
    pub(crate) fn classify_type_ref_scope(&self, scope: TypeRefScope) -> ScopeKind {
        match scope {
            TypeRefScope::AssemblyRef(id) => {
                let info = self.src().assembly_ref(id).info.clone();
                self.classify_assembly(&info)
            }
            TypeRefScope::ModuleRef(id) => {
                let name = self.src().module_ref(id).name.clone();
                self.classify_module_name(&name)
            }
            // A bare module scope means the defining module itself.
            TypeRefScope::Module => ScopeKind::Source,
            TypeRefScope::TypeRef(_) => ScopeKind::Source,
        }
    }
}
