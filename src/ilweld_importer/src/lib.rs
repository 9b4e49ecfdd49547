//! Importer for freshly compiled managed modules.
//!
//! Given a compiled source module and one edited target method, the importer
//! translates the source module's types, members, signatures and method
//! bodies into the target module's identity space: the edited declaring
//! chain is merged in place, the global type is merged with renaming, and
//! every other type becomes a fresh target type. The output is a set of
//! descriptors plus a diagnostic stream for a downstream merger to apply;
//! recoverable problems become diagnostics, inconsistent input aborts with
//! the diagnostics accumulated so far.

pub mod diagnostics;

mod body_import;
mod compare;
mod importer;
mod member_import;
mod plan;
mod rename;
mod resolve;
mod scope;
mod sig_import;

pub use importer::{
    EditedMethodBody, ImportOptions, ImportResult, ImportedType, Importer, MergedImportedType,
    NewImportedType,
};
