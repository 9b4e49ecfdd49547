use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticSeverity;

/// Importer error codes.
/// Format: IM[XXXX], stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    IM0001, // Declaring type of the edited method not found in the compiled module
    IM0002, // Edited method not found in the compiled module
    IM0003, // Type reference targeting the edited module could not be resolved
    IM0004, // Referenced method not found in either module
    IM0005, // Referenced field not found in either module
    IM0006, // Renaming a virtual property is not supported
    IM0007, // Renaming a virtual event is not supported
    IM0008, // Renaming a virtual method is not supported
    IM0009, // Toggling static on the edited method is not supported
}

impl DiagnosticCode {
    pub fn severity(&self) -> DiagnosticSeverity {
        // Every importer code is an error; warnings keep the severity channel open.
        DiagnosticSeverity::Error
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::IM0001 => "IM0001",
            DiagnosticCode::IM0002 => "IM0002",
            DiagnosticCode::IM0003 => "IM0003",
            DiagnosticCode::IM0004 => "IM0004",
            DiagnosticCode::IM0005 => "IM0005",
            DiagnosticCode::IM0006 => "IM0006",
            DiagnosticCode::IM0007 => "IM0007",
            DiagnosticCode::IM0008 => "IM0008",
            DiagnosticCode::IM0009 => "IM0009",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            DiagnosticCode::IM0001 => {
                "Could not find the edited method's declaring type in the compiled module"
            }
            DiagnosticCode::IM0002 => "Could not find the edited method in the compiled module",
            DiagnosticCode::IM0003 => {
                "Could not resolve a type reference targeting the edited module"
            }
            DiagnosticCode::IM0004 => "Could not find a referenced method in either module",
            DiagnosticCode::IM0005 => "Could not find a referenced field in either module",
            DiagnosticCode::IM0006 => "Renaming a virtual property is not supported",
            DiagnosticCode::IM0007 => "Renaming a virtual event is not supported",
            DiagnosticCode::IM0008 => "Renaming a virtual method is not supported",
            DiagnosticCode::IM0009 => {
                "Changing the edited method between static and instance is not supported"
            }
        }
    }
}
