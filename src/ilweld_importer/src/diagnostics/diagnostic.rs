use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticCode, DiagnosticSeverity};

/// A single importer diagnostic. Internal failure assertions carry no code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: Option<DiagnosticCode>,
    pub message: String,
    pub location: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: String) -> Self {
        Diagnostic {
            severity: code.severity(),
            code: Some(code),
            message,
            location: None,
        }
    }

    pub fn error(code: DiagnosticCode, message: String) -> Self {
        debug_assert!(matches!(code.severity(), DiagnosticSeverity::Error));
        Self::new(code, message)
    }

    /// Create a diagnostic with the code's default message.
    pub fn with_default_message(code: DiagnosticCode) -> Self {
        Self::new(code, code.default_message().to_string())
    }

    /// An internal failure assertion: always an error, never coded.
    pub fn internal(message: String) -> Self {
        Diagnostic {
            severity: DiagnosticSeverity::Error,
            code: None,
            message,
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}: {}: {}", code.as_str(), self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_diagnostics_render_code_first() {
        let d = Diagnostic::with_default_message(DiagnosticCode::IM0004);
        assert_eq!(
            d.to_string(),
            "IM0004: error: Could not find a referenced method in either module"
        );
    }

    #[test]
    fn internal_diagnostics_render_without_a_code() {
        let d = Diagnostic::internal("debug file format Embedded is not supported".to_string());
        assert!(d.to_string().starts_with("error: "));
        assert!(d.code.is_none());
    }
}
