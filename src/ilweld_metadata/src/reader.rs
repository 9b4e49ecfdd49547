//! The seam between this object model and a concrete binary reader.

use thiserror::Error;

use crate::module::ModuleDef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugFileFormat {
    None,
    Pdb,
    PortablePdb,
    Embedded,
}

/// Debug information delivered next to a compiled image.
#[derive(Debug, Clone)]
pub struct DebugFile {
    pub format: DebugFileFormat,
    pub raw: Vec<u8>,
}

impl DebugFile {
    pub fn none() -> Self {
        DebugFile {
            format: DebugFileFormat::None,
            raw: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("invalid module image: {0}")]
    InvalidImage(String),
    #[error("unsupported module feature: {0}")]
    Unsupported(String),
}

/// Parses a raw compiled image into a [`ModuleDef`]. Implementations wrap
/// whatever metadata library actually reads the binary format.
pub trait ModuleReader {
    fn read_module(&self, raw: &[u8], debug: &DebugFile) -> Result<ModuleDef, ReadError>;
}
