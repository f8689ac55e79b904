//! Diagram file to resolved schema, the part every command shares.

use crate::diagnostics::Diagnostics;
use crate::diagram::{self, DecodeError};
use crate::input::{read_diagram, DiagramSource};
use crate::schema::{build_schema, Schema};
use std::path::Path;

/// A decoded diagram with its model and the issues found reading it
#[derive(Debug)]
pub struct LoadedDiagram {
    pub source: DiagramSource,
    pub schema: Schema,
    pub diagnostics: Diagnostics,
}

/// Decode diagram bytes and build the schema model
pub fn schema_from_bytes(bytes: &[u8], hint: &str) -> Result<(Schema, Diagnostics), DecodeError> {
    let document = diagram::decode(bytes, hint)?;
    let mut diagnostics = Diagnostics::new();
    let schema = build_schema(&document, &mut diagnostics);
    Ok((schema, diagnostics))
}

/// Read, decode and model a diagram file
pub fn load(path: &Path) -> anyhow::Result<LoadedDiagram> {
    let source = read_diagram(path)?;
    let (schema, diagnostics) = schema_from_bytes(&source.bytes, &source.hint)
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;

    Ok(LoadedDiagram {
        source,
        schema,
        diagnostics,
    })
}
