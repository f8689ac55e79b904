//! JSON dump of the schema model.

use crate::diagnostics::{Diagnostic, Diagnostics, Severity};
use crate::schema::{Schema, SchemaGraph, Table};
use schemars::JsonSchema;
use serde::Serialize;

/// JSON output of the `inspect` command
#[derive(Debug, Serialize, JsonSchema)]
pub struct InspectJsonOutput {
    pub input: String,
    /// Tables in dependency order
    pub tables: Vec<TableJson>,
    /// Tables whose placement was forced by a reference cycle
    pub cyclic_tables: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: InspectSummary,
}

/// JSON representation of a table
#[derive(Debug, Serialize, JsonSchema)]
pub struct TableJson {
    pub name: String,
    pub node_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    pub fields: Vec<FieldJson>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyJson>,
    /// Script emitted before the table's `Create Table`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pre_script: String,
    /// Script emitted after the table's comments
    #[serde(skip_serializing_if = "String::is_empty")]
    pub post_script: String,
}

/// JSON representation of a field
#[derive(Debug, Serialize, JsonSchema)]
pub struct FieldJson {
    pub name: String,
    pub node_id: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub family: String,
    pub not_null: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    pub constraints: Vec<String>,
}

/// JSON representation of a foreign key
#[derive(Debug, Serialize, JsonSchema)]
pub struct ForeignKeyJson {
    pub name: String,
    pub kind: String,
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

/// Model statistics
#[derive(Debug, Serialize, JsonSchema)]
pub struct InspectSummary {
    pub table_count: usize,
    pub field_count: usize,
    pub foreign_key_count: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// Build the JSON structure, ordering tables and reporting cycles into
/// `diagnostics` first
pub fn build_inspect_json(
    input: &str,
    schema: &Schema,
    mut diagnostics: Diagnostics,
) -> InspectJsonOutput {
    let result = SchemaGraph::from_schema(schema).topo_sort();
    result.report_cycles(schema, &mut diagnostics);

    let tables: Vec<TableJson> = result
        .order
        .iter()
        .filter_map(|&id| schema.table(id))
        .map(|table| table_json(schema, table))
        .collect();

    let cyclic_tables = result
        .cyclic_tables
        .iter()
        .filter_map(|&id| schema.table(id).map(|t| t.name.clone()))
        .collect();

    let summary = InspectSummary {
        table_count: tables.len(),
        field_count: tables.iter().map(|t| t.fields.len()).sum(),
        foreign_key_count: tables.iter().map(|t| t.foreign_keys.len()).sum(),
        errors: diagnostics.count(Severity::Error),
        warnings: diagnostics.count(Severity::Warning),
    };

    InspectJsonOutput {
        input: input.to_string(),
        tables,
        cyclic_tables,
        diagnostics: diagnostics.into_items(),
        summary,
    }
}

fn table_json(schema: &Schema, table: &Table) -> TableJson {
    let fields = table
        .fields
        .iter()
        .map(|field| FieldJson {
            name: field.name.clone(),
            node_id: field.node_id.clone(),
            data_type: field.data_type().to_string(),
            family: field.family().to_string(),
            not_null: field.not_null,
            unique: field.unique,
            default: field.default.clone(),
            comment: field.comment.clone(),
            constraints: field.constraints.clone(),
        })
        .collect();

    let foreign_keys = table
        .foreign_keys
        .iter()
        .map(|fk| ForeignKeyJson {
            name: fk.name.clone(),
            kind: fk.kind.to_string(),
            column: schema
                .field(fk.child)
                .map(|f| f.name.clone())
                .unwrap_or_default(),
            references_table: schema
                .table(fk.master.table)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            references_column: schema
                .field(fk.master)
                .map(|f| f.name.clone())
                .unwrap_or_default(),
        })
        .collect();

    TableJson {
        name: table.name.clone(),
        node_id: table.node_id.clone(),
        plural: table.plural.clone(),
        comment: table.comment.clone(),
        fields,
        primary_key: table.primary_key.clone(),
        foreign_keys,
        pre_script: table.pre_script.clone(),
        post_script: table.post_script.clone(),
    }
}

/// Serialize the inspection output as pretty JSON
pub fn to_json(output: &InspectJsonOutput) -> String {
    serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
}

/// JSON output of the `validate` command
#[derive(Debug, Serialize, JsonSchema)]
pub struct ValidateJsonOutput {
    pub dialect: String,
    pub strict: bool,
    pub files: Vec<FileValidationJson>,
    pub summary: ValidateSummary,
}

/// Validation result of one diagram
#[derive(Debug, Serialize, JsonSchema)]
pub struct FileValidationJson {
    pub input: String,
    pub passed: bool,
    /// Fatal error that stopped decoding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub table_count: usize,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileValidationJson {
    /// Result for a diagram that was read and validated
    pub fn from_diagnostics(
        input: &str,
        table_count: usize,
        diagnostics: Diagnostics,
        strict: bool,
    ) -> Self {
        let errors = diagnostics.count(Severity::Error);
        let warnings = diagnostics.count(Severity::Warning);
        Self {
            input: input.to_string(),
            passed: errors == 0 && !(strict && warnings > 0),
            error: None,
            table_count,
            errors,
            warnings,
            diagnostics: diagnostics.into_items(),
        }
    }

    /// Result for a diagram that could not be read
    pub fn failed(input: &str, error: String) -> Self {
        Self {
            input: input.to_string(),
            passed: false,
            error: Some(error),
            table_count: 0,
            errors: 1,
            warnings: 0,
            diagnostics: Vec::new(),
        }
    }
}

/// Totals across validated diagrams
#[derive(Debug, Default, Serialize, JsonSchema)]
pub struct ValidateSummary {
    pub total_files: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl ValidateSummary {
    pub fn from_files(files: &[FileValidationJson]) -> Self {
        let passed = files.iter().filter(|f| f.passed).count();
        Self {
            total_files: files.len(),
            passed,
            failed: files.len() - passed,
            errors: files.iter().map(|f| f.errors).sum(),
            warnings: files.iter().map(|f| f.warnings).sum(),
        }
    }
}
