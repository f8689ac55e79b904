//! DDL script generation.

use super::dialect::{DdlDialect, SqlDialect};
use super::timestamp::normalize_timestamp;
use crate::diagnostics::{Diagnostics, Location};
use crate::schema::{Field, Schema, Table};

/// Column type used for fields declared without a type
pub const DEFAULT_STRING_TYPE: &str = "Varchar2(255)";

/// Renders a schema as a `Create Table` script for one dialect
pub struct DdlGenerator {
    rules: Box<dyn DdlDialect>,
    default_string_type: String,
}

impl DdlGenerator {
    pub fn new(dialect: SqlDialect) -> Self {
        Self::with_rules(dialect.rules())
    }

    /// Use a custom rule set
    pub fn with_rules(rules: Box<dyn DdlDialect>) -> Self {
        Self {
            rules,
            default_string_type: DEFAULT_STRING_TYPE.to_string(),
        }
    }

    pub fn with_default_string_type(mut self, data_type: impl Into<String>) -> Self {
        self.default_string_type = data_type.into();
        self
    }

    pub fn dialect_name(&self) -> &'static str {
        self.rules.name()
    }

    /// Run the dialect's field checks over every table
    pub fn validate(&self, schema: &Schema, diagnostics: &mut Diagnostics) {
        for table in schema.iter() {
            for field in &table.fields {
                self.rules.validate_field(table, field, diagnostics);
            }
        }
    }

    /// Render the full script, tables in dependency order
    pub fn generate(&self, schema: &Schema, diagnostics: &mut Diagnostics) -> String {
        let mut script = format!("/* Create script for {} database */\n\n", self.rules.name());

        for table in schema.ordered(diagnostics) {
            script.push_str(&self.generate_table(schema, table, diagnostics));
        }

        script
    }

    /// Render one `Create Table` statement with its comments and scripts
    pub fn generate_table(
        &self,
        schema: &Schema,
        table: &Table,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let mut ddl = String::new();
        let mut clauses = Vec::with_capacity(table.fields.len() + 1 + table.foreign_keys.len());
        let mut comments = Vec::new();

        if !table.comment.is_empty() {
            comments.push(format!(
                "Comment On Table {} Is '{}';",
                table.name,
                escape_quotes(&table.comment)
            ));
        }

        if !table.pre_script.is_empty() {
            ddl.push_str(&table.pre_script);
            ddl.push('\n');
        }
        ddl.push_str(&self.rules.create_table(table));

        for field in &table.fields {
            let mut column_type = if field.data_type().is_empty() {
                self.default_string_type.clone()
            } else {
                capitalize(field.data_type())
            };
            if !field.default.is_empty() {
                let value = self.default_value(table, field, diagnostics);
                column_type.push_str(&format!(" Default {}", value));
            }
            if field.not_null {
                column_type.push_str(" Not Null");
            }

            clauses.push(format!("{:<20} {}", field.name, column_type));

            if !field.comment.is_empty() {
                comments.push(format!(
                    "Comment On Column {}.{} Is '{}';",
                    table.name,
                    field.name,
                    escape_quotes(&field.comment)
                ));
            }
        }

        if !table.primary_key.is_empty() {
            clauses.push(self.rules.primary_key(table));
        }
        for fk in &table.foreign_keys {
            clauses.push(self.rules.foreign_key(schema, fk));
        }

        let body: Vec<String> = clauses.iter().map(|c| format!("    {}", c)).collect();
        ddl.push_str(&body.join(",\n"));
        ddl.push_str("\n);\n\n");

        if !comments.is_empty() {
            ddl.push_str(&comments.join("\n"));
            ddl.push_str("\n\n");
        }
        if !table.post_script.is_empty() {
            ddl.push_str(&table.post_script);
            ddl.push_str("\n\n");
        }

        ddl
    }

    /// Render a field's default value for its type family.
    ///
    /// `null` becomes `Null`, text (and untyped) values are quoted, timestamp
    /// values are normalized and anything else is emitted as is.
    pub fn default_value(&self, table: &Table, field: &Field, diagnostics: &mut Diagnostics) -> String {
        let value = field.default.as_str();

        if value.trim().eq_ignore_ascii_case("null") {
            return "Null".to_string();
        }
        if field.is_text() || field.data_type().is_empty() {
            return format!("'{}'", value);
        }
        if !field.is_timestamp() {
            return value.to_string();
        }

        match normalize_timestamp(self.rules.as_ref(), value) {
            Some(normalized) => normalized,
            None => {
                diagnostics.warning(
                    "unparsable-default",
                    format!(
                        "default value '{}' of field {}.{} is not a recognizable date",
                        value, table.name, field.name
                    ),
                    Location::new()
                        .with_table(&table.name)
                        .with_field(&field.name)
                        .with_node(&field.node_id),
                );
                format!("'{}'", value)
            }
        }
    }
}

/// Upper-case the first character, lower-case the rest
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn escape_quotes(text: &str) -> String {
    text.replace('\'', "''")
}
