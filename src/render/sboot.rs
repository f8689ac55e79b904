//! `sboot generate` scaffold command rendering.

use crate::diagnostics::{Diagnostics, Location};
use crate::schema::{Field, Schema, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

static LEADING_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)").unwrap());

/// Field types understood by the scaffold generator (compared case-insensitively)
pub const SUPPORTED_TYPES: [&str; 12] = [
    "string", "text", "varchar", "varchar2", "number", "long", "int", "integer", "double",
    "numeric", "date", "uuid",
];

/// Kind of stack the scaffold generator produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackEnv {
    #[default]
    Fullstack,
    Api,
    Backend,
    Conversion,
    Persistence,
}

impl FromStr for StackEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fullstack" => Ok(StackEnv::Fullstack),
            "api" => Ok(StackEnv::Api),
            "backend" => Ok(StackEnv::Backend),
            "conversion" => Ok(StackEnv::Conversion),
            "persistence" => Ok(StackEnv::Persistence),
            _ => Err(format!(
                "Unknown stack '{}'. Valid options: fullstack, api, backend, conversion, persistence",
                s
            )),
        }
    }
}

impl fmt::Display for StackEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackEnv::Fullstack => write!(f, "fullstack"),
            StackEnv::Api => write!(f, "api"),
            StackEnv::Backend => write!(f, "backend"),
            StackEnv::Conversion => write!(f, "conversion"),
            StackEnv::Persistence => write!(f, "persistence"),
        }
    }
}

/// Renders one `sboot generate` line per table
#[derive(Debug, Clone, Copy, Default)]
pub struct SbootGenerator {
    env: StackEnv,
}

impl SbootGenerator {
    pub fn new(env: StackEnv) -> Self {
        Self { env }
    }

    /// Render the command script, tables in dependency order
    pub fn generate(&self, schema: &Schema, diagnostics: &mut Diagnostics) -> String {
        schema
            .ordered(diagnostics)
            .into_iter()
            .map(|table| self.command(table, diagnostics))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn command(&self, table: &Table, diagnostics: &mut Diagnostics) -> String {
        let mut line = format!("sboot generate --env={} {}", self.env, table.name);
        if let Some(plural) = &table.plural {
            line.push(':');
            line.push_str(plural);
        }
        line.push(' ');

        let fields: Vec<String> = table
            .fields
            .iter()
            .map(|field| field_spec(table, field, diagnostics))
            .collect();
        line.push_str(&fields.join(" "));
        line
    }
}

fn field_spec(table: &Table, field: &Field, diagnostics: &mut Diagnostics) -> String {
    let mut spec = field.name.clone();
    if let Some(scaffold_type) = scaffold_type(table, field, diagnostics) {
        spec.push(':');
        spec.push_str(&scaffold_type);
    }
    if !field.constraints.is_empty() {
        spec.push(':');
        spec.push_str(&field.constraints.concat());
    }
    spec
}

/// Scaffold type for a field: the first word of its declared type
fn scaffold_type(table: &Table, field: &Field, diagnostics: &mut Diagnostics) -> Option<String> {
    let declared = field.data_type();
    let word = LEADING_WORD_RE
        .captures(declared)
        .and_then(|caps| caps.get(1))
        .map_or(declared, |m| m.as_str());

    if word.is_empty() {
        return None;
    }
    if word.eq_ignore_ascii_case("char") {
        return Some("text".to_string());
    }
    if SUPPORTED_TYPES.iter().any(|t| t.eq_ignore_ascii_case(word)) {
        return Some(word.to_string());
    }

    diagnostics.warning(
        "unsupported-scaffold-type",
        format!(
            "type {} is not supported by sboot (field {}.{})",
            word, table.name, field.name
        ),
        Location::new()
            .with_table(&table.name)
            .with_field(&field.name)
            .with_node(&field.node_id),
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{TableId, PK_CONSTRAINT};

    fn table_with(fields: &[(&str, &str, bool)]) -> Table {
        let mut table = Table::new(TableId(0), "t", "customer");
        for (i, (name, data_type, pk)) in fields.iter().enumerate() {
            let mut field = Field::new(format!("f{}", i), TableId(0), name);
            field.set_data_type(data_type);
            if *pk {
                field.constraints.push(PK_CONSTRAINT.to_string());
            }
            table.add_field(field);
        }
        table
    }

    #[test]
    fn test_command_line() {
        let mut table = table_with(&[
            ("id", "Integer", true),
            ("code", "Char(3)", false),
            ("name", "Varchar(80)", false),
            ("note", "", false),
        ]);
        table.plural = Some("customers".to_string());

        let mut diags = Diagnostics::new();
        let line = SbootGenerator::new(StackEnv::Api).command(&table, &mut diags);

        assert_eq!(
            line,
            "sboot generate --env=api customer:customers id:Integer:pk code:text name:Varchar note"
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unsupported_type_warns() {
        let table = table_with(&[("photo", "Blob", false)]);
        let mut diags = Diagnostics::new();
        let line = SbootGenerator::default().command(&table, &mut diags);

        assert_eq!(line, "sboot generate --env=fullstack customer photo");
        assert_eq!(diags.with_code("unsupported-scaffold-type").count(), 1);
    }

    #[test]
    fn test_stack_env_parse() {
        assert_eq!("Persistence".parse::<StackEnv>(), Ok(StackEnv::Persistence));
        assert!("mobile".parse::<StackEnv>().is_err());
    }
}
