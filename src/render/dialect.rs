//! SQL dialect rules for DDL generation.
//!
//! The schema model knows nothing about dialects; every dialect-specific
//! choice goes through the [`DdlDialect`] trait.

use crate::diagnostics::{Diagnostics, Location};
use crate::schema::{Field, ForeignKey, Schema, Table};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Text fields at or above this size do not fit an Oracle Varchar2
pub const ORACLE_MAX_TEXT_SIZE: u32 = 4096;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    H2,
    Oracle,
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "h2" => Ok(SqlDialect::H2),
            "oracle" => Ok(SqlDialect::Oracle),
            _ => Err(format!(
                "Unsupported SQL dialect '{}'. Valid options: h2, oracle",
                s
            )),
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDialect::H2 => write!(f, "h2"),
            SqlDialect::Oracle => write!(f, "oracle"),
        }
    }
}

impl SqlDialect {
    /// The rule set for this dialect
    pub fn rules(&self) -> Box<dyn DdlDialect> {
        match self {
            SqlDialect::H2 => Box::new(H2Dialect),
            SqlDialect::Oracle => Box::new(OracleDialect),
        }
    }
}

/// Dialect hooks used by the DDL generator
pub trait DdlDialect {
    /// Display name used in the script header
    fn name(&self) -> &'static str;

    fn current_time(&self) -> &'static str {
        "Current_Time"
    }

    fn current_date(&self) -> &'static str {
        "Current_Date"
    }

    fn current_timestamp(&self) -> &'static str {
        "Current_Timestamp"
    }

    fn create_table(&self, table: &Table) -> String {
        format!("Create Table {}(\n", table.name)
    }

    fn primary_key(&self, table: &Table) -> String {
        format!("Primary Key ({})", table.primary_key.join(", "))
    }

    fn foreign_key(&self, schema: &Schema, fk: &ForeignKey) -> String {
        let names = FkNames::of(schema, fk);
        format!(
            "Foreign Key({}) References {}({})",
            names.child, names.master_table, names.master
        )
    }

    fn validate_field(&self, table: &Table, field: &Field, diagnostics: &mut Diagnostics) {
        check_not_null_default(table, field, diagnostics);
    }
}

/// Resolved names of a foreign key's fields
pub struct FkNames<'a> {
    pub child: &'a str,
    pub master_table: &'a str,
    pub master: &'a str,
}

impl<'a> FkNames<'a> {
    pub fn of(schema: &'a Schema, fk: &ForeignKey) -> Self {
        Self {
            child: schema.field(fk.child).map(|f| f.name.as_str()).unwrap_or(""),
            master_table: schema
                .table(fk.master.table)
                .map(|t| t.name.as_str())
                .unwrap_or(""),
            master: schema.field(fk.master).map(|f| f.name.as_str()).unwrap_or(""),
        }
    }
}

/// Warn about NOT NULL fields whose default is NULL
pub fn check_not_null_default(table: &Table, field: &Field, diagnostics: &mut Diagnostics) {
    if field.not_null && field.default.trim().eq_ignore_ascii_case("null") {
        diagnostics.warning(
            "not-null-default-null",
            format!(
                "field {}.{} declared NOT NULL with NULL as default value",
                table.name, field.name
            ),
            Location::new()
                .with_table(&table.name)
                .with_field(&field.name)
                .with_node(&field.node_id),
        );
    }
}

/// H2 uses the generic rules
#[derive(Debug, Clone, Copy, Default)]
pub struct H2Dialect;

impl DdlDialect for H2Dialect {
    fn name(&self) -> &'static str {
        "H2"
    }
}

/// Oracle: named constraints, `Sysdate` for current date/time values
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl DdlDialect for OracleDialect {
    fn name(&self) -> &'static str {
        "Oracle"
    }

    fn current_time(&self) -> &'static str {
        "Sysdate"
    }

    fn current_date(&self) -> &'static str {
        "Sysdate"
    }

    fn current_timestamp(&self) -> &'static str {
        "Sysdate"
    }

    fn primary_key(&self, table: &Table) -> String {
        format!(
            "Constraint PK_{} Primary Key ({})",
            table.name,
            table.primary_key.join(", ")
        )
    }

    fn foreign_key(&self, schema: &Schema, fk: &ForeignKey) -> String {
        let names = FkNames::of(schema, fk);
        format!(
            "Constraint FK_{} Foreign Key ({}) References {}({})",
            fk.name, names.child, names.master_table, names.master
        )
    }

    fn validate_field(&self, table: &Table, field: &Field, diagnostics: &mut Diagnostics) {
        check_not_null_default(table, field, diagnostics);

        if let Some(size) = field.size().filter(|&s| field.is_text() && s >= ORACLE_MAX_TEXT_SIZE)
        {
            diagnostics.warning(
                "oracle-text-size",
                format!(
                    "field {}.{} size {} is too big for oracle database",
                    table.name, field.name, size
                ),
                Location::new()
                    .with_table(&table.name)
                    .with_field(&field.name)
                    .with_node(&field.node_id),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("h2".parse::<SqlDialect>(), Ok(SqlDialect::H2));
        assert_eq!("ORACLE".parse::<SqlDialect>(), Ok(SqlDialect::Oracle));
        assert!("mysql".parse::<SqlDialect>().is_err());
    }

    #[test]
    fn test_dialect_names() {
        assert_eq!(SqlDialect::H2.rules().name(), "H2");
        assert_eq!(SqlDialect::Oracle.rules().current_date(), "Sysdate");
        assert_eq!(SqlDialect::H2.rules().current_date(), "Current_Date");
    }
}
