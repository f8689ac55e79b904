//! Relational schema model extracted from a diagram.
//!
//! This module provides:
//! - Data models for tables, fields and foreign keys
//! - Entity extraction from a decoded diagram
//! - Relationship resolution with arrow-direction heuristics
//! - Dependency graph construction with topological ordering

mod extract;
mod graph;
mod relations;

pub use extract::*;
pub use graph::*;
pub use relations::*;

use crate::diagnostics::Diagnostics;
use crate::diagram::GraphDocument;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static NUMERIC_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(number|long|int|integer|double|numeric)").unwrap());

static TEXT_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(varchar|char|string|text)").unwrap());

static TIMESTAMP_TYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(date|time)").unwrap());

/// Trailing size of a type, e.g. `Varchar(255)`
static TYPE_SIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d+)\)$").unwrap());

/// Constraint tag marking a primary key field
pub const PK_CONSTRAINT: &str = "pk";

/// Unique identifier for a table within a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}

/// Position of a field within its table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(pub u32);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({})", self.0)
    }
}

/// Reference to a field of a specific table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub table: TableId,
    pub field: FieldId,
}

impl FieldRef {
    pub fn new(table: TableId, field: FieldId) -> Self {
        Self { table, field }
    }
}

/// Coarse classification of a declared field type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    /// number, long, int, integer, double, numeric
    Numeric,
    /// varchar, char, string, text
    Text,
    /// date, time and anything starting with them
    Timestamp,
    /// Empty or unrecognized type
    Unknown,
}

impl TypeFamily {
    /// Classify a normalized type string
    pub fn classify(data_type: &str) -> Self {
        if NUMERIC_TYPE_RE.is_match(data_type) {
            TypeFamily::Numeric
        } else if TEXT_TYPE_RE.is_match(data_type) {
            TypeFamily::Text
        } else if TIMESTAMP_TYPE_RE.is_match(data_type) {
            TypeFamily::Timestamp
        } else {
            TypeFamily::Unknown
        }
    }
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFamily::Numeric => write!(f, "numeric"),
            TypeFamily::Text => write!(f, "text"),
            TypeFamily::Timestamp => write!(f, "timestamp"),
            TypeFamily::Unknown => write!(f, "unknown"),
        }
    }
}

/// Relationship cardinality taken from an edge's arrow style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    /// `ERone`, also used for edges drawn without arrowhead
    One,
    /// `ERmandOne`
    MandatoryOne,
    /// `ERmany`
    Many,
    /// `ERoneToMany`
    OneToMany,
    /// `ERzeroToOne`
    ZeroToOne,
    /// `ERzeroToMany`
    ZeroToMany,
    /// Any other arrow style, kept verbatim
    Other(String),
    /// No arrow on either end
    Unspecified,
}

impl RelationKind {
    /// Map a draw.io arrow name to a relation kind
    pub fn from_arrow(arrow: Option<&str>) -> Self {
        match arrow {
            None => RelationKind::Unspecified,
            Some("none") | Some("ERone") => RelationKind::One,
            Some("ERmandOne") => RelationKind::MandatoryOne,
            Some("ERmany") => RelationKind::Many,
            Some("ERoneToMany") => RelationKind::OneToMany,
            Some("ERzeroToOne") => RelationKind::ZeroToOne,
            Some("ERzeroToMany") => RelationKind::ZeroToMany,
            Some(other) => RelationKind::Other(other.to_string()),
        }
    }

    /// The draw.io arrow name for this kind
    pub fn as_arrow(&self) -> &str {
        match self {
            RelationKind::One => "ERone",
            RelationKind::MandatoryOne => "ERmandOne",
            RelationKind::Many => "ERmany",
            RelationKind::OneToMany => "ERoneToMany",
            RelationKind::ZeroToOne => "ERzeroToOne",
            RelationKind::ZeroToMany => "ERzeroToMany",
            RelationKind::Other(arrow) => arrow,
            RelationKind::Unspecified => "",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::One => write!(f, "one-to-one"),
            RelationKind::MandatoryOne => write!(f, "mandatory-one"),
            RelationKind::Many => write!(f, "many"),
            RelationKind::OneToMany => write!(f, "one-to-many"),
            RelationKind::ZeroToOne => write!(f, "zero-to-one"),
            RelationKind::ZeroToMany => write!(f, "zero-to-many"),
            RelationKind::Other(arrow) => write!(f, "{}", arrow),
            RelationKind::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// Trim a table name and collapse inner whitespace to underscores
pub fn normalize_table_name(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw.trim(), "_").into_owned()
}

/// Like [`normalize_table_name`], decoding HTML non-breaking spaces first
pub fn normalize_field_name(raw: &str) -> String {
    normalize_table_name(&raw.replace("&nbsp;", " "))
}

/// Decode HTML non-breaking spaces and trim
pub fn normalize_type(raw: &str) -> String {
    raw.replace("&nbsp;", " ").trim().to_string()
}

/// Field (column) definition within a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Identifier of the diagram node the field was read from
    pub node_id: String,
    /// Owning table
    pub table: TableId,
    pub name: String,
    data_type: String,
    family: TypeFamily,
    pub not_null: bool,
    pub unique: bool,
    /// Default value literal with single quotes doubled
    pub default: String,
    pub comment: String,
    /// Constraint tags, currently only [`PK_CONSTRAINT`]
    pub constraints: Vec<String>,
}

impl Field {
    /// Create a field, normalizing its name
    pub fn new(node_id: impl Into<String>, table: TableId, raw_name: &str) -> Self {
        Self {
            node_id: node_id.into(),
            table,
            name: normalize_field_name(raw_name),
            data_type: String::new(),
            family: TypeFamily::Unknown,
            not_null: false,
            unique: false,
            default: String::new(),
            comment: String::new(),
            constraints: Vec::new(),
        }
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn family(&self) -> TypeFamily {
        self.family
    }

    /// Normalize and classify a declared type, returning its family
    pub fn set_data_type(&mut self, raw: &str) -> TypeFamily {
        self.data_type = normalize_type(raw);
        self.family = TypeFamily::classify(&self.data_type);
        self.family
    }

    /// Empty types are valid: they fall back to the default string type
    pub fn has_valid_type(&self) -> bool {
        self.data_type.is_empty() || self.family != TypeFamily::Unknown
    }

    pub fn set_default(&mut self, raw: &str) {
        self.default = raw.replace('\'', "''");
    }

    pub fn set_comment(&mut self, raw: &str) {
        self.comment = raw.trim().to_string();
    }

    /// Size declared in the type, e.g. 255 for `Varchar(255)`
    pub fn size(&self) -> Option<u32> {
        TYPE_SIZE_RE
            .captures(&self.data_type)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    pub fn is_primary_key(&self) -> bool {
        self.constraints.iter().any(|c| c == PK_CONSTRAINT)
    }

    pub fn is_numeric(&self) -> bool {
        self.family == TypeFamily::Numeric
    }

    pub fn is_text(&self) -> bool {
        self.family == TypeFamily::Text
    }

    pub fn is_timestamp(&self) -> bool {
        self.family == TypeFamily::Timestamp
    }
}

/// Foreign key constraint: `child` references `master`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub kind: RelationKind,
    /// Edge label, or the master table's name when the edge has none
    pub name: String,
    /// Referencing field (the FK column)
    pub child: FieldRef,
    /// Referenced field
    pub master: FieldRef,
}

/// Table definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table ID within the schema
    pub id: TableId,
    /// Identifier of the diagram node the table was read from
    pub node_id: String,
    pub name: String,
    /// Plural override used by scaffold commands
    pub plural: Option<String>,
    pub comment: String,
    /// Field definitions in declaration order
    pub fields: Vec<Field>,
    /// Names of the primary key fields, in declaration order
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    /// Free SQL emitted before the CREATE TABLE statement
    pub pre_script: String,
    /// Free SQL emitted after the table and its comments
    pub post_script: String,
}

impl Table {
    /// Create an empty table, normalizing its name
    pub fn new(id: TableId, node_id: impl Into<String>, raw_name: &str) -> Self {
        Self {
            id,
            node_id: node_id.into(),
            name: normalize_table_name(raw_name),
            plural: None,
            comment: String::new(),
            fields: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            pre_script: String::new(),
            post_script: String::new(),
        }
    }

    /// Append a field, taking ownership of it
    pub fn add_field(&mut self, mut field: Field) -> FieldId {
        let id = FieldId(self.fields.len() as u32);
        field.table = self.id;
        if field.is_primary_key() && !self.primary_key.contains(&field.name) {
            self.primary_key.push(field.name.clone());
        }
        self.fields.push(field);
        id
    }

    /// Get a field by name (first declared wins)
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.0 as usize)
    }

    pub fn has_foreign_keys(&self) -> bool {
        !self.foreign_keys.is_empty()
    }
}

/// Complete schema read from one diagram
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Tables indexed by TableId, in diagram order
    pub tables: Vec<Table>,
    /// Map from table name to the first table declared with it
    by_name: AHashMap<String, TableId>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, returning its ID
    pub fn add_table(&mut self, mut table: Table) -> TableId {
        let id = TableId(self.tables.len() as u32);
        table.id = id;
        for field in &mut table.fields {
            field.table = id;
        }
        self.by_name.entry(table.name.clone()).or_insert(id);
        self.tables.push(table);
        id
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0 as usize)
    }

    pub fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(id.0 as usize)
    }

    /// Get a table by name (first declared wins)
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.by_name.get(name).and_then(|&id| self.table(id))
    }

    pub fn field(&self, field: FieldRef) -> Option<&Field> {
        self.table(field.table).and_then(|t| t.field(field.field))
    }

    /// Find a field by the identifier of its diagram node
    pub fn find_field_by_node(&self, node_id: &str) -> Option<FieldRef> {
        if node_id.is_empty() {
            return None;
        }
        self.tables.iter().find_map(|table| {
            table
                .fields
                .iter()
                .position(|f| f.node_id == node_id)
                .map(|idx| FieldRef::new(table.id, FieldId(idx as u32)))
        })
    }

    /// `table.field` display name of a field reference
    pub fn qualified_name(&self, field: FieldRef) -> String {
        match (self.table(field.table), self.field(field)) {
            (Some(table), Some(f)) => format!("{}.{}", table.name, f.name),
            _ => format!("{}:{}", field.table, field.field),
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Tables in dependency order: masters before the tables referencing them.
    ///
    /// Tables caught in a reference cycle are placed on a best-effort basis
    /// and reported as a `dependency-cycle` warning.
    pub fn ordered(&self, diagnostics: &mut Diagnostics) -> Vec<&Table> {
        let result = SchemaGraph::from_schema(self).topo_sort();
        result.report_cycles(self, diagnostics);
        result
            .order
            .iter()
            .filter_map(|&id| self.table(id))
            .collect()
    }
}

/// Run extraction and relationship resolution over a decoded diagram
pub fn build_schema(document: &GraphDocument, diagnostics: &mut Diagnostics) -> Schema {
    let schema = extract_tables(document, diagnostics);
    resolve_relations(schema, document, diagnostics)
}
