//! Entity extraction: diagram shapes to tables and fields.
//!
//! Top-level shapes become tables, their child shapes become fields
//! (`name[:type]` labels), and `PK` markers nested inside a field shape
//! flag it as part of the primary key.

use super::{normalize_table_name, Field, Schema, Table, TableId, PK_CONSTRAINT};
use crate::diagnostics::{Diagnostics, Location};
use crate::diagram::{GraphDocument, GraphNode};

/// Build the tables of a diagram, in document order.
///
/// Shapes with an empty name are skipped. Duplicate table or field names are
/// reported and kept.
pub fn extract_tables(document: &GraphDocument, diagnostics: &mut Diagnostics) -> Schema {
    let mut schema = Schema::new();

    for node in document.top_level_nodes() {
        let id = TableId(schema.len() as u32);
        let Some(table) = table_from_node(document, node, id, diagnostics) else {
            continue;
        };

        if schema.get_table(&table.name).is_some() {
            diagnostics.warning(
                "duplicate-table",
                format!("table {} already declared", table.name),
                Location::new()
                    .with_table(&table.name)
                    .with_node(&table.node_id),
            );
        }

        schema.add_table(table);
    }

    schema
}

fn table_from_node(
    document: &GraphDocument,
    node: &GraphNode,
    id: TableId,
    diagnostics: &mut Diagnostics,
) -> Option<Table> {
    let name = normalize_table_name(node.label());
    if name.is_empty() {
        return None;
    }

    let node_id = node.id().unwrap_or_default();
    let attrs = node.attributes();

    let mut table = Table::new(id, node_id, &name);
    table.comment = attrs.get_or_empty("comment").trim().to_string();
    table.plural = attrs
        .get("plural")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    table.pre_script = attrs.get_or_empty("preScript").to_string();
    table.post_script = attrs.get_or_empty("postScript").to_string();

    if node_id.is_empty() {
        return Some(table);
    }

    for candidate in document.children_of(node_id).filter(|n| !n.is_edge()) {
        let Some(field) = field_from_node(document, candidate, &table, diagnostics) else {
            continue;
        };

        if table.get_field(&field.name).is_some() {
            diagnostics.warning(
                "duplicate-field",
                format!("field {}.{} already declared", table.name, field.name),
                Location::new()
                    .with_table(&table.name)
                    .with_field(&field.name)
                    .with_node(&field.node_id),
            );
        }

        table.add_field(field);
    }

    Some(table)
}

/// Split a field label on the first colon into name and type
pub fn split_field_label(label: &str) -> (&str, &str) {
    label.split_once(':').unwrap_or((label, ""))
}

fn field_from_node(
    document: &GraphDocument,
    node: &GraphNode,
    table: &Table,
    diagnostics: &mut Diagnostics,
) -> Option<Field> {
    let (raw_name, raw_type) = split_field_label(node.label());
    let node_id = node.id().unwrap_or_default();

    let mut field = Field::new(node_id, table.id, raw_name);
    if field.name.is_empty() {
        return None;
    }

    let attrs = node.attributes();
    field.set_comment(attrs.get_or_empty("comment"));
    field.set_default(attrs.get_or_empty("default"));
    field.not_null = attrs.flag("notNull");
    field.unique = attrs.flag("unique");
    field.set_data_type(raw_type);

    if !field.has_valid_type() {
        diagnostics.warning(
            "unresolved-type",
            format!(
                "unrecognized field type {} for field {}.{}",
                field.data_type(),
                table.name,
                field.name
            ),
            Location::new()
                .with_table(&table.name)
                .with_field(&field.name)
                .with_node(node_id),
        );
    }

    if !node_id.is_empty() && has_primary_key_marker(document, node_id) {
        field.constraints.push(PK_CONSTRAINT.to_string());
    }

    Some(field)
}

/// Only primary keys are recognized; other constraint labels are ignored
fn has_primary_key_marker(document: &GraphDocument, field_node_id: &str) -> bool {
    document
        .children_of(field_node_id)
        .any(|marker| marker.label().trim().eq_ignore_ascii_case(PK_CONSTRAINT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_field_label() {
        assert_eq!(split_field_label("id: Integer"), ("id", " Integer"));
        assert_eq!(split_field_label("name"), ("name", ""));
        assert_eq!(split_field_label("at:time:zone"), ("at", "time:zone"));
    }
}
