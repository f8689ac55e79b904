//! Relationship resolution: diagram edges to foreign key constraints.
//!
//! An edge connects two field shapes. As drawn, the source is the referenced
//! (master) field and the target the referencing (child) field. Edges drawn
//! from the "many" end are reversed automatically, and a container may ask
//! for reversal explicitly with a `reverseRelation` flag.

use super::{normalize_table_name, FieldId, FieldRef, ForeignKey, RelationKind, Schema};
use crate::diagnostics::{Diagnostics, Location};
use crate::diagram::{GraphDocument, GraphNode};

/// Start arrows that mean the edge was drawn from the referencing side
pub const MANY_ARROWS: [&str; 3] = ["ERmany", "ERoneToMany", "ERzeroToMany"];

/// Flag on an edge's container requesting a reversed relation
pub const REVERSE_RELATION_FLAG: &str = "reverseRelation";

/// Arrowheads declared in an edge style
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeArrows {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl EdgeArrows {
    /// Read `startArrow`/`endArrow` from a `key=value;key=value` style string
    pub fn from_style(style: &str) -> Self {
        let mut arrows = Self::default();

        for token in style.split(';') {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            match key.trim() {
                "startArrow" => arrows.start = Some(value.trim().to_string()),
                "endArrow" => arrows.end = Some(value.trim().to_string()),
                _ => {}
            }
        }

        arrows
    }

    fn starts_with_many(&self) -> bool {
        self.start
            .as_deref()
            .is_some_and(|arrow| MANY_ARROWS.contains(&arrow))
    }

    fn swap(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }
}

/// Attach foreign keys for every edge leaving a field.
///
/// Consumes the extracted schema and returns it with constraints attached to
/// the referencing tables. Edges whose target is not a known field are
/// reported and skipped.
pub fn resolve_relations(
    mut schema: Schema,
    document: &GraphDocument,
    diagnostics: &mut Diagnostics,
) -> Schema {
    let mut resolved = Vec::new();

    for table in schema.iter() {
        for (idx, field) in table.fields.iter().enumerate() {
            if field.node_id.is_empty() {
                continue;
            }
            let source = FieldRef::new(table.id, FieldId(idx as u32));
            for edge in document.edges_from(&field.node_id) {
                if let Some(fk) = resolve_edge(&schema, source, edge, diagnostics) {
                    resolved.push(fk);
                }
            }
        }
    }

    for fk in resolved {
        if let Some(table) = schema.table_mut(fk.child.table) {
            table.foreign_keys.push(fk);
        }
    }

    schema
}

fn resolve_edge(
    schema: &Schema,
    source: FieldRef,
    edge: &GraphNode,
    diagnostics: &mut Diagnostics,
) -> Option<ForeignKey> {
    let edge_id = edge.id().unwrap_or_default();
    let target_id = edge.target().unwrap_or_default();

    if target_id.is_empty() {
        diagnostics.error(
            "unresolved-relation-target",
            format!(
                "relation from {} has no target field",
                schema.qualified_name(source)
            ),
            edge_location(schema, source, edge_id),
        );
        return None;
    }

    let Some(target) = schema.find_field_by_node(target_id) else {
        diagnostics.error(
            "unresolved-relation-target",
            format!(
                "relation from {} points to unknown field '{}'",
                schema.qualified_name(source),
                target_id
            ),
            edge_location(schema, source, edge_id),
        );
        return None;
    };

    let mut arrows = EdgeArrows::from_style(edge.style().unwrap_or_default());
    let (mut master, mut child) = (source, target);

    if arrows.starts_with_many() {
        std::mem::swap(&mut master, &mut child);
        arrows.swap();
        diagnostics.warning(
            "relation-auto-reversed",
            format!(
                "relation {} -> {} starts from the many side, reversed to {} -> {}",
                schema.qualified_name(source),
                schema.qualified_name(target),
                schema.qualified_name(master),
                schema.qualified_name(child)
            ),
            edge_location(schema, source, edge_id),
        );
    } else if edge.attributes().flag(REVERSE_RELATION_FLAG) {
        std::mem::swap(&mut master, &mut child);
        arrows.swap();
        diagnostics.info(
            "relation-reversed",
            format!(
                "relation {} -> {} reversed by {}",
                schema.qualified_name(source),
                schema.qualified_name(target),
                REVERSE_RELATION_FLAG
            ),
            edge_location(schema, source, edge_id),
        );
    }

    if master.table == child.table {
        diagnostics.warning(
            "self-reference",
            format!(
                "relation {} -> {} stays within one table, ignored",
                schema.qualified_name(master),
                schema.qualified_name(child)
            ),
            edge_location(schema, source, edge_id),
        );
        return None;
    }

    let start = arrows.start.or(arrows.end);
    let kind = RelationKind::from_arrow(start.as_deref());

    let label = normalize_table_name(edge.label());
    let name = if label.is_empty() {
        schema.table(master.table)?.name.clone()
    } else {
        label
    };

    Some(ForeignKey {
        kind,
        name,
        child,
        master,
    })
}

fn edge_location(schema: &Schema, source: FieldRef, edge_id: &str) -> Location {
    let mut location = Location::new().with_node(edge_id);
    if let Some(table) = schema.table(source.table) {
        location = location.with_table(&table.name);
    }
    if let Some(field) = schema.field(source) {
        location = location.with_field(&field.name);
    }
    location
}
