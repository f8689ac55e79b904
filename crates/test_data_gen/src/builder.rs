//! Cell-level builder for draw.io ER diagrams.

use crate::encode::{escape_attr, Format};
use std::fmt::Write;

/// Edge drawn from the referenced field to the referencing one
pub const ONE_TO_MANY_STYLE: &str =
    "edgeStyle=entityRelationEdgeStyle;startArrow=ERmandOne;endArrow=ERmany;html=1;";

/// Edge drawn from the referencing field, which the reader reverses
pub const MANY_TO_ONE_STYLE: &str =
    "edgeStyle=entityRelationEdgeStyle;startArrow=ERmany;endArrow=ERmandOne;html=1;";

/// Identifier of a cell created by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellId(usize);

impl CellId {
    pub fn cell_id(&self) -> String {
        format!("c{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Cell {
    id: String,
    parent: String,
    value: String,
    style: String,
    edge: Option<(String, String)>,
    attrs: Vec<(String, String)>,
}

/// Builds an `mxGraphModel` document
#[derive(Debug, Clone)]
pub struct DiagramBuilder {
    cells: Vec<Cell>,
    layer: String,
    next_id: usize,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramBuilder {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            layer: "1".to_string(),
            next_id: 0,
        }
    }

    fn push(&mut self, parent: String, value: &str, style: &str, attrs: &[(&str, &str)]) -> CellId {
        let id = CellId(self.next_id);
        self.next_id += 1;
        self.cells.push(Cell {
            id: id.cell_id(),
            parent,
            value: value.to_string(),
            style: style.to_string(),
            edge: None,
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        id
    }

    /// Add a table shape on the default layer
    pub fn table(&mut self, name: &str) -> CellId {
        self.table_with(name, &[])
    }

    /// Add a table shape with custom attributes (comment, plural, ...)
    pub fn table_with(&mut self, name: &str, attrs: &[(&str, &str)]) -> CellId {
        let layer = self.layer.clone();
        self.push(layer, name, "shape=table;startSize=30;", attrs)
    }

    /// Add a field shape labelled `name[:type]` inside `table`
    pub fn field(&mut self, table: CellId, label: &str) -> CellId {
        self.field_with(table, label, &[])
    }

    pub fn field_with(&mut self, table: CellId, label: &str, attrs: &[(&str, &str)]) -> CellId {
        self.push(table.cell_id(), label, "shape=partialRectangle;", attrs)
    }

    /// Add a field carrying a `PK` marker
    pub fn pk_field(&mut self, table: CellId, label: &str) -> CellId {
        let field = self.field(table, label);
        self.marker(field, "PK");
        field
    }

    /// Add a constraint marker inside a field shape
    pub fn marker(&mut self, field: CellId, label: &str) -> CellId {
        self.push(field.cell_id(), label, "text;", &[])
    }

    /// Add a one-to-many relation drawn from `master` to `child`
    pub fn relation(&mut self, master: CellId, child: CellId) -> CellId {
        self.edge(master, child, ONE_TO_MANY_STYLE, "", &[])
    }

    /// Add an edge between two field shapes
    pub fn edge(
        &mut self,
        source: CellId,
        target: CellId,
        style: &str,
        label: &str,
        attrs: &[(&str, &str)],
    ) -> CellId {
        self.edge_to(source, &target.cell_id(), style, label, attrs)
    }

    /// Add an edge whose target is a raw cell id, possibly unknown
    pub fn edge_to(
        &mut self,
        source: CellId,
        target: &str,
        style: &str,
        label: &str,
        attrs: &[(&str, &str)],
    ) -> CellId {
        let layer = self.layer.clone();
        let id = self.push(layer, label, style, attrs);
        if let Some(cell) = self.cells.last_mut() {
            cell.edge = Some((source.cell_id(), target.to_string()));
        }
        id
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Render the plain `mxGraphModel` document
    pub fn to_model_xml(&self) -> String {
        let mut xml = String::from(
            "<mxGraphModel dx=\"1000\" dy=\"800\" grid=\"1\"><root>\n  <mxCell id=\"0\"/>\n",
        );
        let _ = writeln!(xml, "  <mxCell id=\"{}\" parent=\"0\"/>", self.layer);

        for cell in &self.cells {
            write_cell(&mut xml, cell);
        }

        xml.push_str("</root></mxGraphModel>");
        xml
    }

    /// Render in one of the supported file formats
    pub fn render(&self, format: Format) -> String {
        format.wrap(&self.to_model_xml())
    }
}

fn write_cell(xml: &mut String, cell: &Cell) {
    let kind = match &cell.edge {
        Some((source, target)) => format!(
            "edge=\"1\" source=\"{}\" target=\"{}\"",
            escape_attr(source),
            escape_attr(target)
        ),
        None => "vertex=\"1\"".to_string(),
    };

    if cell.attrs.is_empty() {
        let _ = writeln!(
            xml,
            "  <mxCell id=\"{}\" value=\"{}\" style=\"{}\" parent=\"{}\" {}/>",
            cell.id,
            escape_attr(&cell.value),
            escape_attr(&cell.style),
            escape_attr(&cell.parent),
            kind
        );
        return;
    }

    let _ = write!(
        xml,
        "  <object id=\"{}\" label=\"{}\"",
        cell.id,
        escape_attr(&cell.value)
    );
    for (key, value) in &cell.attrs {
        let _ = write!(xml, " {}=\"{}\"", key, escape_attr(value));
    }
    let _ = writeln!(
        xml,
        "><mxCell style=\"{}\" parent=\"{}\" {}/></object>",
        escape_attr(&cell.style),
        escape_attr(&cell.parent),
        kind
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_xml_structure() {
        let mut diagram = DiagramBuilder::new();
        let users = diagram.table_with("users", &[("comment", "People & co")]);
        let id = diagram.pk_field(users, "id:Integer");
        let orders = diagram.table("orders");
        let user_id = diagram.field(orders, "user_id:Integer");
        diagram.relation(id, user_id);

        let xml = diagram.to_model_xml();
        assert!(xml.contains(r#"<object id="c0" label="users" comment="People &amp; co">"#));
        assert!(xml.contains(r#"value="PK" style="text;" parent="c1""#));
        assert!(xml.contains(r#"edge="1" source="c1" target="c4""#));
        assert_eq!(diagram.len(), 6);
    }
}
