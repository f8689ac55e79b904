//! Graph document: the flat list of `mxCell` nodes of a diagram.

use super::xml::Element;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Yes/true/sì flag values, case-insensitive
static TRUTHY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(y(es)?|t(rue)?|s[iì]?)$").unwrap());

/// Element names draw.io uses to attach custom properties to a cell
const CONTAINER_ELEMENTS: [&str; 2] = ["object", "UserObject"];

/// Check a custom attribute value against the yes/true/sì pattern
pub fn is_truthy(value: &str) -> bool {
    TRUTHY_RE.is_match(value.trim())
}

/// Immutable attribute bag of a diagram element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAttributes {
    entries: Vec<(String, String)>,
}

impl NodeAttributes {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of `key`, or an empty string when absent
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Whether `key` holds a truthy value (see [`is_truthy`])
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).map(is_truthy).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&Element> for NodeAttributes {
    fn from(element: &Element) -> Self {
        Self::new(element.attributes.clone())
    }
}

/// One `mxCell` of the diagram, with its optional `<object>` container.
///
/// When a container is present its id, label and attributes are
/// authoritative; structural attributes (`parent`, `edge`, `source`,
/// `target`, `style`) always come from the cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    cell: NodeAttributes,
    container: Option<NodeAttributes>,
}

impl GraphNode {
    pub fn new(cell: NodeAttributes, container: Option<NodeAttributes>) -> Self {
        Self { cell, container }
    }

    pub fn id(&self) -> Option<&str> {
        match &self.container {
            Some(container) => container.get("id").or_else(|| self.cell.get("id")),
            None => self.cell.get("id"),
        }
    }

    pub fn parent(&self) -> Option<&str> {
        self.cell.get("parent")
    }

    pub fn is_edge(&self) -> bool {
        self.cell.get("edge") == Some("1")
    }

    pub fn is_vertex(&self) -> bool {
        self.cell.get("vertex") == Some("1")
    }

    pub fn source(&self) -> Option<&str> {
        self.cell.get("source")
    }

    pub fn target(&self) -> Option<&str> {
        self.cell.get("target")
    }

    pub fn style(&self) -> Option<&str> {
        self.cell.get("style")
    }

    /// Display text: the container's `label`, else the cell's `value`
    pub fn label(&self) -> &str {
        match &self.container {
            Some(container) => container.get_or_empty("label"),
            None => self.cell.get_or_empty("value"),
        }
    }

    /// Authoritative custom attributes
    pub fn attributes(&self) -> &NodeAttributes {
        self.container.as_ref().unwrap_or(&self.cell)
    }

    pub fn is_wrapped(&self) -> bool {
        self.container.is_some()
    }
}

/// Decoded diagram, nodes in document order
#[derive(Debug, Clone, Default)]
pub struct GraphDocument {
    nodes: Vec<GraphNode>,
    by_id: AHashMap<String, usize>,
    children: AHashMap<String, Vec<usize>>,
    edges_by_source: AHashMap<String, Vec<usize>>,
}

impl GraphDocument {
    /// Build the document from an `mxGraphModel` element
    pub fn from_model(model: &Element) -> Self {
        let mut nodes = Vec::new();
        collect_cells(model, None, &mut nodes);
        Self::from_nodes(nodes)
    }

    pub fn from_nodes(nodes: Vec<GraphNode>) -> Self {
        let mut by_id = AHashMap::new();
        let mut children: AHashMap<String, Vec<usize>> = AHashMap::new();
        let mut edges_by_source: AHashMap<String, Vec<usize>> = AHashMap::new();

        for (idx, node) in nodes.iter().enumerate() {
            if let Some(id) = node.id() {
                by_id.entry(id.to_string()).or_insert(idx);
            }
            if let Some(parent) = node.parent() {
                children.entry(parent.to_string()).or_default().push(idx);
            }
            if node.is_edge() {
                if let Some(source) = node.source() {
                    edges_by_source
                        .entry(source.to_string())
                        .or_default()
                        .push(idx);
                }
            }
        }

        Self {
            nodes,
            by_id,
            children,
            edges_by_source,
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by identifier (first declared wins)
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.by_id.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Nodes whose `parent` is `parent_id`, in document order
    pub fn children_of<'a>(&'a self, parent_id: &str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.children
            .get(parent_id)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.nodes[idx])
    }

    /// Edge nodes whose `source` is `source_id`, in document order
    pub fn edges_from<'a>(&'a self, source_id: &str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.edges_by_source
            .get(source_id)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.nodes[idx])
    }

    /// Identifiers of the layers: cells whose parent is a root cell
    pub fn layer_ids(&self) -> Vec<&str> {
        let roots: Vec<&str> = self
            .nodes
            .iter()
            .filter(|n| n.parent().is_none())
            .filter_map(|n| n.id())
            .collect();

        self.nodes
            .iter()
            .filter(|n| !n.is_edge())
            .filter(|n| n.parent().is_some_and(|p| roots.contains(&p)))
            .filter_map(|n| n.id())
            .collect()
    }

    /// Top-level shapes: non-edge nodes placed directly on a layer
    pub fn top_level_nodes(&self) -> Vec<&GraphNode> {
        let layers = self.layer_ids();
        self.nodes
            .iter()
            .filter(|n| !n.is_edge())
            .filter(|n| n.parent().is_some_and(|p| layers.contains(&p)))
            .collect()
    }
}

fn collect_cells(element: &Element, parent: Option<&Element>, out: &mut Vec<GraphNode>) {
    if element.name == "mxCell" {
        let container = parent
            .filter(|p| CONTAINER_ELEMENTS.contains(&p.name.as_str()))
            .map(NodeAttributes::from);
        out.push(GraphNode::new(NodeAttributes::from(element), container));
    }

    for child in &element.children {
        collect_cells(child, Some(element), out);
    }
}
