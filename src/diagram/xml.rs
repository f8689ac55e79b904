//! Minimal owned element tree built from quick-xml events.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Name of the synthetic element that holds the top-level elements
pub const DOCUMENT_NAME: &str = "#document";

/// An XML element with its attributes, children and concatenated text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get an attribute value by name
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First element named `name` in document order, including `self`
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Text of this element and all its descendants, in document order
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }
}

struct TreeBuilder {
    document: Element,
    stack: Vec<Element>,
}

impl TreeBuilder {
    fn attach(&mut self, element: Element) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => self.document.children.push(element),
        }
    }

    fn close(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.attach(element);
        }
    }

    fn append_text(&mut self, text: &str) {
        if let Some(current) = self.stack.last_mut() {
            current.text.push_str(text);
        }
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, quick_xml::Error> {
    let mut element = Element::named(String::from_utf8_lossy(start.local_name().as_ref()));

    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

/// Parse a document into a tree rooted at a synthetic `#document` element.
///
/// Unclosed elements at end of input are closed implicitly.
pub fn parse(text: &str) -> Result<Element, quick_xml::Error> {
    let mut reader = Reader::from_str(text.trim_start_matches('\u{feff}'));
    reader.config_mut().trim_text(true);

    let mut builder = TreeBuilder {
        document: Element::named(DOCUMENT_NAME),
        stack: Vec::new(),
    };

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let element = element_from(&start)?;
                builder.stack.push(element);
            }
            Event::Empty(start) => {
                let element = element_from(&start)?;
                builder.attach(element);
            }
            Event::End(_) => builder.close(),
            Event::Text(text) => builder.append_text(&text.unescape()?),
            Event::CData(data) => builder.append_text(&String::from_utf8_lossy(&data)),
            Event::Eof => break,
            _ => {}
        }
    }

    while !builder.stack.is_empty() {
        builder.close();
    }

    Ok(builder.document)
}
