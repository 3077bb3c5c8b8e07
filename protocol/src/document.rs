//! In-memory XML document model
//!
//! The protocol only needs a small slice of XML: named elements with ordered
//! children and attributes, and text. This module parses inbound bytes into
//! that tree with `quick-xml`, offers the lookups the validator needs, and
//! writes documents back out in a single canonical form so responses are
//! byte-for-byte reproducible.
//!
//! Parsing follows the usual DOM loader conventions:
//! - comments, processing instructions, the XML declaration and DOCTYPE are skipped
//! - entity and character references are unescaped, CDATA is plain text
//! - adjacent text pieces merge into one text node
//! - whitespace-only text between sibling elements (or at the top level) is dropped

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt;
use std::str::Utf8Error;
use thiserror::Error;

/// Reasons inbound bytes are rejected as XML
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] Utf8Error),

    #[error("invalid XML character {ch:?} at byte {offset}")]
    InvalidCharacter { offset: usize, ch: char },

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("closing tag </{found}> does not match open element <{expected}>")]
    MismatchedClose { expected: String, found: String },

    #[error("closing tag </{0}> has no open element")]
    UnexpectedClose(String),

    #[error("document contains no element")]
    NoRootElement,
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Element name, or `None` for text nodes
    pub fn name(&self) -> Option<&str> {
        self.as_element().map(Element::name)
    }

    fn is_blank(&self) -> bool {
        match self {
            Node::Text(text) => text.chars().all(is_xml_whitespace),
            Node::Element(_) => false,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A named element with attributes and ordered children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attribute`]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Appends a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Appends an element child
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Sets an attribute, replacing the value in place if the key already exists
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        find_element(&self.children, name, None)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        elements_named(&self.children, name)
    }

    /// First child element named `name` whose attribute `key` equals `value`
    pub fn find_child_with_attribute(&self, name: &str, key: &str, value: &str) -> Option<&Element> {
        find_element(&self.children, name, Some((key, value)))
    }

    /// Payload of the first text child.
    ///
    /// `None` means there is no text child at all, which is different from a
    /// text child holding the empty string.
    pub fn text(&self) -> Option<&str> {
        self.children.iter().find_map(Node::as_text)
    }

    fn drop_ignorable_whitespace(&mut self) {
        if self.children.iter().any(|child| child.as_element().is_some()) {
            self.children.retain(|child| !child.is_blank());
        }
    }
}

/// A parsed or constructed XML document.
///
/// The document node may hold several top-level nodes; a well-formed
/// protocol message has exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: Element) -> Self {
        Self {
            nodes: vec![Node::Element(root)],
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// First top-level element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        find_element(&self.nodes, name, None)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        elements_named(&self.nodes, name)
    }

    pub fn find_child_with_attribute(&self, name: &str, key: &str, value: &str) -> Option<&Element> {
        find_element(&self.nodes, name, Some((key, value)))
    }

    /// Canonical serialization as a string
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(&mut out, node);
        }
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string())
    }
}

fn find_element<'a>(
    nodes: &'a [Node],
    name: &str,
    attribute: Option<(&str, &str)>,
) -> Option<&'a Element> {
    nodes.iter().filter_map(Node::as_element).find(|element| {
        element.name == name
            && attribute.map_or(true, |(key, value)| element.attribute(key) == Some(value))
    })
}

fn elements_named<'a>(nodes: &'a [Node], name: &'a str) -> impl Iterator<Item = &'a Element> {
    nodes
        .iter()
        .filter_map(Node::as_element)
        .filter(move |element| element.name == name)
}

/// Parses raw bytes into a [`Document`]
pub fn parse(bytes: &[u8]) -> Result<Document, ParseError> {
    let source = std::str::from_utf8(bytes)?;
    check_chars(source, 0)?;

    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = true;

    let mut tree = TreeBuilder::default();
    loop {
        // character references can decode to anything, so decoded content is checked again
        let offset = usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX);
        match reader.read_event()? {
            Event::Start(start) => tree.open(element_from(&start, offset)?),
            Event::Empty(start) => tree.attach(Node::Element(element_from(&start, offset)?)),
            Event::End(end) => tree.close(std::str::from_utf8(end.name().as_ref())?)?,
            Event::Text(text) => {
                let text = text.unescape()?;
                check_chars(&text, offset)?;
                tree.text(&text);
            }
            Event::CData(data) => tree.text(std::str::from_utf8(&data)?),
            Event::Eof => break,
            // comments, declarations, processing instructions
            _ => {}
        }
    }

    tree.finish()
}

/// Canonical byte form of a document
pub fn serialize(document: &Document) -> Vec<u8> {
    document.to_xml_string().into_bytes()
}

fn element_from(start: &BytesStart<'_>, offset: usize) -> Result<Element, ParseError> {
    let mut element = Element::new(std::str::from_utf8(start.name().as_ref())?);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())?.to_owned();
        let value = attribute.unescape_value()?.into_owned();
        check_chars(&value, offset)?;
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Assembles the tree from the reader's flat event stream
#[derive(Default)]
struct TreeBuilder {
    open: Vec<Element>,
    top: Vec<Node>,
}

impl TreeBuilder {
    fn open(&mut self, element: Element) {
        self.open.push(element);
    }

    fn close(&mut self, name: &str) -> Result<(), ParseError> {
        let mut element = self
            .open
            .pop()
            .ok_or_else(|| ParseError::UnexpectedClose(name.to_owned()))?;

        if element.name != name {
            return Err(ParseError::MismatchedClose {
                expected: element.name,
                found: name.to_owned(),
            });
        }

        element.drop_ignorable_whitespace();
        self.attach(Node::Element(element));
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let siblings = self.siblings();
        if let Some(Node::Text(existing)) = siblings.last_mut() {
            existing.push_str(text);
            return;
        }
        siblings.push(Node::Text(text.to_owned()));
    }

    fn attach(&mut self, node: Node) {
        self.siblings().push(node);
    }

    fn siblings(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.top,
        }
    }

    fn finish(self) -> Result<Document, ParseError> {
        if let Some(unclosed) = self.open.into_iter().last() {
            return Err(ParseError::Unclosed(unclosed.name));
        }

        let mut nodes = self.top;
        nodes.retain(|node| !node.is_blank());
        if !nodes.iter().any(|node| node.as_element().is_some()) {
            return Err(ParseError::NoRootElement);
        }

        Ok(Document { nodes })
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => out.push_str(&partial_escape(text.as_str())),
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for (key, value) in &element.attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape(value.as_str()));
                out.push('"');
            }

            if element.children.is_empty() {
                out.push_str("/>");
                return;
            }

            out.push('>');
            for child in &element.children {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
    }
}

/// Rejects the first character outside `Char`, reported relative to `base`
fn check_chars(text: &str, base: usize) -> Result<(), ParseError> {
    match text.char_indices().find(|&(_, c)| !is_xml_char(c)) {
        Some((offset, ch)) => Err(ParseError::InvalidCharacter {
            offset: base.saturating_add(offset),
            ch,
        }),
        None => Ok(()),
    }
}

/// The XML 1.0 `Char` production; surrogates cannot occur in a `char`
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = "<Request><Command>GetPlayerInfo</Command><Data><Row Type=\"CardNumber\">123456789</Row><Row Type=\"PIN\">1234</Row></Data></Request>";

    #[test]
    fn test_parse_request_shape() {
        let document = parse(REQUEST.as_bytes()).unwrap();
        assert_eq!(document.nodes().len(), 1);

        let request = document.child("Request").unwrap();
        assert_eq!(request.children().len(), 2);
        assert_eq!(request.child("Command").unwrap().text(), Some("GetPlayerInfo"));

        let data = request.child("Data").unwrap();
        let pin = data.find_child_with_attribute("Row", "Type", "PIN").unwrap();
        assert_eq!(pin.text(), Some("1234"));
        assert_eq!(data.children_named("Row").count(), 2);
    }

    #[test]
    fn test_serialize_is_canonical() {
        let document = parse(REQUEST.as_bytes()).unwrap();
        assert_eq!(document.to_xml_string(), REQUEST);
        assert_eq!(serialize(&document), REQUEST.as_bytes());
    }

    #[test]
    fn test_reserialize_is_stable() {
        let document = Document::with_root(
            Element::new("Response")
                .with_child(Element::new("Command").with_text("Unknown"))
                .with_child(Element::new("Data").with_child(
                    Element::new("Row")
                        .with_attribute("Type", "ErrorMessage")
                        .with_text("a < b & \"c\""),
                )),
        );

        let first = serialize(&document);
        let reparsed = parse(&first).unwrap();
        assert_eq!(reparsed, document);
        assert_eq!(serialize(&reparsed), first);
    }

    #[test]
    fn test_empty_element_written_self_closing() {
        let document = Document::with_root(Element::new("Data"));
        assert_eq!(document.to_xml_string(), "<Data/>");
    }

    #[test]
    fn test_attribute_values_escaped() {
        let element = Element::new("Row").with_attribute("Type", "a\"b<c");
        let document = Document::with_root(element);
        assert_eq!(document.to_xml_string(), "<Row Type=\"a&quot;b&lt;c\"/>");
    }

    #[test]
    fn test_set_attribute_replaces_existing() {
        let mut element = Element::new("Row").with_attribute("Type", "PIN");
        element.set_attribute("Type", "CardNumber");
        assert_eq!(element.attributes().count(), 1);
        assert_eq!(element.attribute("Type"), Some("CardNumber"));
    }

    #[test]
    fn test_whitespace_between_elements_dropped() {
        let pretty = "<?xml version=\"1.0\"?>\n<Request>\n  <Command>GetPlayerInfo</Command>\n  <!-- note -->\n  <Data/>\n</Request>\n";
        let document = parse(pretty.as_bytes()).unwrap();
        assert_eq!(document.nodes().len(), 1);
        let request = document.child("Request").unwrap();
        assert_eq!(request.children().len(), 2);
        assert!(request.children().iter().all(|child| !child.is_text()));
    }

    #[test]
    fn test_whitespace_only_content_kept() {
        let document = parse(b"<Command> </Command>").unwrap();
        let command = document.child("Command").unwrap();
        assert_eq!(command.text(), Some(" "));
    }

    #[test]
    fn test_absent_text_distinct_from_empty_text() {
        let parsed = parse(b"<Command></Command>").unwrap();
        assert_eq!(parsed.child("Command").unwrap().text(), None);
        assert!(parsed.child("Command").unwrap().first_child().is_none());

        let built = Element::new("Command").with_text("");
        assert_eq!(built.text(), Some(""));
        assert!(built.first_child().is_some());

        assert!(Document::new().is_empty());
        assert!(Document::new().first_child().is_none());
    }

    #[test]
    fn test_entities_and_cdata_become_text() {
        let document = parse(b"<Command>Get&amp;<![CDATA[<Player>]]>Info</Command>").unwrap();
        let command = document.child("Command").unwrap();
        assert_eq!(command.children().len(), 1);
        assert_eq!(command.text(), Some("Get&<Player>Info"));
    }

    #[test]
    fn test_multiple_top_level_nodes_kept() {
        let document = parse(b"<Request/><Extra/>").unwrap();
        assert_eq!(document.nodes().len(), 2);
        assert_eq!(document.nodes()[1].name(), Some("Extra"));
    }

    #[test]
    fn test_find_child_with_attribute_returns_first_match() {
        let data = Element::new("Data")
            .with_child(Element::new("Row").with_attribute("Type", "PIN").with_text("1"))
            .with_child(Element::new("Row").with_attribute("Type", "PIN").with_text("2"));

        let row = data.find_child_with_attribute("Row", "Type", "PIN").unwrap();
        assert_eq!(row.text(), Some("1"));
        assert!(data.find_child_with_attribute("Row", "Type", "CardNumber").is_none());
        assert!(data.find_child_with_attribute("Cell", "Type", "PIN").is_none());
    }

    #[test]
    fn test_unclosed_tag_rejected() {
        assert!(parse(b"<Request><Command>GetPlayerInfo</Command>").is_err());
        assert!(parse(b"<Request><Data>").is_err());
    }

    #[test]
    fn test_mismatched_close_rejected() {
        assert!(parse(b"<Request><Command>x</Data></Request>").is_err());
    }

    #[test]
    fn test_stray_close_rejected() {
        assert!(parse(b"<Request/></Request>").is_err());
    }

    #[test]
    fn test_invalid_characters_rejected() {
        assert!(matches!(
            parse(b"<Request>\x01</Request>"),
            Err(ParseError::InvalidCharacter { ch: '\u{1}', .. })
        ));
        assert!(matches!(
            parse(&[b'<', b'a', b'>', 0xff, b'<', b'/', b'a', b'>']),
            Err(ParseError::Encoding(_))
        ));
    }

    #[test]
    fn test_character_references_must_decode_to_xml_chars() {
        assert!(matches!(
            parse(b"<a>&#1;</a>"),
            Err(ParseError::InvalidCharacter { ch: '\u{1}', .. })
        ));
        assert!(matches!(
            parse(b"<a>&#x1F;</a>"),
            Err(ParseError::InvalidCharacter { ch: '\u{1f}', .. })
        ));
        assert!(matches!(
            parse(b"<Row Type=\"&#2;\">1</Row>"),
            Err(ParseError::InvalidCharacter { ch: '\u{2}', .. })
        ));

        let document = parse(b"<a>&#9;&#x41;</a>").unwrap();
        assert_eq!(document.to_xml_string(), "<a>\tA</a>");
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        assert!(parse(b"<Row Type=\"PIN\" Type=\"CardNumber\">1</Row>").is_err());
    }

    #[test]
    fn test_text_only_input_rejected() {
        assert!(matches!(parse(b""), Err(ParseError::NoRootElement)));
        assert!(matches!(parse(b"hello"), Err(ParseError::NoRootElement)));
    }

    #[test]
    fn test_unterminated_start_tag_rejected() {
        assert!(parse(b"<Request").is_err());
    }
}
