//! Owned XML tree for template parts and rich-text fragments
//!
//! Template parts (`content.xml`, `styles.xml`) and HTML fragments are both
//! parsed into the same [`Element`]/[`Node`] tree. Names are kept as written
//! (`text:p`, `office:automatic-styles`); namespace declarations are ordinary
//! attributes on the root and survive a round trip untouched.
//!
//! Comments, processing instructions and the document type declaration are
//! dropped on parse. The serializer always writes a UTF-8 XML declaration.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Name of the synthetic root wrapped around rich-text fragments
pub const FRAGMENT_ROOT: &str = "fragment";

/// Errors raised while reading or writing XML
#[derive(Error, Debug)]
pub enum XmlError {
    /// Tokenizer or well-formedness error reported by quick-xml
    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// Malformed attribute
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Input ended while an element was still open
    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    /// Closing tag without a matching opening tag
    #[error("Unexpected closing tag </{0}>")]
    UnexpectedEnd(String),

    /// More than one top-level element
    #[error("Unexpected second root element <{0}>")]
    MultipleRoots(String),

    /// Part is not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// No element at all
    #[error("Document has no root element")]
    NoRoot,

    /// Writer error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A child of an element: either a nested element or a run of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Unescaped character data
    Text(String),
}

impl Node {
    /// Create a text node
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Borrow the element, if this is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Borrow the text, if this is a text node
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    /// True for text nodes holding only whitespace
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An element with a qualified name, ordered attributes and ordered children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified name, e.g. `text:p`
    pub name: String,

    /// Attributes in document order
    pub attributes: Vec<(String, String)>,

    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child setter, appending to existing children
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Look up an attribute value
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// True if this element has the given name and attribute value
    pub fn is(&self, name: &str, attr: &str, value: &str) -> bool {
        self.name == name && self.attr(attr) == Some(value)
    }

    /// Append a child node
    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Iterate over direct child elements, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// All descendant elements in document order, excluding `self`
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }

    /// First element (including `self`) matching the predicate, depth-first
    pub fn find_mut<P>(&mut self, pred: &P) -> Option<&mut Element>
    where
        P: Fn(&Element) -> bool,
    {
        if pred(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Element(el) = child {
                if let Some(found) = el.find_mut(pred) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Visit `self` and every descendant element, parents before children
    ///
    /// Children are read after the parent has been visited, so nodes the
    /// callback inserts into `el.children` are visited as well.
    pub fn walk_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        f(self);
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.walk_mut(f);
            }
        }
    }

    /// Replace descendant elements by splicing in the nodes the callback returns
    ///
    /// The callback sees every descendant element depth-first. Returning
    /// `Some(nodes)` splices `nodes` in place of the element (an empty vector
    /// removes it) and the replacement is not visited again; returning `None`
    /// descends into the element's children. `self` is never replaced.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of elements replaced
    pub fn try_replace_elements<E, F>(&mut self, f: &mut F) -> Result<usize, E>
    where
        F: FnMut(&Element) -> Result<Option<Vec<Node>>, E>,
    {
        let mut replaced = 0;
        let mut index = 0;
        while index < self.children.len() {
            let replacement = match &self.children[index] {
                Node::Element(el) => f(el)?,
                Node::Text(_) => None,
            };
            match replacement {
                Some(nodes) => {
                    let len = nodes.len();
                    self.children.splice(index..=index, nodes);
                    index += len;
                    replaced += 1;
                }
                None => {
                    if let Node::Element(el) = &mut self.children[index] {
                        replaced += el.try_replace_elements(f)?;
                    }
                    index += 1;
                }
            }
        }
        Ok(replaced)
    }

    /// Infallible form of [`Element::try_replace_elements`]
    pub fn replace_elements<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&Element) -> Option<Vec<Node>>,
    {
        self.try_replace_elements(&mut |el: &Element| Ok::<_, std::convert::Infallible>(f(el)))
            .unwrap_or_else(|never| match never {})
    }

    /// Serialize this element (without an XML declaration)
    pub fn to_xml(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

/// A parsed template part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Root element, e.g. `office:document-content`
    pub root: Element,
}

impl Document {
    /// Parse a complete XML document
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        Ok(Self {
            root: parse_element(xml)?,
        })
    }

    /// Parse a raw part; invalid UTF-8 is an error, never replaced
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XmlError> {
        Self::parse(std::str::from_utf8(bytes)?)
    }

    /// Serialize with a UTF-8 XML declaration
    pub fn to_xml(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_element(&mut writer, &self.root)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

/// Parse markup that may hold several top-level nodes
///
/// The markup is wrapped in a synthetic [`FRAGMENT_ROOT`] element. Markup must
/// be well-formed; nothing is repaired.
pub fn parse_fragment(markup: &str) -> Result<Element, XmlError> {
    parse_element(&format!("<{FRAGMENT_ROOT}>{markup}</{FRAGMENT_ROOT}>"))
}

/// Parse XML into its root element
pub fn parse_element(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let el = element_from(&start)?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(end) => {
                let el = stack.pop().ok_or_else(|| {
                    XmlError::UnexpectedEnd(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                })?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let value = text.unescape_with(html_entity)?;
                    parent.children.push(Node::Text(value.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    parent.children.push(Node::Text(value));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    root.ok_or(XmlError::NoRoot)
}

/// The five XML entities plus the named ones rich-text editors commonly emit
///
/// Anything else is a parse error.
fn html_entity(name: &str) -> Option<&'static str> {
    match name {
        "nbsp" => Some("\u{a0}"),
        "shy" => Some("\u{ad}"),
        "copy" => Some("\u{a9}"),
        "reg" => Some("\u{ae}"),
        "trade" => Some("\u{2122}"),
        "hellip" => Some("\u{2026}"),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        "laquo" => Some("\u{ab}"),
        "raquo" => Some("\u{bb}"),
        "euro" => Some("\u{20ac}"),
        _ => quick_xml::escape::resolve_predefined_entity(name),
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value_with(html_entity)?.into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    el: Element,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(el)),
        None if root.is_none() => *root = Some(el),
        None => return Err(XmlError::MultipleRoots(el.name)),
    }
    Ok(())
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
        }
    }
}

fn collect_descendants<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
    for child in el.child_elements() {
        out.push(child);
        collect_descendants(child, out);
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_names_attributes_and_whitespace() {
        let doc = Document::parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:office" office:version="1.2"><text:p text:style-name="P1">a <text:span>b</text:span></text:p></office:document-content>"#,
        )
        .unwrap();

        assert_eq!(doc.root.name, "office:document-content");
        assert_eq!(doc.root.attr("office:version"), Some("1.2"));
        let p = doc.root.child_elements().next().unwrap();
        assert_eq!(p.attr("text:style-name"), Some("P1"));
        assert_eq!(p.children[0], Node::text("a "));
        assert_eq!(p.text(), "a b");
    }

    #[test]
    fn test_round_trip_escapes_text_and_attributes() {
        let mut root = Element::new("root").with_attr("title", "a \"quoted\" <value>");
        root.push(Node::text("1 < 2 & 3"));
        root.push(Element::new("empty"));
        let doc = Document { root };

        let xml = doc.to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<empty/>"));

        let reparsed = Document::parse(&xml).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_fragment_accepts_common_html_entities() {
        let fragment = parse_fragment("<p>a&nbsp;b &amp; c</p><p/>").unwrap();
        assert_eq!(fragment.name, FRAGMENT_ROOT);
        assert_eq!(fragment.child_elements().count(), 2);
        assert_eq!(fragment.text(), "a\u{a0}b & c");
    }

    #[test]
    fn test_predefined_entities_in_text_and_attributes() {
        let root = parse_element(
            r#"<p title="&quot;Smith&quot; &amp; &apos;Sons&apos;">1 &lt; 2 &gt; 0</p>"#,
        )
        .unwrap();
        assert_eq!(root.attr("title"), Some("\"Smith\" & 'Sons'"));
        assert_eq!(root.text(), "1 < 2 > 0");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert!(matches!(
            Document::from_bytes(b"<p>caf\xe9</p>"),
            Err(XmlError::Utf8(_))
        ));
        assert_eq!(Document::from_bytes("<p>café</p>".as_bytes()).unwrap().root.text(), "café");
    }

    #[test]
    fn test_malformed_fragment_is_an_error() {
        assert!(parse_fragment("<p><b>unclosed</p>").is_err());
        assert!(parse_fragment("<p>&bogus;</p>").is_err());
    }

    #[test]
    fn test_replace_elements_splices_and_skips_replacement() {
        let mut root = parse_element("<r><a/><b><a/></b><a/></r>").unwrap();
        let replaced = root.replace_elements(|el| {
            (el.name == "a").then(|| vec![Node::text("x"), Element::new("a").into()])
        });

        assert_eq!(replaced, 3);
        assert_eq!(root.to_xml().unwrap(), "<r>x<a/><b>x<a/></b>x<a/></r>");
    }

    #[test]
    fn test_replace_with_empty_removes_element() {
        let mut root = parse_element("<r><a>gone</a>kept</r>").unwrap();
        root.replace_elements(|el| (el.name == "a").then(Vec::new));
        assert_eq!(root.to_xml().unwrap(), "<r>kept</r>");
    }

    #[test]
    fn test_find_mut_and_set_attr() {
        let mut root = parse_element(r#"<r><x n="1"/><y><x n="2"/></y></r>"#).unwrap();
        let found = root.find_mut(&|el| el.is("x", "n", "2")).unwrap();
        found.set_attr("n", "3");
        assert_eq!(root.descendants().iter().filter(|el| el.name == "x").count(), 2);
        assert!(root.descendants().iter().any(|el| el.is("x", "n", "3")));
    }
}
