//! Text extraction from bookmarks and sections
//!
//! The inverse of patching: read back what a filled document holds at a
//! bookmark or inside a named section.

use crate::xml::{Element, Node};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// Values read from one content part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Section name to section text
    pub sections: BTreeMap<String, String>,
    /// Bookmark name to bookmark text
    pub bookmarks: BTreeMap<String, String>,
}

/// Reads the text of one bookmark, or of every bookmark when unnamed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkReader {
    /// Bookmark to read; `None` reads all
    pub name: Option<String>,
}

impl BookmarkReader {
    /// Reader for a single bookmark
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Reader for every bookmark
    pub fn all() -> Self {
        Self::default()
    }

    /// Read `(name, text)` pairs from a tree
    ///
    /// For a single-point bookmark the text is every text run following the
    /// marker among its siblings. For a range it is the text runs between the
    /// start and end markers. A bookmark may yield both.
    pub fn read(&self, root: &Element) -> Vec<(String, String)> {
        let names = match &self.name {
            Some(name) => vec![name.clone()],
            None => elements(root)
                .filter(|el| el.name == "text:bookmark" || el.name == "text:bookmark-start")
                .filter_map(|el| el.attr("text:name"))
                .unique()
                .map(str::to_string)
                .collect(),
        };

        let mut result = Vec::new();
        for name in names {
            if let Some(text) = point_text(root, &name) {
                result.push((name.clone(), text));
            }
            if let Some(text) = range_text(root, &name) {
                result.push((name, text));
            }
        }
        result
    }
}

/// Reads the text of one section, or of every section when unnamed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionReader {
    /// Section to read; `None` reads all
    pub name: Option<String>,
}

impl SectionReader {
    /// Reader for a single section
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Reader for every section
    pub fn all() -> Self {
        Self::default()
    }

    /// Read `(name, text)` pairs from a tree
    ///
    /// Sections sharing a name have their texts concatenated.
    pub fn read(&self, root: &Element) -> Vec<(String, String)> {
        let names: Vec<String> = match &self.name {
            Some(name) => vec![name.clone()],
            None => elements(root)
                .filter(|el| el.name == "text:section")
                .filter_map(|el| el.attr("text:name"))
                .unique()
                .map(str::to_string)
                .collect(),
        };

        names
            .into_iter()
            .filter_map(|name| {
                let sections: Vec<&Element> = elements(root)
                    .filter(|el| el.is("text:section", "text:name", &name))
                    .collect();
                if sections.is_empty() {
                    return None;
                }
                let text: String = sections.iter().map(|section| section.text()).collect();
                Some((name, text))
            })
            .collect()
    }
}

/// `root` and all its descendants
fn elements(root: &Element) -> impl Iterator<Item = &Element> {
    std::iter::once(root).chain(root.descendants())
}

fn point_text(root: &Element, name: &str) -> Option<String> {
    let mut found: Option<String> = None;
    for parent in elements(root) {
        let mut after_marker = false;
        for child in &parent.children {
            match child {
                Node::Element(el) if el.is("text:bookmark", "text:name", name) => after_marker = true,
                Node::Text(text) if after_marker => {
                    found.get_or_insert_with(String::new).push_str(text)
                }
                _ => {}
            }
        }
    }
    found
}

fn range_text(root: &Element, name: &str) -> Option<String> {
    let mut found: Option<String> = None;
    for parent in elements(root) {
        let mut pending: Option<String> = None;
        for child in &parent.children {
            match child {
                Node::Element(el) if el.is("text:bookmark-start", "text:name", name) => {
                    pending = Some(String::new());
                }
                Node::Element(el) if el.is("text:bookmark-end", "text:name", name) => {
                    if let Some(text) = pending.take() {
                        found.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Node::Text(text) => {
                    if let Some(buffer) = pending.as_mut() {
                        buffer.push_str(text);
                    }
                }
                Node::Element(_) => {}
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_element;

    const DOC: &str = concat!(
        r#"<office:text>"#,
        r#"<text:p>Client: <text:bookmark text:name="client"/>ACME Corp</text:p>"#,
        r#"<text:p>Total <text:bookmark-start text:name="total"/>42<text:bookmark-end text:name="total"/> EUR</text:p>"#,
        r#"<text:section text:name="notes"><text:p>First</text:p><text:p>Second</text:p></text:section>"#,
        r#"<text:section text:name="legal"><text:p>Terms</text:p></text:section>"#,
        r#"</office:text>"#
    );

    #[test]
    fn test_point_and_range_bookmarks() {
        let root = parse_element(DOC).unwrap();
        assert_eq!(
            BookmarkReader::named("client").read(&root),
            [("client".to_string(), "ACME Corp".to_string())]
        );
        assert_eq!(
            BookmarkReader::named("total").read(&root),
            [("total".to_string(), "42".to_string())]
        );
    }

    #[test]
    fn test_unnamed_reader_reads_every_bookmark() {
        let root = parse_element(DOC).unwrap();
        let names: Vec<_> = BookmarkReader::all()
            .read(&root)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["client", "total"]);
    }

    #[test]
    fn test_missing_bookmark_yields_nothing() {
        let root = parse_element(DOC).unwrap();
        assert!(BookmarkReader::named("nope").read(&root).is_empty());
    }

    #[test]
    fn test_sections() {
        let root = parse_element(DOC).unwrap();
        assert_eq!(
            SectionReader::named("notes").read(&root),
            [("notes".to_string(), "FirstSecond".to_string())]
        );
        assert_eq!(SectionReader::all().read(&root).len(), 2);
        assert!(SectionReader::named("missing").read(&root).is_empty());
    }
}
