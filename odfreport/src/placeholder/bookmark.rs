//! Bookmark and bookmark range replacement

use super::{text_nodes, PatchContext, Placeholder};
use crate::error::ReportError;
use crate::xml::{Element, Node};

/// Plain text inserted at a bookmark
///
/// For a single-point `text:bookmark` the text goes right after the marker.
/// For a `text:bookmark-start` / `text:bookmark-end` pair the text runs between
/// the markers are removed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    name: String,
    value: String,
}

impl Bookmark {
    /// Create a bookmark replacement
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    fn is_marker(&self, node: &Node, name: &str) -> bool {
        node.as_element()
            .is_some_and(|el| el.is(name, "text:name", &self.name))
    }

    /// Patch every marker among the direct children of `el`
    fn patch_children(&self, el: &mut Element) -> usize {
        let mut count = 0;
        let mut index = 0;
        while index < el.children.len() {
            let is_point = self.is_marker(&el.children[index], "text:bookmark");
            let is_start = self.is_marker(&el.children[index], "text:bookmark-start");
            if !is_point && !is_start {
                index += 1;
                continue;
            }

            if is_start {
                let end = el.children[index + 1..]
                    .iter()
                    .position(|node| self.is_marker(node, "text:bookmark-end"));
                if let Some(offset) = end {
                    let range = index + 1..index + 1 + offset;
                    let kept: Vec<Node> = el
                        .children
                        .drain(range)
                        .filter(|node| !matches!(node, Node::Text(_)))
                        .collect();
                    el.children.splice(index + 1..index + 1, kept);
                }
            }

            let nodes = text_nodes(&self.value);
            let inserted = nodes.len();
            el.children.splice(index + 1..index + 1, nodes);
            count += 1;
            index += inserted + 1;
        }
        count
    }
}

impl Placeholder for Bookmark {
    fn name(&self) -> &str {
        &self.name
    }

    fn replace(&self, root: &mut Element, _ctx: &PatchContext<'_>) -> Result<(), ReportError> {
        let mut count = 0;
        root.walk_mut(&mut |el: &mut Element| count += self.patch_children(el));
        if count == 0 {
            log::debug!("Bookmark '{}' not found, skipping", self.name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rich_text::TransformOptions;
    use crate::xml::parse_element;

    fn apply(bookmark: &Bookmark, xml: &str) -> Element {
        let mut root = parse_element(xml).unwrap();
        let options = TransformOptions::default();
        bookmark
            .replace(&mut root, &PatchContext { rich_text: &options })
            .unwrap();
        root
    }

    #[test]
    fn test_point_bookmark_inserts_after_marker() {
        let root = apply(
            &Bookmark::new("client", "ACME"),
            r#"<r><text:p>Client: <text:bookmark text:name="client"/>.</text:p></r>"#,
        );
        assert_eq!(
            root.to_xml().unwrap(),
            r#"<r><text:p>Client: <text:bookmark text:name="client"/>ACME.</text:p></r>"#
        );
    }

    #[test]
    fn test_range_text_is_replaced() {
        let root = apply(
            &Bookmark::new("b", "NEW"),
            r#"<r><text:p>keep <text:bookmark-start text:name="b"/>OLD<text:bookmark-end text:name="b"/> tail</text:p></r>"#,
        );
        assert_eq!(
            root.to_xml().unwrap(),
            r#"<r><text:p>keep <text:bookmark-start text:name="b"/>NEW<text:bookmark-end text:name="b"/> tail</text:p></r>"#
        );
    }

    #[test]
    fn test_other_bookmarks_are_untouched() {
        let xml = r#"<r><text:p><text:bookmark-start text:name="a"/>A<text:bookmark-end text:name="a"/><text:bookmark-start text:name="b"/>B<text:bookmark-end text:name="b"/></text:p></r>"#;
        let root = apply(&Bookmark::new("b", "X"), xml);
        assert_eq!(root.text(), "AX");
        assert_eq!(root.descendants().len(), 5);
    }

    #[test]
    fn test_missing_bookmark_is_a_no_op() {
        let xml = r#"<r><text:p><text:bookmark text:name="other"/>x</text:p></r>"#;
        let root = apply(&Bookmark::new("missing", "X"), xml);
        assert_eq!(root, parse_element(xml).unwrap());
    }
}
