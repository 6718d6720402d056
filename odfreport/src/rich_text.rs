//! HTML fragment to ODF text conversion
//!
//! Converts a restricted HTML dialect into `text:` / `table:` nodes that can be
//! spliced into a template in place of a rich-text placeholder paragraph.
//!
//! # Mapping
//! - `h1`..`h6`, `p`, `pre` become `text:p` with a resolved paragraph style
//! - `blockquote` is unwrapped; its paragraphs default to the `quote` style
//! - `b`/`strong`, `i`/`em`, `u`/`ins`, `del`/`strike`, `sup`, `sub`, `code`
//!   become styled `text:span`s
//! - `a` without content becomes a `text:bookmark`, with content a `text:a`
//! - `ul`/`ol`/`li` become `text:list`/`text:list-item`
//! - `table`/`tr`/`td` become `table:table`/`table:table-row`/`table:table-cell`,
//!   `tbody` is spliced away
//!
//! Any other tag is kept as-is (name and attributes) with its children
//! converted.
//!
//! # Example
//! ```
//! use odfreport::rich_text::{transform, TransformOptions};
//!
//! let nodes = transform("<p>Hello <b>world</b></p>", &TransformOptions::default()).unwrap();
//! let p = nodes[0].as_element().unwrap();
//! assert_eq!(p.name, "text:p");
//! assert_eq!(p.attr("text:style-name"), Some("paragraph"));
//! ```

mod resolve;

pub use resolve::{alignment_override, class_override, resolve_style, strip_affixes, structural_default};

use crate::style::{ListKind, StyleToken};
use crate::xml::{self, Element, Node, XmlError};
use serde::{Deserialize, Serialize};

/// Options controlling class handling during conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Elements carrying any of these classes are dropped with their subtree
    pub remove_classes: Vec<String>,

    /// Prefix removed from class names before they are used as style names
    pub remove_class_prefix: Option<String>,

    /// Suffix removed from class names before they are used as style names
    pub remove_class_suffix: Option<String>,
}

const TEXT_STYLE: &str = "text:style-name";
const TABLE_STYLE: &str = "table:style-name";

/// Table template applied to every generated table
pub const TABLE_TEMPLATE: &str = "Academic";

/// Tags wrapped in a paragraph when they appear directly in a list item or cell
const INLINE_TAGS: &[&str] = &[
    "a", "span", "strong", "b", "em", "i", "ins", "u", "del", "strike", "sub", "sup", "code",
];

/// Closed set of tags with a conversion rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HtmlTag {
    Heading,
    Paragraph,
    Pre,
    Blockquote,
    LineBreak,
    Span(InlineStyle),
    Anchor,
    List(ListKind),
    ListItem,
    Table,
    TableBody,
    TableRow,
    TableCell,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    Code,
}

impl InlineStyle {
    fn token(self) -> StyleToken {
        match self {
            InlineStyle::Bold => StyleToken::Bold,
            InlineStyle::Italic => StyleToken::Italic,
            InlineStyle::Underline => StyleToken::Underline,
            InlineStyle::Strikethrough => StyleToken::Strikethrough,
            InlineStyle::Superscript => StyleToken::Superscript,
            InlineStyle::Subscript => StyleToken::Subscript,
            InlineStyle::Code => StyleToken::Code,
        }
    }
}

impl HtmlTag {
    fn of(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => HtmlTag::Heading,
            "p" => HtmlTag::Paragraph,
            "pre" => HtmlTag::Pre,
            "blockquote" => HtmlTag::Blockquote,
            "br" => HtmlTag::LineBreak,
            "b" | "strong" => HtmlTag::Span(InlineStyle::Bold),
            "i" | "em" => HtmlTag::Span(InlineStyle::Italic),
            "u" | "ins" => HtmlTag::Span(InlineStyle::Underline),
            "del" | "strike" => HtmlTag::Span(InlineStyle::Strikethrough),
            "sup" => HtmlTag::Span(InlineStyle::Superscript),
            "sub" => HtmlTag::Span(InlineStyle::Subscript),
            "code" => HtmlTag::Span(InlineStyle::Code),
            "a" => HtmlTag::Anchor,
            "ul" => HtmlTag::List(ListKind::Unordered),
            "ol" => HtmlTag::List(ListKind::Ordered),
            "li" => HtmlTag::ListItem,
            "table" => HtmlTag::Table,
            "tbody" => HtmlTag::TableBody,
            "tr" => HtmlTag::TableRow,
            "td" => HtmlTag::TableCell,
            _ => HtmlTag::Other,
        }
    }

    /// Tags picked up by the top-level pass
    fn is_block(self) -> bool {
        matches!(
            self,
            HtmlTag::Heading
                | HtmlTag::Paragraph
                | HtmlTag::Pre
                | HtmlTag::Blockquote
                | HtmlTag::List(_)
                | HtmlTag::Table
        )
    }
}

/// Convert an HTML fragment into ODF nodes
///
/// Newlines, carriage returns and tabs are removed from the markup before
/// parsing. Only block-level elements (`h1`..`h6`, `p`, `pre`, `blockquote`,
/// `ul`, `ol`, `table`) produce output; blocks nested in other blocks are
/// reached through their container and never emitted twice.
///
/// # Parameters
/// * `markup` - Well-formed HTML fragment
/// * `options` - Class removal and stripping rules
///
/// # Returns
/// * `Ok(Vec<Node>)` - Top-level ODF nodes in document order
/// * `Err(XmlError)` - The fragment is not well-formed
pub fn transform(markup: &str, options: &TransformOptions) -> Result<Vec<Node>, XmlError> {
    let cleaned: String = markup
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect();
    let fragment = xml::parse_fragment(cleaned.trim())?;

    let transformer = Transformer { options };
    let mut blocks = Vec::new();
    transformer.collect_blocks(&fragment, &mut blocks);
    Ok(blocks)
}

struct Transformer<'a> {
    options: &'a TransformOptions,
}

impl Transformer<'_> {
    /// Top-level pass: convert outermost blocks, look through anything else
    fn collect_blocks(&self, container: &Element, out: &mut Vec<Node>) {
        for child in container.child_elements() {
            if self.is_removed(child) {
                continue;
            }
            if HtmlTag::of(&child.name).is_block() {
                out.extend(self.transform(child, Some(container.name.as_str())));
            } else {
                self.collect_blocks(child, out);
            }
        }
    }

    /// Convert one source element into zero or more ODF nodes
    fn transform(&self, el: &Element, parent: Option<&str>) -> Vec<Node> {
        if self.is_removed(el) {
            return Vec::new();
        }

        match HtmlTag::of(&el.name) {
            HtmlTag::Heading | HtmlTag::Paragraph | HtmlTag::Pre => {
                let style = resolve_style(el, parent, self.options);
                vec![paragraph(style, self.children(el)).into()]
            }
            HtmlTag::Blockquote => self.blockquote(el),
            HtmlTag::LineBreak => vec![Element::new("text:line-break").into()],
            HtmlTag::Span(style) => vec![span(style.token(), self.children(el)).into()],
            HtmlTag::Anchor => vec![self.anchor(el).into()],
            HtmlTag::List(kind) => {
                let list = Element::new("text:list")
                    .with_attr(TEXT_STYLE, kind.as_str())
                    .with_children(self.container_children(el));
                vec![list.into()]
            }
            HtmlTag::ListItem => {
                let item = Element::new("text:list-item")
                    .with_children(self.block_content(el, StyleToken::ListItem));
                vec![item.into()]
            }
            HtmlTag::Table => vec![self.table(el).into()],
            HtmlTag::TableBody => self.container_children(el),
            HtmlTag::TableRow => {
                let row = Element::new("table:table-row")
                    .with_attr(TABLE_STYLE, StyleToken::TableRow.name())
                    .with_children(self.container_children(el));
                vec![row.into()]
            }
            HtmlTag::TableCell => vec![self.table_cell(el).into()],
            HtmlTag::Other => {
                let mut passthrough = Element::new(el.name.clone()).with_children(self.children(el));
                passthrough.attributes = el.attributes.clone();
                vec![passthrough.into()]
            }
        }
    }

    fn transform_node(&self, node: &Node, parent: &str) -> Vec<Node> {
        match node {
            Node::Text(text) => vec![Node::text(text.clone())],
            Node::Element(el) => self.transform(el, Some(parent)),
        }
    }

    fn children(&self, el: &Element) -> Vec<Node> {
        el.children
            .iter()
            .flat_map(|child| self.transform_node(child, &el.name))
            .collect()
    }

    /// Children of structural containers, where whitespace text is dropped
    fn container_children(&self, el: &Element) -> Vec<Node> {
        el.children
            .iter()
            .filter(|child| !child.is_blank_text())
            .flat_map(|child| self.transform_node(child, &el.name))
            .collect()
    }

    /// List item / cell content: text and inline children get their own paragraph
    fn block_content(&self, el: &Element, style: StyleToken) -> Vec<Node> {
        let mut out = Vec::new();
        for child in &el.children {
            match child {
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Text(text) => {
                    out.push(paragraph(Some(style.clone()), vec![Node::text(text.clone())]).into());
                }
                Node::Element(inline) if is_inline(&inline.name) => {
                    if !self.is_removed(inline) {
                        let content = self.transform(inline, Some(el.name.as_str()));
                        out.push(paragraph(Some(style.clone()), content).into());
                    }
                }
                Node::Element(block) => out.extend(self.transform(block, Some(el.name.as_str()))),
            }
        }
        out
    }

    /// Unwrap a blockquote into its converted children
    fn blockquote(&self, el: &Element) -> Vec<Node> {
        let mut out = Vec::new();
        for child in &el.children {
            match child {
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Text(text) => {
                    out.push(paragraph(Some(StyleToken::Quote), vec![Node::text(text.clone())]).into());
                }
                Node::Element(inline) if is_inline(&inline.name) => {
                    let content = self.transform(inline, Some(el.name.as_str()));
                    if !content.is_empty() {
                        out.push(paragraph(Some(StyleToken::Quote), content).into());
                    }
                }
                Node::Element(block) => out.extend(self.transform(block, Some(el.name.as_str()))),
            }
        }
        out
    }

    fn anchor(&self, el: &Element) -> Element {
        if el.children.is_empty() {
            let mut bookmark = Element::new("text:bookmark");
            if let Some(name) = el.attr("name").or_else(|| el.attr("id")) {
                bookmark.set_attr("text:name", name);
            }
            return bookmark;
        }

        let mut link = Element::new("text:a");
        if let Some(href) = el.attr("href").filter(|href| !href.trim().is_empty()) {
            link.set_attr("xlink:href", href);
            link.set_attr("office:target-frame-name", "_top");
            link.set_attr("xlink:show", "replace");
        }
        link.with_children([span(StyleToken::Hyperlink, self.children(el)).into()])
    }

    fn table_cell(&self, el: &Element) -> Element {
        let mut cell = Element::new("table:table-cell").with_attr(TABLE_STYLE, StyleToken::TableCell.name());
        if let Some(colspan) = el.attr("colspan").filter(|v| !v.trim().is_empty()) {
            cell.set_attr("table:number-columns-spanned", colspan.trim());
        }
        if let Some(rowspan) = el.attr("rowspan").filter(|v| !v.trim().is_empty()) {
            cell.set_attr("table:number-rows-spanned", rowspan.trim());
        }
        cell.with_children(self.block_content(el, StyleToken::P))
    }

    /// Convert a table and prepend one repeated column definition
    ///
    /// The repeat count is the largest number of cells in any row of the
    /// converted subtree, counted after conversion.
    fn table(&self, el: &Element) -> Element {
        let mut table = Element::new("table:table")
            .with_attr(TABLE_STYLE, StyleToken::Table.name())
            .with_attr("table:template-name", TABLE_TEMPLATE)
            .with_children(self.container_children(el));

        let max_cells = table
            .descendants()
            .into_iter()
            .filter(|row| row.name == "table:table-row")
            .map(|row| {
                row.child_elements()
                    .filter(|cell| cell.name == "table:table-cell")
                    .count()
            })
            .max();

        let mut column =
            Element::new("table:table-column").with_attr(TABLE_STYLE, StyleToken::TableColumn.name());
        if let Some(count) = max_cells {
            column.set_attr("table:number-columns-repeated", count.to_string());
        }
        table.children.insert(0, column.into());
        table
    }

    fn is_removed(&self, el: &Element) -> bool {
        if self.options.remove_classes.is_empty() {
            return false;
        }
        el.attr("class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|class| self.options.remove_classes.iter().any(|removed| removed == class))
        })
    }
}

fn is_inline(name: &str) -> bool {
    INLINE_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

fn paragraph(style: Option<StyleToken>, children: Vec<Node>) -> Element {
    let mut p = Element::new("text:p");
    if let Some(style) = style {
        p.set_attr(TEXT_STYLE, style.name());
    }
    p.with_children(children)
}

fn span(style: StyleToken, children: Vec<Node>) -> Element {
    Element::new("text:span")
        .with_attr(TEXT_STYLE, style.name())
        .with_children(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(markup: &str) -> Vec<Node> {
        transform(markup, &TransformOptions::default()).unwrap()
    }

    fn single(markup: &str) -> Element {
        let nodes = convert(markup);
        assert_eq!(nodes.len(), 1, "expected one node for {markup}");
        nodes[0].as_element().unwrap().clone()
    }

    fn style_of(el: &Element) -> Option<&str> {
        el.attr(TEXT_STYLE).or_else(|| el.attr(TABLE_STYLE))
    }

    #[test]
    fn test_inline_tags_map_to_styled_spans() {
        let cases = [
            ("b", "bold"),
            ("strong", "bold"),
            ("i", "italic"),
            ("em", "italic"),
            ("u", "underline"),
            ("ins", "underline"),
            ("del", "strikethrough"),
            ("strike", "strikethrough"),
            ("sup", "sup"),
            ("sub", "sub"),
            ("code", "code"),
        ];
        for (tag, style) in cases {
            let p = single(&format!("<p><{tag}>x</{tag}></p>"));
            let span = p.child_elements().next().unwrap();
            assert_eq!(span.name, "text:span", "{tag}");
            assert_eq!(style_of(span), Some(style), "{tag}");
            assert_eq!(span.text(), "x");
        }
    }

    #[test]
    fn test_headings_and_pre_become_styled_paragraphs() {
        for level in 1..=6 {
            let p = single(&format!("<h{level}>Title</h{level}>"));
            assert_eq!(p.name, "text:p");
            assert_eq!(style_of(&p), Some(format!("h{level}").as_str()));
        }
        assert_eq!(style_of(&single("<pre>code</pre>")), Some("pre"));
    }

    #[test]
    fn test_unknown_tags_pass_through() {
        let p = single(r#"<p><span class="x" data-id="7">a<b>b</b></span></p>"#);
        let span = p.child_elements().next().unwrap();
        assert_eq!(span.name, "span");
        assert_eq!(
            span.attributes,
            vec![
                ("class".to_string(), "x".to_string()),
                ("data-id".to_string(), "7".to_string()),
            ]
        );
        assert_eq!(span.child_elements().next().unwrap().name, "text:span");
    }

    #[test]
    fn test_line_break() {
        let p = single("<p>a<br/>b</p>");
        assert_eq!(p.children[1].as_element().unwrap().name, "text:line-break");
    }

    #[test]
    fn test_anchor_without_content_is_a_bookmark() {
        let p = single(r#"<p><a name="intro"/>Text</p>"#);
        let bookmark = p.child_elements().next().unwrap();
        assert_eq!(bookmark.name, "text:bookmark");
        assert_eq!(bookmark.attr("text:name"), Some("intro"));
        assert!(bookmark.children.is_empty());
        assert_eq!(p.text(), "Text");
    }

    #[test]
    fn test_anchor_with_content_is_a_hyperlink() {
        let p = single(r#"<p><a href="https://example.com">site</a><a>no link</a></p>"#);
        let mut links = p.child_elements();

        let link = links.next().unwrap();
        assert_eq!(link.name, "text:a");
        assert_eq!(link.attr("xlink:href"), Some("https://example.com"));
        assert_eq!(link.attr("office:target-frame-name"), Some("_top"));
        assert_eq!(link.attr("xlink:show"), Some("replace"));
        let span = link.child_elements().next().unwrap();
        assert_eq!(style_of(span), Some("a"));
        assert_eq!(span.text(), "site");

        let bare = links.next().unwrap();
        assert_eq!(bare.name, "text:a");
        assert!(bare.attributes.is_empty());
    }

    #[test]
    fn test_blockquote_is_unwrapped_into_quote_paragraphs() {
        let nodes = convert(
            r#"<p>before</p><blockquote><p>one</p><p class="note">two</p></blockquote><p>after</p>"#,
        );
        let styles: Vec<_> = nodes
            .iter()
            .map(|n| style_of(n.as_element().unwrap()).unwrap().to_string())
            .collect();
        assert_eq!(styles, ["paragraph", "quote", "note", "paragraph"]);
    }

    #[test]
    fn test_list_items_wrap_text_and_inline_content() {
        let list = single("<ul><li>plain <b>bold</b></li><li><p>para</p></li></ul>");
        assert_eq!(list.name, "text:list");
        assert_eq!(style_of(&list), Some("ul"));

        let items: Vec<_> = list.child_elements().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "text:list-item");

        let first: Vec<_> = items[0].child_elements().collect();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|p| p.name == "text:p" && style_of(p) == Some("li")));
        assert_eq!(first[0].text(), "plain ");
        assert_eq!(first[1].child_elements().next().unwrap().name, "text:span");

        let second = items[1].child_elements().next().unwrap();
        assert_eq!(style_of(second), Some("paragraph"));
    }

    #[test]
    fn test_nested_lists_are_converted_once() {
        let nodes = convert("<ol><li>a<ul><li>b</li></ul></li></ol>");
        assert_eq!(nodes.len(), 1);

        let outer = nodes[0].as_element().unwrap();
        assert_eq!(style_of(outer), Some("ol"));
        let item = outer.child_elements().next().unwrap();
        let inner = item.child_elements().find(|el| el.name == "text:list").unwrap();
        assert_eq!(style_of(inner), Some("ul"));
        assert!(inner.child_elements().all(|el| el.name == "text:list-item"));
        assert_eq!(inner.text(), "b");
    }

    #[test]
    fn test_table_column_count_is_the_widest_converted_row() {
        let table = single(
            "<table><tbody><tr><td>1</td><td>2</td></tr><tr><td>1</td><td>2</td><td>3</td></tr><tr><td>1</td></tr></tbody></table>",
        );
        assert_eq!(table.name, "table:table");
        assert_eq!(table.attr("table:template-name"), Some(TABLE_TEMPLATE));

        let children: Vec<_> = table.child_elements().collect();
        assert_eq!(children.len(), 4, "tbody is spliced away");
        assert_eq!(children[0].name, "table:table-column");
        assert_eq!(children[0].attr("table:number-columns-repeated"), Some("3"));
        assert!(children[1..].iter().all(|row| row.name == "table:table-row"));
    }

    #[test]
    fn test_removed_cells_do_not_count_towards_columns() {
        let options = TransformOptions {
            remove_classes: vec!["internal".into()],
            ..TransformOptions::default()
        };
        let nodes = transform(
            r#"<table><tr><td>a</td><td class="internal">b</td></tr></table>"#,
            &options,
        )
        .unwrap();
        let table = nodes[0].as_element().unwrap();
        let column = table.child_elements().next().unwrap();
        assert_eq!(column.attr("table:number-columns-repeated"), Some("1"));
    }

    #[test]
    fn test_cell_spans_are_copied_only_when_present() {
        let table = single(r#"<table><tr><td>a</td><td colspan="2" rowspan="3">b</td></tr></table>"#);
        let row = table.child_elements().nth(1).unwrap();
        let cells: Vec<_> = row.child_elements().collect();

        assert_eq!(cells[0].attr("table:number-columns-spanned"), None);
        assert_eq!(cells[0].attr("table:number-rows-spanned"), None);
        assert_eq!(cells[1].attr("table:number-columns-spanned"), Some("2"));
        assert_eq!(cells[1].attr("table:number-rows-spanned"), Some("3"));
    }

    #[test]
    fn test_cell_text_gets_p_paragraphs() {
        let table = single("<table><tr><td>text<i>inline</i><ul><li>x</li></ul></td></tr></table>");
        let cell = table.descendants().into_iter().find(|el| el.name == "table:table-cell").unwrap();
        let children: Vec<_> = cell.child_elements().collect();
        assert_eq!(children.len(), 3);
        assert_eq!(style_of(children[0]), Some("p"));
        assert_eq!(style_of(children[1]), Some("p"));
        assert_eq!(children[2].name, "text:list");
    }

    #[test]
    fn test_nested_table_is_not_emitted_at_top_level() {
        let nodes = convert("<table><tr><td><table><tr><td>x</td></tr></table></td></tr></table>");
        assert_eq!(nodes.len(), 1);
        let outer = nodes[0].as_element().unwrap();
        let tables = outer
            .descendants()
            .into_iter()
            .filter(|el| el.name == "table:table")
            .count();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_removed_classes_drop_blocks_and_inline_content() {
        let options = TransformOptions {
            remove_classes: vec!["hidden".into()],
            ..TransformOptions::default()
        };
        let nodes = transform(
            r#"<p class="hidden">gone</p><p>kept <b class="x hidden">gone</b></p>"#,
            &options,
        )
        .unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].as_element().unwrap().text(), "kept ");
    }

    #[test]
    fn test_blocks_inside_unknown_wrappers_are_found() {
        let nodes = convert("<div><p>a</p><section><h2>b</h2></section></div>loose text");
        assert_eq!(nodes.len(), 2);
        assert_eq!(style_of(nodes[1].as_element().unwrap()), Some("h2"));
    }

    #[test]
    fn test_loose_inline_content_is_not_a_block() {
        assert!(convert("<b>x</b>").is_empty());
        assert!(convert("plain <i>text</i>").is_empty());
        assert_eq!(single("<b>x</b><p>y</p>").text(), "y");
    }

    #[test]
    fn test_xml_entities_in_markup() {
        let p = single(r#"<p title="&quot;t&quot;">1 &lt; 2 &amp;&amp; a&nbsp;&gt; b</p>"#);
        assert_eq!(p.text(), "1 < 2 && a\u{a0}> b");
    }

    #[test]
    fn test_newlines_and_tabs_are_removed_before_parsing() {
        let p = single("<p>\n\tone\ntwo</p>");
        assert_eq!(p.text(), "onetwo");
    }

    #[test]
    fn test_malformed_markup_is_rejected() {
        assert!(transform("<p><b>x</p>", &TransformOptions::default()).is_err());
    }
}
