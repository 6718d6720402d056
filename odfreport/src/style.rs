//! Style synthesis and style catalog injection
//!
//! Every built-in [`StyleToken`] maps to a fixed bundle of presentation
//! properties. [`synthesize`] is pure; [`inject`] appends the result to the
//! template's `office:automatic-styles` (and `office:font-face-decls` for the
//! monospace font) and silently does nothing when a catalog element is absent.
//!
//! Deduplication of style nodes is the caller's job: synthesizing the same
//! token twice yields two identical nodes.

mod list_style;
mod token;

pub use list_style::{list_style, LIST_LEVELS};
pub use token::{Alignment, ListKind, StyleToken};

use crate::xml::Element;

/// Catalog element receiving style definitions
pub const AUTOMATIC_STYLES: &str = "office:automatic-styles";

/// Catalog element receiving font declarations
pub const FONT_FACE_DECLS: &str = "office:font-face-decls";

const STYLE: &str = "style:style";
const FONT_FACE: &str = "style:font-face";
const STYLE_NAME: &str = "style:name";

/// A `style:font-face` declaration requested by a style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDeclaration {
    /// Name referenced by `style:font-name`
    pub name: &'static str,
    /// `svg:font-family`
    pub family: &'static str,
    /// `style:font-family-generic`
    pub family_generic: &'static str,
    /// `style:font-pitch`
    pub pitch: &'static str,
}

impl FontDeclaration {
    /// Build the catalog node
    pub fn to_element(&self) -> Element {
        Element::new(FONT_FACE)
            .with_attr(STYLE_NAME, self.name)
            .with_attr("svg:font-family", self.family)
            .with_attr("style:font-family-generic", self.family_generic)
            .with_attr("style:font-pitch", self.pitch)
    }
}

/// Shared font for `pre` and `code`
pub const MONOSPACE_FONT: FontDeclaration = FontDeclaration {
    name: "Courier New",
    family: "'Courier New'",
    family_generic: "system",
    pitch: "fixed",
};

/// Build the style definition for a token
///
/// # Returns
/// * `(Element, Option<FontDeclaration>)` - The catalog node and, for `pre`
///   and `code`, the font declaration it depends on
pub fn synthesize(token: &StyleToken) -> (Element, Option<FontDeclaration>) {
    let name = token.name();

    match token {
        StyleToken::Bold => (
            text_style(&name, &[("fo:font-weight", "bold"), ("fo:font-weight-asian", "bold")]),
            None,
        ),
        StyleToken::Italic => (
            text_style(&name, &[("fo:font-style", "italic"), ("fo:font-style-asian", "italic")]),
            None,
        ),
        StyleToken::Underline => (text_style(&name, UNDERLINE), None),
        StyleToken::Strikethrough => (
            text_style(
                &name,
                &[
                    ("style:text-line-through-style", "solid"),
                    ("style:text-line-through-type", "single"),
                ],
            ),
            None,
        ),
        StyleToken::Superscript => (
            text_style(&name, &[("style:text-position", "super 58%")]),
            None,
        ),
        StyleToken::Subscript => (
            text_style(&name, &[("style:text-position", "sub 58%")]),
            None,
        ),
        StyleToken::Code => (
            text_style(&name, &[("style:font-name", MONOSPACE_FONT.name)]),
            Some(MONOSPACE_FONT),
        ),
        StyleToken::Hyperlink => {
            let mut props = vec![("fo:color", "#0000ff")];
            props.extend_from_slice(UNDERLINE);
            (text_style(&name, &props), None)
        }
        StyleToken::Heading(level) => {
            let style = paragraph_style(&name, "body")
                .with_attr("style:next-style-name", "subparagraph")
                .with_attr("style:default-outline-level", level.to_string())
                .with_children([
                    properties(
                        "style:paragraph-properties",
                        &[
                            ("fo:text-align", "left"),
                            ("fo:line-height", "100%"),
                            ("fo:margin-left", "1.25cm"),
                            ("fo:margin-right", "0cm"),
                            ("fo:keep-with-next", "always"),
                            ("fo:margin-top", "1.25cm"),
                            ("fo:margin-bottom", "0.5cm"),
                            ("fo:text-indent", "-1.25cm"),
                            ("style:auto-text-indent", "false"),
                        ],
                    )
                    .into(),
                    properties(
                        "style:text-properties",
                        &[
                            ("fo:font-weight", "bold"),
                            ("fo:font-weight-asian", "bold"),
                            ("fo:hyphenate", "true"),
                        ],
                    )
                    .into(),
                ]);
            (style, None)
        }
        StyleToken::P | StyleToken::Paragraph => (
            plain_paragraph(&name, "body", Some("paragraph")),
            None,
        ),
        StyleToken::Subparagraph => (
            plain_paragraph(&name, "paragraph", Some("subparagraph")),
            None,
        ),
        StyleToken::ListItem => (plain_paragraph(&name, "paragraph", None), None),
        StyleToken::Align(alignment) => {
            let style = paragraph_style(&name, "paragraph").with_children([properties(
                "style:paragraph-properties",
                &[("fo:text-align", alignment.as_str())],
            )
            .into()]);
            (style, None)
        }
        StyleToken::Quote => {
            let style = paragraph_style(&name, "body").with_children([
                properties(
                    "style:paragraph-properties",
                    &[
                        ("fo:text-align", "justify"),
                        ("fo:line-height", "150%"),
                        ("fo:margin-top", "0.5cm"),
                        ("fo:margin-right", "1cm"),
                        ("fo:margin-bottom", "0.5cm"),
                        ("fo:margin-left", "1cm"),
                    ],
                )
                .into(),
                properties(
                    "style:text-properties",
                    &[
                        ("fo:hyphenate", "true"),
                        ("fo:font-style", "italic"),
                        ("fo:font-style-asian", "italic"),
                    ],
                )
                .into(),
            ]);
            (style, None)
        }
        StyleToken::Pre => {
            let style = paragraph_style(&name, "body").with_children([
                properties(
                    "style:paragraph-properties",
                    &[
                        ("fo:text-align", "left"),
                        ("fo:line-height", "100%"),
                        ("fo:margin-top", "0.5cm"),
                        ("fo:margin-right", "1cm"),
                        ("fo:margin-bottom", "0.5cm"),
                        ("fo:margin-left", "1cm"),
                        ("fo:background-color", "transparent"),
                        ("fo:padding", "0.05cm"),
                        ("fo:border", "0.06pt solid #000000"),
                    ],
                )
                .into(),
                properties(
                    "style:text-properties",
                    &[
                        ("fo:hyphenate", "true"),
                        ("fo:font-style", "normal"),
                        ("fo:font-style-asian", "normal"),
                        ("style:font-name", MONOSPACE_FONT.name),
                    ],
                )
                .into(),
            ]);
            (style, Some(MONOSPACE_FONT))
        }
        StyleToken::Table => (
            family_style(
                &name,
                "table",
                "style:table-properties",
                &[
                    ("style:rel-width", "100%"),
                    ("fo:margin-top", "0.5cm"),
                    ("fo:margin-right", "0cm"),
                    ("fo:margin-bottom", "0.5cm"),
                    ("fo:margin-left", "0cm"),
                    ("table:align", "left"),
                ],
            ),
            None,
        ),
        StyleToken::TableRow => (
            family_style(&name, "table-row", "style:table-row-properties", &[]),
            None,
        ),
        StyleToken::TableColumn => (
            family_style(
                &name,
                "table-column",
                "style:table-column-properties",
                &[("style:use-optimal-column-width", "true")],
            ),
            None,
        ),
        StyleToken::TableCell => (
            family_style(
                &name,
                "table-cell",
                "style:table-cell-properties",
                &[
                    ("style:writing-mode", "lr-tb"),
                    ("fo:padding-top", "0.1cm"),
                    ("fo:padding-right", "0.1cm"),
                    ("fo:padding-bottom", "0.1cm"),
                    ("fo:padding-left", "0.1cm"),
                    ("fo:border", "0.06pt solid #000000"),
                ],
            ),
            None,
        ),
        StyleToken::List(kind) => (list_style(*kind), None),
        StyleToken::Custom(_) => (paragraph_style_bare(&name), None),
    }
}

/// Synthesize a token and append it to the template's style catalog
///
/// The font declaration is only added when no `style:font-face` of the same
/// name is already declared.
///
/// # Returns
/// * `true` - The style node was appended
/// * `false` - The part has no `office:automatic-styles` element
pub fn inject(root: &mut Element, token: &StyleToken) -> bool {
    let (style, font) = synthesize(token);

    let injected = match root.find_mut(&|el: &Element| el.name == AUTOMATIC_STYLES) {
        Some(catalog) => {
            catalog.push(style);
            true
        }
        None => {
            log::debug!("No {} in <{}>, skipping style '{}'", AUTOMATIC_STYLES, root.name, token);
            false
        }
    };

    if let Some(font) = font {
        match root.find_mut(&|el: &Element| el.name == FONT_FACE_DECLS) {
            Some(decls) => {
                let declared = decls
                    .child_elements()
                    .any(|f| f.is(FONT_FACE, STYLE_NAME, font.name));
                if !declared {
                    decls.push(font.to_element());
                }
            }
            None => log::debug!("No {} in <{}>, skipping font '{}'", FONT_FACE_DECLS, root.name, font.name),
        }
    }

    injected
}

const UNDERLINE: &[(&str, &str)] = &[
    ("style:text-underline-type", "single"),
    ("style:text-underline-style", "solid"),
    ("style:text-underline-width", "auto"),
    ("style:text-underline-mode", "continuous"),
];

fn properties(name: &str, props: &[(&str, &str)]) -> Element {
    props
        .iter()
        .fold(Element::new(name), |el, (key, value)| el.with_attr(*key, *value))
}

fn family_style(name: &str, family: &str, properties_name: &str, props: &[(&str, &str)]) -> Element {
    Element::new(STYLE)
        .with_attr(STYLE_NAME, name)
        .with_attr("style:family", family)
        .with_children([properties(properties_name, props).into()])
}

fn text_style(name: &str, props: &[(&str, &str)]) -> Element {
    family_style(name, "text", "style:text-properties", props)
}

fn paragraph_style_bare(name: &str) -> Element {
    Element::new(STYLE)
        .with_attr(STYLE_NAME, name)
        .with_attr("style:family", "paragraph")
}

fn paragraph_style(name: &str, parent: &str) -> Element {
    paragraph_style_bare(name).with_attr("style:parent-style-name", parent)
}

fn plain_paragraph(name: &str, parent: &str, next: Option<&str>) -> Element {
    let mut style = paragraph_style(name, parent);
    if let Some(next) = next {
        style.set_attr("style:next-style-name", next);
    }
    style.with_children([
        Element::new("style:paragraph-properties").into(),
        Element::new("style:text-properties").into(),
    ])
}
