//! Semantic style tokens
//!
//! A token is the abstract identity of a style ("bold", "h2", "center"). Its
//! [`Display`](std::fmt::Display) form is the style name written into
//! generated markup and into the style catalog.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Paragraph alignment produced by an inline `text-align` declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// `center`
    Center,
    /// `left`
    Left,
    /// `right`
    Right,
    /// `justify`
    Justify,
}

impl Alignment {
    /// All alignments, in the order they are matched
    pub const ALL: [Alignment; 4] = [
        Alignment::Center,
        Alignment::Left,
        Alignment::Right,
        Alignment::Justify,
    ];

    /// CSS / ODF keyword
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Center => "center",
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    /// Parse a CSS keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == keyword)
    }
}

/// Bullet or numbered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// `ul`
    Unordered,
    /// `ol`
    Ordered,
}

impl ListKind {
    /// HTML tag name, also used as the list style name
    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// Abstract style identity, later materialized into a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleToken {
    /// `h1` .. `h6`
    Heading(u8),
    /// `p`, used for paragraphs created inside table cells
    P,
    /// `paragraph`, the structural default for `<p>`
    Paragraph,
    /// `subparagraph`, the follow-up style of headings
    Subparagraph,
    /// `quote`, paragraphs inside a blockquote
    Quote,
    /// `pre`
    Pre,
    /// `bold`, from `b` and `strong`
    Bold,
    /// `italic`, from `i` and `em`
    Italic,
    /// `underline`, from `u` and `ins`
    Underline,
    /// `strikethrough`, from `del` and `strike`
    Strikethrough,
    /// `sup`
    Superscript,
    /// `sub`
    Subscript,
    /// `code`
    Code,
    /// `a`, the inline span inside a hyperlink
    Hyperlink,
    /// `center`, `left`, `right`, `justify`
    Align(Alignment),
    /// `table`
    Table,
    /// `tr`
    TableRow,
    /// `tc`
    TableColumn,
    /// `td`
    TableCell,
    /// `ul` / `ol` list styles
    List(ListKind),
    /// `li`, paragraphs inside list items
    ListItem,
    /// Any other name, typically a CSS class taken verbatim
    Custom(String),
}

impl StyleToken {
    /// Every token with a built-in definition
    pub fn vocabulary() -> Vec<StyleToken> {
        let mut tokens: Vec<StyleToken> = (1..=6).map(StyleToken::Heading).collect();
        tokens.extend([
            StyleToken::P,
            StyleToken::Paragraph,
            StyleToken::Subparagraph,
            StyleToken::Quote,
            StyleToken::Pre,
            StyleToken::Bold,
            StyleToken::Italic,
            StyleToken::Underline,
            StyleToken::Strikethrough,
            StyleToken::Superscript,
            StyleToken::Subscript,
            StyleToken::Code,
            StyleToken::Hyperlink,
        ]);
        tokens.extend(Alignment::ALL.into_iter().map(StyleToken::Align));
        tokens.extend([
            StyleToken::Table,
            StyleToken::TableRow,
            StyleToken::TableColumn,
            StyleToken::TableCell,
            StyleToken::List(ListKind::Unordered),
            StyleToken::List(ListKind::Ordered),
            StyleToken::ListItem,
        ]);
        tokens
    }

    /// Style name as written into markup
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StyleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleToken::Heading(level) => write!(f, "h{}", level),
            StyleToken::P => write!(f, "p"),
            StyleToken::Paragraph => write!(f, "paragraph"),
            StyleToken::Subparagraph => write!(f, "subparagraph"),
            StyleToken::Quote => write!(f, "quote"),
            StyleToken::Pre => write!(f, "pre"),
            StyleToken::Bold => write!(f, "bold"),
            StyleToken::Italic => write!(f, "italic"),
            StyleToken::Underline => write!(f, "underline"),
            StyleToken::Strikethrough => write!(f, "strikethrough"),
            StyleToken::Superscript => write!(f, "sup"),
            StyleToken::Subscript => write!(f, "sub"),
            StyleToken::Code => write!(f, "code"),
            StyleToken::Hyperlink => write!(f, "a"),
            StyleToken::Align(alignment) => write!(f, "{}", alignment.as_str()),
            StyleToken::Table => write!(f, "table"),
            StyleToken::TableRow => write!(f, "tr"),
            StyleToken::TableColumn => write!(f, "tc"),
            StyleToken::TableCell => write!(f, "td"),
            StyleToken::List(kind) => write!(f, "{}", kind.as_str()),
            StyleToken::ListItem => write!(f, "li"),
            StyleToken::Custom(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for StyleToken {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = match s {
            "p" => StyleToken::P,
            "paragraph" => StyleToken::Paragraph,
            "subparagraph" => StyleToken::Subparagraph,
            "quote" => StyleToken::Quote,
            "pre" => StyleToken::Pre,
            "bold" => StyleToken::Bold,
            "italic" => StyleToken::Italic,
            "underline" => StyleToken::Underline,
            "strikethrough" => StyleToken::Strikethrough,
            "sup" => StyleToken::Superscript,
            "sub" => StyleToken::Subscript,
            "code" => StyleToken::Code,
            "a" => StyleToken::Hyperlink,
            "table" => StyleToken::Table,
            "tr" => StyleToken::TableRow,
            "tc" => StyleToken::TableColumn,
            "td" => StyleToken::TableCell,
            "ul" => StyleToken::List(ListKind::Unordered),
            "ol" => StyleToken::List(ListKind::Ordered),
            "li" => StyleToken::ListItem,
            other => {
                if let Some(alignment) = Alignment::from_keyword(other) {
                    StyleToken::Align(alignment)
                } else if let Some(level) = heading_level(other) {
                    StyleToken::Heading(level)
                } else {
                    StyleToken::Custom(other.to_string())
                }
            }
        };
        Ok(token)
    }
}

impl From<&str> for StyleToken {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|never| match never {})
    }
}

impl From<String> for StyleToken {
    fn from(s: String) -> Self {
        StyleToken::from(s.as_str())
    }
}

/// `h1`..`h6` to its level
fn heading_level(name: &str) -> Option<u8> {
    let level: u8 = name.strip_prefix('h')?.parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for token in StyleToken::vocabulary() {
            assert_eq!(StyleToken::from(token.name().as_str()), token);
        }
    }

    #[test]
    fn test_unknown_names_become_custom() {
        assert_eq!(StyleToken::from("callout"), StyleToken::Custom("callout".into()));
        assert_eq!(StyleToken::from("h7"), StyleToken::Custom("h7".into()));
        assert_eq!(StyleToken::from("h3"), StyleToken::Heading(3));
    }
}
