//! Paragraph style resolution
//!
//! Three ordered tiers, each a pure function over the token produced by the
//! previous one:
//!
//! 1. structural default from the tag (`h1`..`h6`, `quote`, `pre`, `paragraph`)
//! 2. the element's `class` attribute, after prefix/suffix stripping
//! 3. an inline `text-align` declaration
//!
//! A later tier always wins over an earlier one.

use super::TransformOptions;
use crate::style::{Alignment, StyleToken};
use crate::xml::Element;
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

static TEXT_ALIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"text-align:\s*(center|left|right|justify)").expect("text-align pattern is valid")
});

/// Resolve the paragraph style of a source element
///
/// # Parameters
/// * `element` - Source HTML element
/// * `parent` - Tag name of the source parent, if any
/// * `options` - Class prefix/suffix stripping rules
pub fn resolve_style(
    element: &Element,
    parent: Option<&str>,
    options: &TransformOptions,
) -> Option<StyleToken> {
    let token = structural_default(&element.name, parent);
    let token = class_override(token, element.attr("class"), options);
    alignment_override(token, element.attr("style"))
}

/// Tier 1: style implied by the tag itself
pub fn structural_default(tag: &str, parent: Option<&str>) -> Option<StyleToken> {
    match tag.to_ascii_lowercase().as_str() {
        "h1" => Some(StyleToken::Heading(1)),
        "h2" => Some(StyleToken::Heading(2)),
        "h3" => Some(StyleToken::Heading(3)),
        "h4" => Some(StyleToken::Heading(4)),
        "h5" => Some(StyleToken::Heading(5)),
        "h6" => Some(StyleToken::Heading(6)),
        "p" if parent.is_some_and(|p| p.eq_ignore_ascii_case("blockquote")) => {
            Some(StyleToken::Quote)
        }
        "pre" => Some(StyleToken::Pre),
        "p" => Some(StyleToken::Paragraph),
        _ => None,
    }
}

/// Tier 2: a non-blank `class` attribute replaces the structural default
///
/// The literal attribute value is used as the style name, with the configured
/// prefix and suffix stripped from each class.
pub fn class_override(
    token: Option<StyleToken>,
    class: Option<&str>,
    options: &TransformOptions,
) -> Option<StyleToken> {
    match class.map(|c| strip_affixes(c, options)) {
        Some(name) if !name.is_empty() => Some(StyleToken::from(name)),
        _ => token,
    }
}

/// Tier 3: `text-align: center|left|right|justify` in the inline style wins
pub fn alignment_override(token: Option<StyleToken>, inline_style: Option<&str>) -> Option<StyleToken> {
    inline_style
        .and_then(|style| TEXT_ALIGN.captures(style))
        .and_then(|caps| Alignment::from_keyword(&caps[1]))
        .map(StyleToken::Align)
        .or(token)
}

/// Strip the configured prefix and suffix from every class in a class list
pub fn strip_affixes(classes: &str, options: &TransformOptions) -> String {
    classes
        .split_whitespace()
        .map(|original| {
            let class = options
                .remove_class_prefix
                .as_deref()
                .filter(|prefix| !prefix.is_empty())
                .and_then(|prefix| original.strip_prefix(prefix))
                .unwrap_or(original);
            let class = options
                .remove_class_suffix
                .as_deref()
                .filter(|suffix| !suffix.is_empty())
                .and_then(|suffix| class.strip_suffix(suffix))
                .unwrap_or(class);
            // a class consisting only of affixes is kept as written
            if class.is_empty() {
                original
            } else {
                class
            }
        })
        .join(" ")
}
