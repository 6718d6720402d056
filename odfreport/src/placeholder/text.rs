//! Rich-text field replacement

use super::{field_token, PatchContext, Placeholder};
use crate::error::ReportError;
use crate::rich_text::{self, TransformOptions};
use crate::xml::{Element, Node};

/// An HTML fragment that replaces the paragraph holding its `[NAME]` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    name: String,
    markup: String,
    options: Option<TransformOptions>,
}

impl Text {
    /// Create a rich-text field that uses the scope's options
    pub fn new(name: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markup: markup.into(),
            options: None,
        }
    }

    /// Use these options instead of the scope's
    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// A paragraph is the placeholder if it, or one of its spans, holds only the token
fn holds_token(p: &Element, token: &str) -> bool {
    p.children.iter().any(|child| match child {
        Node::Text(text) => text.trim() == token,
        Node::Element(span) => span.name == "text:span" && span.text().trim() == token,
    })
}

impl Placeholder for Text {
    fn name(&self) -> &str {
        &self.name
    }

    /// Replace the first placeholder paragraph with the converted fragment
    ///
    /// The fragment is converted before the search, so malformed markup is
    /// reported even when the template has no matching paragraph.
    fn replace(&self, root: &mut Element, ctx: &PatchContext<'_>) -> Result<(), ReportError> {
        let options = self.options.as_ref().unwrap_or(ctx.rich_text);
        let nodes = rich_text::transform(&self.markup, options).map_err(|source| {
            ReportError::MalformedRichText {
                name: self.name.clone(),
                source,
            }
        })?;

        let token = field_token(&self.name);
        let mut pending = Some(nodes);
        root.replace_elements(|el| {
            if pending.is_some() && el.name == "text:p" && holds_token(el, &token) {
                pending.take()
            } else {
                None
            }
        });

        if pending.is_some() {
            log::debug!("Text '{}' not found, skipping", self.name);
        }
        Ok(())
    }
}
