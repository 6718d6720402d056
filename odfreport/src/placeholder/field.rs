//! Scalar field replacement

use super::{text_nodes, PatchContext, Placeholder};
use crate::error::ReportError;
use crate::xml::{Element, Node};

/// Marker elements that reference a field by `text:name`
const FIELD_MARKERS: &[&str] = &["text:user-field-get", "text:variable-get"];

/// Text token for a field name: `[NAME]`, upper-cased
pub fn field_token(name: &str) -> String {
    format!("[{}]", name.to_uppercase())
}

/// A scalar value substituted for every occurrence of its field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    value: String,
}

impl Field {
    /// Create a field
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Bound value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Split every text child of `el` around the token
    fn replace_tokens(&self, el: &mut Element, token: &str) -> usize {
        if !el
            .children
            .iter()
            .any(|child| child.as_text().is_some_and(|text| text.contains(token)))
        {
            return 0;
        }

        let mut count = 0;
        let mut children = Vec::with_capacity(el.children.len());
        for child in el.children.drain(..) {
            match child {
                Node::Text(text) if text.contains(token) => {
                    for (index, piece) in text.split(token).enumerate() {
                        if index > 0 {
                            children.extend(text_nodes(&self.value));
                            count += 1;
                        }
                        if !piece.is_empty() {
                            children.push(Node::text(piece));
                        }
                    }
                }
                other => children.push(other),
            }
        }
        el.children = children;
        count
    }
}

impl Placeholder for Field {
    fn name(&self) -> &str {
        &self.name
    }

    fn replace(&self, root: &mut Element, _ctx: &PatchContext<'_>) -> Result<(), ReportError> {
        let token = field_token(&self.name);

        let mut count = 0;
        root.walk_mut(&mut |el: &mut Element| count += self.replace_tokens(el, &token));

        count += root.replace_elements(|el| {
            let is_marker = FIELD_MARKERS.contains(&el.name.as_str())
                && el.attr("text:name") == Some(self.name.as_str());
            is_marker.then(|| text_nodes(&self.value))
        });

        if count == 0 {
            log::debug!("Field '{}' not found, skipping", self.name);
        }
        Ok(())
    }
}
