//! Repeated sections

use super::{PatchContext, Placeholder, PlaceholderSet, RowItem};
use crate::error::ReportError;
use crate::xml::{Element, Node};

/// A `text:section` repeated once per collection item
///
/// Every copy is renamed `<name>_<n>` (n from 1) and patched with the
/// placeholders its item registers. An empty collection removes the section.
pub struct Section {
    name: String,
    items: Vec<Box<dyn RowItem>>,
}

impl Section {
    /// Create a section bound to a collection
    pub fn new(name: impl Into<String>, items: Vec<Box<dyn RowItem>>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Number of repetitions produced per template instance
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the section will be removed
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn expand(&self, template: &Element, ctx: &PatchContext<'_>) -> Result<Vec<Node>, ReportError> {
        let mut copies = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let mut copy = template.clone();
            copy.set_attr("text:name", format!("{}_{}", self.name, index + 1));

            let mut scope = PlaceholderSet::with_rich_text_options(ctx.rich_text.clone());
            item.build(&mut scope);
            scope.apply(&mut copy)?;
            copies.push(copy.into());
        }
        Ok(copies)
    }
}

impl Placeholder for Section {
    fn name(&self) -> &str {
        &self.name
    }

    fn replace(&self, root: &mut Element, ctx: &PatchContext<'_>) -> Result<(), ReportError> {
        let replaced = root.try_replace_elements(
            &mut |el: &Element| -> Result<Option<Vec<Node>>, ReportError> {
                if el.is("text:section", "text:name", &self.name) {
                    self.expand(el, ctx).map(Some)
                } else {
                    Ok(None)
                }
            },
        )?;

        if replaced == 0 {
            log::debug!("Section '{}' not found, skipping", self.name);
        }
        Ok(())
    }
}
