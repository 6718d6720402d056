//! Placeholder patch engine
//!
//! A [`PlaceholderSet`] owns every placeholder registered for one scope: the
//! whole report, or one row/repetition of a table or section. Applying the set
//! to a tree runs the placeholder kinds in a fixed order so that repeated
//! containers are expanded before the fields nested inside them are filled:
//!
//! sections → tables → rich-text fields → scalar fields → bookmarks
//!
//! A placeholder whose target is absent from the tree is skipped without error.

mod bookmark;
mod field;
mod row;
mod section;
mod table;
mod text;

pub use bookmark::Bookmark;
pub use field::{field_token, Field};
pub use row::{rows, RowItem};
pub use section::Section;
pub use table::Table;
pub use text::Text;

use crate::error::ReportError;
use crate::rich_text::TransformOptions;
use crate::xml::{Element, Node};

/// Shared state passed to every placeholder during a pass
#[derive(Debug, Clone, Copy)]
pub struct PatchContext<'a> {
    /// Rich-text options used by [`Text`] placeholders without their own
    pub rich_text: &'a TransformOptions,
}

/// A named target in a template that can be patched in place
pub trait Placeholder {
    /// Name used to locate the target
    fn name(&self) -> &str;

    /// Locate every target in `root` and patch it
    ///
    /// # Returns
    /// * `Ok(())` - Targets patched, or none found
    /// * `Err(ReportError)` - The bound data is unusable (e.g. malformed rich text)
    fn replace(&self, root: &mut Element, ctx: &PatchContext<'_>) -> Result<(), ReportError>;
}

/// Ordered collections of placeholders for one scope
#[derive(Default)]
pub struct PlaceholderSet {
    fields: Vec<Field>,
    texts: Vec<Text>,
    bookmarks: Vec<Bookmark>,
    tables: Vec<Table>,
    sections: Vec<Section>,
    rich_text_options: TransformOptions,
}

impl PlaceholderSet {
    /// Create an empty set with default rich-text options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with the given rich-text options
    pub fn with_rich_text_options(options: TransformOptions) -> Self {
        Self {
            rich_text_options: options,
            ..Self::default()
        }
    }

    /// Rich-text options inherited by texts, rows and repetitions
    pub fn rich_text_options(&self) -> &TransformOptions {
        &self.rich_text_options
    }

    /// Replace the rich-text options
    pub fn set_rich_text_options(&mut self, options: TransformOptions) {
        self.rich_text_options = options;
    }

    /// Register a scalar field, replacing `[NAME]` and named field markers
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field::new(name, value));
    }

    /// Register a rich-text field using the set's rich-text options
    pub fn add_text(&mut self, name: impl Into<String>, markup: impl Into<String>) {
        self.texts.push(Text::new(name, markup));
    }

    /// Register a rich-text field with its own rich-text options
    pub fn add_text_with(
        &mut self,
        name: impl Into<String>,
        markup: impl Into<String>,
        options: TransformOptions,
    ) {
        self.texts.push(Text::new(name, markup).with_options(options));
    }

    /// Register a bookmark or bookmark range replacement
    pub fn add_bookmark(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bookmarks.push(Bookmark::new(name, value));
    }

    /// Register a table bound to prepared row items
    ///
    /// # Returns
    /// The registered table, for setting `header` / `skip_if_empty`
    pub fn add_table(&mut self, name: impl Into<String>, rows: Vec<Box<dyn RowItem>>) -> &mut Table {
        let index = self.tables.len();
        self.tables.push(Table::new(name, rows));
        &mut self.tables[index]
    }

    /// Register a table bound to a typed collection
    ///
    /// `build` is called once per item with a fresh row scope.
    pub fn add_table_with<T, F>(
        &mut self,
        name: impl Into<String>,
        items: impl IntoIterator<Item = T>,
        build: F,
    ) -> &mut Table
    where
        T: 'static,
        F: Fn(&T, &mut PlaceholderSet) + 'static,
    {
        self.add_table(name, row::bind(items, build))
    }

    /// Register a section bound to prepared row items
    pub fn add_section(&mut self, name: impl Into<String>, items: Vec<Box<dyn RowItem>>) {
        self.sections.push(Section::new(name, items));
    }

    /// Register a section bound to a typed collection
    pub fn add_section_with<T, F>(
        &mut self,
        name: impl Into<String>,
        items: impl IntoIterator<Item = T>,
        build: F,
    ) where
        T: 'static,
        F: Fn(&T, &mut PlaceholderSet) + 'static,
    {
        self.add_section(name, row::bind(items, build));
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.texts.is_empty()
            && self.bookmarks.is_empty()
            && self.tables.is_empty()
            && self.sections.is_empty()
    }

    /// Patch `root` with every registered placeholder
    ///
    /// # Parameters
    /// * `root` - Root of the tree to patch; the root itself is never replaced
    ///
    /// # Returns
    /// * `Ok(())` - Tree patched
    /// * `Err(ReportError)` - A rich-text value could not be parsed
    pub fn apply(&self, root: &mut Element) -> Result<(), ReportError> {
        let ctx = PatchContext {
            rich_text: &self.rich_text_options,
        };
        apply_all(&self.sections, root, &ctx)?;
        apply_all(&self.tables, root, &ctx)?;
        apply_all(&self.texts, root, &ctx)?;
        apply_all(&self.fields, root, &ctx)?;
        apply_all(&self.bookmarks, root, &ctx)
    }
}

fn apply_all<P: Placeholder>(
    placeholders: &[P],
    root: &mut Element,
    ctx: &PatchContext<'_>,
) -> Result<(), ReportError> {
    for placeholder in placeholders {
        placeholder.replace(root, ctx)?;
    }
    Ok(())
}

/// Convert a plain value into text nodes, turning newlines into line breaks
pub fn text_nodes(value: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (index, line) in value.split('\n').enumerate() {
        if index > 0 {
            nodes.push(Element::new("text:line-break").into());
        }
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            nodes.push(Node::text(line));
        }
    }
    nodes
}
