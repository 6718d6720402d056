//! Report generation
//!
//! A [`Report`] couples a template with the placeholders and style requests
//! registered for it. Generation patches each content part of the template in
//! a fixed order:
//!
//! 1. requested styles are injected into the part's style catalog
//! 2. sections, then tables, are expanded
//! 3. rich-text fields, scalar fields and bookmarks are filled
//!
//! The template itself is never modified; every pass parses fresh trees.

use crate::error::ReportError;
use crate::placeholder::{PlaceholderSet, RowItem, Table};
use crate::reader::{BookmarkReader, Extraction, SectionReader};
use crate::rich_text::TransformOptions;
use crate::style::{self, ListKind, StyleToken};
use crate::template::Template;
use std::collections::BTreeMap;
use std::path::Path;

/// A template plus everything to fill into it
pub struct Report {
    template: Template,
    placeholders: PlaceholderSet,
    styles: Vec<StyleToken>,
}

impl Report {
    /// Create a report over a template already in memory
    pub fn new(template: Template) -> Self {
        Self {
            template,
            placeholders: PlaceholderSet::new(),
            styles: Vec::new(),
        }
    }

    /// Create a report over a template file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        Ok(Self::new(Template::open(path)?))
    }

    /// Placeholders registered at report level
    pub fn placeholders(&self) -> &PlaceholderSet {
        &self.placeholders
    }

    /// Style tokens requested so far, in request order
    pub fn styles(&self) -> &[StyleToken] {
        &self.styles
    }

    /// Set the rich-text options inherited by every text, row and section
    pub fn set_rich_text_options(&mut self, options: TransformOptions) {
        self.placeholders.set_rich_text_options(options);
    }

    /// Replace `[NAME]` tokens and named field markers with `value`
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.placeholders.add_field(name, value);
    }

    /// Replace the `[NAME]` paragraph with converted HTML
    pub fn add_text(&mut self, name: impl Into<String>, markup: impl Into<String>) {
        self.placeholders.add_text(name, markup);
    }

    /// Like [`Report::add_text`] with options for this text only
    pub fn add_text_with(
        &mut self,
        name: impl Into<String>,
        markup: impl Into<String>,
        options: TransformOptions,
    ) {
        self.placeholders.add_text_with(name, markup, options);
    }

    /// Insert `value` at a bookmark, replacing the text of a bookmark range
    pub fn add_bookmark(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.placeholders.add_bookmark(name, value);
    }

    /// Repeat the rows of a named table once per item
    pub fn add_table(&mut self, name: impl Into<String>, rows: Vec<Box<dyn RowItem>>) -> &mut Table {
        self.placeholders.add_table(name, rows)
    }

    /// Repeat the rows of a named table once per item of a typed collection
    ///
    /// # Example
    /// ```no_run
    /// # use odfreport::Report;
    /// let mut report = Report::open("invoice.odt")?;
    /// let lines = vec![("Pen", 2), ("Ink", 1)];
    /// report
    ///     .add_table_with("Lines", lines, |(item, qty), row| {
    ///         row.add_field("item", *item);
    ///         row.add_field("qty", qty.to_string());
    ///     })
    ///     .header(true);
    /// report.generate_to("invoice-filled.odt")?;
    /// # Ok::<(), odfreport::ReportError>(())
    /// ```
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
        self.placeholders.add_table_with(name, items, build)
    }

    /// Repeat a named section once per item
    pub fn add_section(&mut self, name: impl Into<String>, items: Vec<Box<dyn RowItem>>) {
        self.placeholders.add_section(name, items);
    }

    /// Repeat a named section once per item of a typed collection
    pub fn add_section_with<T, F>(
        &mut self,
        name: impl Into<String>,
        items: impl IntoIterator<Item = T>,
        build: F,
    ) where
        T: 'static,
        F: Fn(&T, &mut PlaceholderSet) + 'static,
    {
        self.placeholders.add_section_with(name, items, build);
    }

    /// Request a style definition for generated markup
    ///
    /// A style whose name was already requested is ignored.
    pub fn add_style(&mut self, style: impl Into<StyleToken>) {
        let style = style.into();
        if self.styles.iter().any(|s| s.name() == style.name()) {
            log::warn!("Style '{}' requested more than once, ignoring", style);
            return;
        }
        self.styles.push(style);
    }

    /// Request several styles at once
    pub fn add_styles<S: Into<StyleToken>>(&mut self, styles: impl IntoIterator<Item = S>) {
        for style in styles {
            self.add_style(style);
        }
    }

    /// Request a `ul` or `ol` list style
    pub fn add_list_style(&mut self, kind: ListKind) {
        self.add_style(StyleToken::List(kind));
    }

    /// Produce the filled document
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The patched ODF package
    /// * `Err(ReportError)` - The template is unusable or a rich-text value is malformed
    pub fn generate(&self) -> Result<Vec<u8>, ReportError> {
        let data = self.template.update_content(|part, doc| {
            let mut injected = 0;
            for token in &self.styles {
                if style::inject(&mut doc.root, token) {
                    injected += 1;
                }
            }
            log::debug!("{}: injected {} of {} styles", part, injected, self.styles.len());
            self.placeholders.apply(&mut doc.root)
        })?;
        log::info!("Generated document ({} bytes)", data.len());
        Ok(data)
    }

    /// Produce the filled document and write it to `path`
    pub fn generate_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        let path = path.as_ref();
        let data = self.generate()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }

    /// Read bookmark and section texts from the template
    ///
    /// # Returns
    /// Extractions keyed by content part stem (`content`, `styles`)
    pub fn extract(
        &self,
        bookmarks: &[BookmarkReader],
        sections: &[SectionReader],
    ) -> Result<BTreeMap<String, Extraction>, ReportError> {
        let mut results = BTreeMap::new();
        self.template.read_content(|part, doc| {
            let key = Path::new(part)
                .file_stem()
                .map_or_else(|| part.to_string(), |stem| stem.to_string_lossy().into_owned());
            let extraction = Extraction {
                sections: sections.iter().flat_map(|r| r.read(&doc.root)).collect(),
                bookmarks: bookmarks.iter().flat_map(|r| r.read(&doc.root)).collect(),
            };
            results.insert(key, extraction);
            Ok(())
        })?;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_styles_are_ignored() {
        let mut report = Report::new(Template::from_bytes(Vec::new()));
        report.add_styles(["bold", "h1", "bold"]);
        report.add_style(StyleToken::Bold);
        report.add_list_style(ListKind::Ordered);
        report.add_style("ol");

        let names: Vec<_> = report.styles().iter().map(StyleToken::name).collect();
        assert_eq!(names, ["bold", "h1", "ol"]);
    }

    #[test]
    fn test_generate_fails_on_invalid_template() {
        let report = Report::new(Template::from_bytes(b"not a zip".to_vec()));
        assert!(matches!(report.generate(), Err(ReportError::Zip(_))));
    }
}
