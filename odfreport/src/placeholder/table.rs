//! Repeated table rows

use super::{PatchContext, Placeholder, PlaceholderSet, RowItem};
use crate::error::ReportError;
use crate::xml::{Element, Node};

const ROW: &str = "table:table-row";
const HEADER_ROWS: &str = "table:table-header-rows";

/// A `table:table` whose template rows are repeated once per collection item
///
/// Template rows are the direct `table:table-row` children of the table. With
/// several template rows, items cycle through them in order.
pub struct Table {
    name: String,
    rows: Vec<Box<dyn RowItem>>,
    header: bool,
    skip_if_empty: bool,
}

impl Table {
    /// Create a table bound to a collection
    pub fn new(name: impl Into<String>, rows: Vec<Box<dyn RowItem>>) -> Self {
        Self {
            name: name.into(),
            rows,
            header: false,
            skip_if_empty: false,
        }
    }

    /// Treat the first row as a header that is kept as-is
    ///
    /// Ignored when the table already declares `table:table-header-rows`.
    pub fn header(&mut self, header: bool) -> &mut Self {
        self.header = header;
        self
    }

    /// Remove the whole table when the collection is empty
    pub fn skip_if_empty(&mut self, skip: bool) -> &mut Self {
        self.skip_if_empty = skip;
        self
    }

    /// Number of bound rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no rows are bound
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn expand(&self, table: &mut Element, ctx: &PatchContext<'_>) -> Result<(), ReportError> {
        let has_header_rows = table.child_elements().any(|el| el.name == HEADER_ROWS);
        let skip = usize::from(self.header && !has_header_rows);

        let positions: Vec<usize> = table
            .children
            .iter()
            .enumerate()
            .filter(|(_, node)| node.as_element().is_some_and(|el| el.name == ROW))
            .map(|(index, _)| index)
            .skip(skip)
            .collect();

        let Some(&insert_at) = positions.first() else {
            log::warn!("Table '{}' has no template row, leaving it unchanged", self.name);
            return Ok(());
        };

        let templates: Vec<Element> = positions
            .iter()
            .filter_map(|&index| table.children[index].as_element().cloned())
            .collect();
        for &index in positions.iter().rev() {
            table.children.remove(index);
        }

        let mut generated = Vec::with_capacity(self.rows.len());
        for (item, template) in self.rows.iter().zip(templates.iter().cycle()) {
            let mut row = template.clone();
            let mut scope = PlaceholderSet::with_rich_text_options(ctx.rich_text.clone());
            item.build(&mut scope);
            scope.apply(&mut row)?;
            generated.push(Node::from(row));
        }
        table.children.splice(insert_at..insert_at, generated);
        Ok(())
    }
}

impl Placeholder for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn replace(&self, root: &mut Element, ctx: &PatchContext<'_>) -> Result<(), ReportError> {
        let replaced = root.try_replace_elements(
            &mut |el: &Element| -> Result<Option<Vec<Node>>, ReportError> {
                if !el.is("table:table", "table:name", &self.name) {
                    return Ok(None);
                }
                if self.skip_if_empty && self.rows.is_empty() {
                    log::debug!("Table '{}' is empty, removing it", self.name);
                    return Ok(Some(Vec::new()));
                }
                let mut table = el.clone();
                self.expand(&mut table, ctx)?;
                Ok(Some(vec![table.into()]))
            },
        )?;

        if replaced == 0 {
            log::debug!("Table '{}' not found, skipping", self.name);
        }
        Ok(())
    }
}
