//! Row items bound to tables and sections

use super::PlaceholderSet;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// One element of a table or section collection
///
/// `build` registers the placeholders for one repetition on a fresh scope.
pub trait RowItem {
    /// Populate the placeholders of one row
    fn build(&self, row: &mut PlaceholderSet);
}

impl<F> RowItem for F
where
    F: Fn(&mut PlaceholderSet),
{
    fn build(&self, row: &mut PlaceholderSet) {
        self(row);
    }
}

impl RowItem for BTreeMap<String, String> {
    fn build(&self, row: &mut PlaceholderSet) {
        for (name, value) in self {
            row.add_field(name.as_str(), value.as_str());
        }
    }
}

impl RowItem for HashMap<String, String> {
    fn build(&self, row: &mut PlaceholderSet) {
        for (name, value) in self {
            row.add_field(name.as_str(), value.as_str());
        }
    }
}

/// Box a homogeneous collection of row items
pub fn rows<R>(items: impl IntoIterator<Item = R>) -> Vec<Box<dyn RowItem>>
where
    R: RowItem + 'static,
{
    items
        .into_iter()
        .map(|item| Box::new(item) as Box<dyn RowItem>)
        .collect()
}

/// Pair every item with a shared builder closure
pub(crate) fn bind<T, F>(items: impl IntoIterator<Item = T>, build: F) -> Vec<Box<dyn RowItem>>
where
    T: 'static,
    F: Fn(&T, &mut PlaceholderSet) + 'static,
{
    let build = Rc::new(build);
    items
        .into_iter()
        .map(|item| {
            let build = Rc::clone(&build);
            Box::new(move |row: &mut PlaceholderSet| build(&item, row)) as Box<dyn RowItem>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_element;

    #[test]
    fn test_map_rows_register_fields() {
        let item: BTreeMap<String, String> =
            [("name".to_string(), "Ada".to_string())].into_iter().collect();
        let mut set = PlaceholderSet::new();
        item.build(&mut set);

        let mut root = parse_element("<r><text:p>[NAME]</text:p></r>").unwrap();
        set.apply(&mut root).unwrap();
        assert_eq!(root.text(), "Ada");
    }

    #[test]
    fn test_bound_items_keep_their_order() {
        let items = bind(vec![1, 2, 3], |n, row| row.add_field("n", n.to_string()));
        assert_eq!(items.len(), 3);

        let mut texts = Vec::new();
        for item in &items {
            let mut set = PlaceholderSet::new();
            item.build(&mut set);
            let mut root = parse_element("<r>[N]</r>").unwrap();
            set.apply(&mut root).unwrap();
            texts.push(root.text());
        }
        assert_eq!(texts, ["1", "2", "3"]);
    }
}
