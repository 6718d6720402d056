//! List style definitions for `ul` / `ol`

use super::token::ListKind;
use crate::xml::Element;

/// Number of nesting levels defined per list style
pub const LIST_LEVELS: u8 = 10;

/// Indentation step per level, in centimetres
const INDENT_STEP_CM: f64 = 0.635;

const BULLET_CHAR: &str = "\u{2022}";

/// Build a `text:list-style` with one level style per nesting level
pub fn list_style(kind: ListKind) -> Element {
    let mut style = Element::new("text:list-style").with_attr("style:name", kind.as_str());
    for level in 1..=LIST_LEVELS {
        style.push(level_style(kind, level));
    }
    style
}

fn level_style(kind: ListKind, level: u8) -> Element {
    let el = match kind {
        ListKind::Unordered => Element::new("text:list-level-style-bullet")
            .with_attr("text:level", level.to_string())
            .with_attr("text:bullet-char", BULLET_CHAR),
        ListKind::Ordered => Element::new("text:list-level-style-number")
            .with_attr("text:level", level.to_string())
            .with_attr("style:num-suffix", ".")
            .with_attr("style:num-format", "1"),
    };

    let margin = format!("{:.3}cm", INDENT_STEP_CM * f64::from(level));
    let alignment = Element::new("style:list-level-label-alignment")
        .with_attr("text:label-followed-by", "listtab")
        .with_attr("text:list-tab-stop-position", margin.clone())
        .with_attr("fo:text-indent", format!("-{:.3}cm", INDENT_STEP_CM))
        .with_attr("fo:margin-left", margin);
    let properties = Element::new("style:list-level-properties")
        .with_attr("text:list-level-position-and-space-mode", "label-alignment")
        .with_children([alignment.into()]);

    el.with_children([properties.into()])
}
