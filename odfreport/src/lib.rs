//! odfreport - fill OpenDocument templates with data
//!
//! A template is an ordinary `.odt` file containing placeholders: `[NAME]`
//! field tokens, bookmarks, named sections and named tables. A [`Report`]
//! binds values to those names and writes a filled copy of the template.
//!
//! Rich-text values are HTML fragments converted to native ODF paragraphs,
//! lists and tables by [`rich_text::transform`]; the styles they reference are
//! synthesized on request by [`style::synthesize`].

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

pub mod error;
pub mod placeholder;
pub mod reader;
pub mod report;
pub mod report_config;
pub mod rich_text;
pub mod style;
pub mod template;
pub mod xml;

pub use error::ReportError;
pub use placeholder::{rows, PlaceholderSet, RowItem};
pub use reader::{BookmarkReader, Extraction, SectionReader};
pub use report::Report;
pub use report_config::{ReportConfig, ReportConfigError};
pub use rich_text::TransformOptions;
pub use style::{ListKind, StyleToken};
pub use template::Template;
