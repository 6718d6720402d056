//! Report job description loaded from TOML
//!
//! A job file names the template and output, requests styles, and lists the
//! values for every placeholder:
//!
//! ```toml
//! template = "invoice.odt"
//! output = "invoice-filled.odt"
//! styles = ["h1", "bold", "ul"]
//!
//! [rich_text]
//! remove_classes = ["internal"]
//! remove_class_prefix = "ql-"
//!
//! [fields]
//! client = "ACME Corp"
//!
//! [texts]
//! notes = "<p>Paid <b>in full</b></p>"
//!
//! [bookmarks]
//! date = "2026-10-16"
//!
//! [[tables]]
//! name = "Lines"
//! header = true
//! csv = "lines.csv"
//!
//! [[sections]]
//! name = "Contact"
//! rich_text = ["bio"]
//! rows = [{ name = "Ada", bio = "<p>Engineer</p>" }]
//! ```

use crate::placeholder::PlaceholderSet;
use crate::report::Report;
use crate::rich_text::TransformOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Values of one row, keyed by placeholder name
pub type RowValues = BTreeMap<String, toml::Value>;

/// A report job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Template file, relative to the job file
    pub template: Option<PathBuf>,

    /// Output file, relative to the job file
    pub output: Option<PathBuf>,

    /// Style names to inject into the template
    pub styles: Vec<String>,

    /// Options for every rich-text value in the job
    pub rich_text: TransformOptions,

    /// Scalar fields
    pub fields: RowValues,

    /// Rich-text fields (HTML)
    pub texts: BTreeMap<String, String>,

    /// Bookmark values
    pub bookmarks: RowValues,

    /// Repeated tables
    pub tables: Vec<CollectionConfig>,

    /// Repeated sections
    pub sections: Vec<CollectionConfig>,
}

/// Rows bound to a table or section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Table or section name in the template
    pub name: String,

    /// Inline rows
    pub rows: Vec<RowValues>,

    /// CSV file with a header row; its rows follow the inline rows
    pub csv: Option<PathBuf>,

    /// Row keys whose values are HTML
    pub rich_text: Vec<String>,

    /// Keep the first table row as a header
    pub header: bool,

    /// Remove the table when there are no rows
    pub skip_if_empty: bool,
}

impl ReportConfig {
    /// Load a job from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the job file
    ///
    /// # Returns
    /// * `Ok(ReportConfig)` - Successfully loaded job
    /// * `Err(ReportConfigError)` - Error reading or parsing the job file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReportConfigError> {
        let content = fs::read_to_string(&path).map_err(ReportConfigError::IoError)?;
        Self::parse(&content)
    }

    /// Parse a job from TOML text
    pub fn parse(content: &str) -> Result<Self, ReportConfigError> {
        toml::from_str(content).map_err(ReportConfigError::ParseError)
    }

    /// Template path resolved against `base_dir`
    pub fn template_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.template.as_deref().map(|p| resolve(base_dir, p))
    }

    /// Output path resolved against `base_dir`
    pub fn output_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.output.as_deref().map(|p| resolve(base_dir, p))
    }

    /// Register everything in the job on `report`
    ///
    /// # Parameters
    /// * `report` - Report to populate
    /// * `base_dir` - Directory that relative CSV paths are resolved against
    ///
    /// # Returns
    /// * `Ok(())` - All placeholders registered
    /// * `Err(ReportConfigError)` - A CSV file could not be read
    pub fn apply(&self, report: &mut Report, base_dir: &Path) -> Result<(), ReportConfigError> {
        report.set_rich_text_options(self.rich_text.clone());
        report.add_styles(self.styles.iter().map(String::as_str));

        for (name, value) in &self.fields {
            report.add_field(name, value_text(value));
        }
        for (name, markup) in &self.texts {
            report.add_text(name, markup.as_str());
        }
        for (name, value) in &self.bookmarks {
            report.add_bookmark(name, value_text(value));
        }

        for table in &self.tables {
            let rows = table.load_rows(base_dir)?;
            log::debug!("Table '{}': {} rows", table.name, rows.len());
            let rich_text = table.rich_text.clone();
            report
                .add_table_with(&table.name, rows, move |row, scope| {
                    fill_row(row, &rich_text, scope)
                })
                .header(table.header)
                .skip_if_empty(table.skip_if_empty);
        }

        for section in &self.sections {
            let rows = section.load_rows(base_dir)?;
            log::debug!("Section '{}': {} repetitions", section.name, rows.len());
            let rich_text = section.rich_text.clone();
            report.add_section_with(&section.name, rows, move |row, scope| {
                fill_row(row, &rich_text, scope)
            });
        }

        Ok(())
    }
}

impl CollectionConfig {
    /// Inline rows followed by CSV rows, as text
    pub fn load_rows(&self, base_dir: &Path) -> Result<Vec<BTreeMap<String, String>>, ReportConfigError> {
        let mut rows: Vec<BTreeMap<String, String>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(key, value)| (key.clone(), value_text(value)))
                    .collect()
            })
            .collect();

        if let Some(csv_path) = &self.csv {
            let path = resolve(base_dir, csv_path);
            rows.extend(read_csv(&path).map_err(|e| ReportConfigError::CsvError(path, e))?);
        }
        Ok(rows)
    }
}

fn fill_row(row: &BTreeMap<String, String>, rich_text: &[String], scope: &mut PlaceholderSet) {
    for (key, value) in row {
        if rich_text.contains(key) {
            scope.add_text(key, value.as_str());
        } else {
            scope.add_field(key, value.as_str());
        }
    }
}

fn read_csv(path: &Path) -> Result<Vec<BTreeMap<String, String>>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// TOML strings are taken verbatim, anything else in its TOML form
fn value_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Errors that can occur when loading a report job
#[derive(Debug)]
pub enum ReportConfigError {
    /// Error reading the job file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error reading a CSV row source
    CsvError(PathBuf, csv::Error),
}

impl std::fmt::Display for ReportConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ReportConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ReportConfigError::CsvError(path, e) => {
                write!(f, "CSV error in {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ReportConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportConfigError::IoError(e) => Some(e),
            ReportConfigError::ParseError(e) => Some(e),
            ReportConfigError::CsvError(_, e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const JOB: &str = r#"
template = "templates/letter.odt"
output = "/tmp/out.odt"
styles = ["h1", "bold"]

[rich_text]
remove_classes = ["internal"]

[fields]
client = "ACME"
count = 3

[texts]
body = "<p>Hi</p>"

[[tables]]
name = "Lines"
header = true
csv = "lines.csv"
rows = [{ item = "Pen", qty = 2 }]
"#;

    #[test]
    fn test_parse_job() {
        let config = ReportConfig::parse(JOB).unwrap();
        assert_eq!(config.styles, ["h1", "bold"]);
        assert_eq!(config.rich_text.remove_classes, ["internal"]);
        assert_eq!(value_text(&config.fields["count"]), "3");
        assert_eq!(config.tables.len(), 1);
        assert!(config.tables[0].header);
        assert!(!config.tables[0].skip_if_empty);
        assert!(config.sections.is_empty());

        let base = Path::new("/jobs");
        assert_eq!(
            config.template_path(base),
            Some(PathBuf::from("/jobs/templates/letter.odt"))
        );
        assert_eq!(config.output_path(base), Some(PathBuf::from("/tmp/out.odt")));
    }

    #[test]
    fn test_rows_combine_inline_and_csv() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lines.csv"), "item,qty\nInk,1\nPad,4\n").unwrap();

        let config = ReportConfig::parse(JOB).unwrap();
        let rows = config.tables[0].load_rows(dir.path()).unwrap();

        let items: Vec<_> = rows.iter().map(|row| row["item"].as_str()).collect();
        assert_eq!(items, ["Pen", "Ink", "Pad"]);
        assert_eq!(rows[0]["qty"], "2");
        assert_eq!(rows[2]["qty"], "4");
    }

    #[test]
    fn test_missing_csv_is_reported_with_its_path() {
        let dir = TempDir::new().unwrap();
        let config = ReportConfig::parse(JOB).unwrap();
        let err = config.tables[0].load_rows(dir.path()).unwrap_err();
        assert!(matches!(err, ReportConfigError::CsvError(ref path, _) if path.ends_with("lines.csv")));
        assert!(err.to_string().contains("lines.csv"));
    }

    #[test]
    fn test_load_reports_missing_file_and_bad_toml() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ReportConfig::load(dir.path().join("missing.toml")),
            Err(ReportConfigError::IoError(_))
        ));

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "styles = [").unwrap();
        assert!(matches!(
            ReportConfig::load(&bad),
            Err(ReportConfigError::ParseError(_))
        ));
    }
}
