//! Dataset loaders.
//!
//! Turn exported spreadsheets (one part per row) or JSON documents into a
//! [`Dataset`]. This is the external data-loading side of the grouping
//! heuristic and the only place that touches files.

use crate::error::{CliError, Result};
use partgroup_domain::{Dataset, DatasetSource, Part, PartId};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

/// Supported dataset encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// One part per line, cells separated by a delimiter
    Delimited,
    /// JSON object keyed by part id, or array of rows
    Json,
}

impl InputFormat {
    /// Pick a format from a file name: `.json` is JSON, anything else is rows.
    pub fn detect(path: &str) -> Self {
        let is_json = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            InputFormat::Json
        } else {
            InputFormat::Delimited
        }
    }
}

/// A dataset stored in a file (or piped through stdin).
#[derive(Debug, Clone)]
pub struct FileSource {
    path: String,
    format: InputFormat,
    delimiter: char,
    skip_header: bool,
}

impl FileSource {
    /// Create a source with the format detected from the path.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            format: InputFormat::detect(&path),
            path,
            delimiter: ',',
            skip_header: false,
        }
    }

    /// Force an input format.
    pub fn with_format(mut self, format: InputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the cell delimiter for row files.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Skip the first row of row files.
    pub fn with_skip_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }

    /// Input format in use.
    pub fn format(&self) -> InputFormat {
        self.format
    }

    fn read_text(&self) -> Result<String> {
        if self.path == STDIN_PATH {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        } else {
            fs::read_to_string(&self.path).map_err(|e| {
                CliError::Dataset(format!("Failed to read '{}': {}", self.path, e))
            })
        }
    }
}

impl DatasetSource for FileSource {
    type Error = CliError;

    fn load(&self) -> Result<Dataset> {
        let text = self.read_text()?;
        let dataset = match self.format {
            InputFormat::Delimited => parse_delimited(&text, self.delimiter, self.skip_header),
            InputFormat::Json => parse_json(&text)?,
        };
        tracing::info!("Loaded {} parts from {}", dataset.len(), self.describe());
        Ok(dataset)
    }

    fn describe(&self) -> String {
        if self.path == STDIN_PATH {
            "stdin".to_string()
        } else {
            format!("'{}'", self.path)
        }
    }
}

/// Parse delimited rows: one part per non-blank line, numbered from 1.
///
/// Cells are trimmed and empty cells are skipped. A cell wrapped in double
/// quotes may contain the delimiter, and `""` inside it is a literal quote.
pub fn parse_delimited(text: &str, delimiter: char, skip_header: bool) -> Dataset {
    let rows = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .skip(usize::from(skip_header))
        .map(|line| split_cells(line, delimiter));

    Dataset::from_rows(rows)
}

/// Split one line on `delimiter`, ignoring delimiters inside quotes.
fn split_cells(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                cell.push('"');
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => cells.push(std::mem::take(&mut cell)),
            c => cell.push(c),
        }
    }
    cells.push(cell);

    cells
}

/// Accepted JSON shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDataset {
    /// `{"1": ["A", "B"], "2": [...]}`
    Keyed(BTreeMap<String, Vec<Value>>),
    /// `[["A", "B"], [...]]`, numbered from 1
    Rows(Vec<Vec<Value>>),
}

/// Parse a JSON dataset.
///
/// Tokens may be strings, numbers or booleans; `null` cells are skipped.
pub fn parse_json(text: &str) -> Result<Dataset> {
    let parsed: JsonDataset = serde_json::from_str(text).map_err(|e| {
        CliError::Dataset(format!(
            "Expected an object of id -> tokens or an array of rows: {}",
            e
        ))
    })?;

    match parsed {
        JsonDataset::Keyed(map) => {
            let mut parts = Vec::with_capacity(map.len());
            for (key, cells) in map {
                let id = PartId::parse(&key).map_err(CliError::Dataset)?;
                if id.value() == 0 {
                    return Err(CliError::Dataset(format!(
                        "Part ids must be positive, got '{}'",
                        key
                    )));
                }
                parts.push(Part::new(id, tokens(cells)?));
            }
            Ok(Dataset::from_parts(parts)?)
        }
        JsonDataset::Rows(rows) => {
            let rows = rows.into_iter().map(tokens).collect::<Result<Vec<_>>>()?;
            Ok(Dataset::from_rows(rows))
        }
    }
}

fn tokens(cells: Vec<Value>) -> Result<Vec<String>> {
    cells
        .into_iter()
        .filter_map(|cell| match cell {
            Value::Null => None,
            Value::String(s) => Some(Ok(s)),
            Value::Number(n) => Some(Ok(n.to_string())),
            Value::Bool(b) => Some(Ok(b.to_string())),
            other => Some(Err(CliError::Dataset(format!(
                "Unsupported token value: {}",
                other
            )))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u64) -> PartId {
        PartId::from_value(value)
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(InputFormat::detect("parts.json"), InputFormat::Json);
        assert_eq!(InputFormat::detect("PARTS.JSON"), InputFormat::Json);
        assert_eq!(InputFormat::detect("parts.csv"), InputFormat::Delimited);
        assert_eq!(InputFormat::detect("parts"), InputFormat::Delimited);
        assert_eq!(InputFormat::detect("-"), InputFormat::Delimited);
    }

    #[test]
    fn test_parse_delimited() {
        let dataset = parse_delimited("A1,B3,C4\nA2, B3 ,\n\n\"A1\",B2\n", ',', false);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.features(id(2)).unwrap().len(), 2);
        assert!(dataset.features(id(3)).unwrap().contains("A1"));
    }

    #[test]
    fn test_quoted_cell_keeps_delimiter() {
        let dataset = parse_delimited("\"steel, galvanised\",M6\nsteel,M6\n", ',', false);
        let features = dataset.features(id(1)).unwrap();
        assert_eq!(features.len(), 2);
        assert!(features.contains("steel, galvanised"));
        assert!(features.contains("M6"));
        assert_eq!(dataset.features(id(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_doubled_quote_is_literal() {
        assert_eq!(
            split_cells("\"12\"\" pipe\";\"a;b\";plain", ';'),
            vec!["12\" pipe", "a;b", "plain"]
        );
    }

    #[test]
    fn test_parse_delimited_skip_header() {
        let dataset = parse_delimited("f1;f2\nA;B\nC;D\n", ';', true);
        assert_eq!(dataset.ids(), vec![id(1), id(2)]);
        assert!(dataset.features(id(1)).unwrap().contains("A"));
    }

    #[test]
    fn test_parse_delimited_crlf() {
        let dataset = parse_delimited("A,B\r\nC,D\r\n", ',', false);
        assert!(dataset.features(id(1)).unwrap().contains("B"));
    }

    #[test]
    fn test_parse_delimited_all_empty_row() {
        let dataset = parse_delimited("A,B\n,,\nC\n", ',', false);
        assert_eq!(dataset.len(), 3);
        assert!(dataset.features(id(2)).unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_keyed() {
        let dataset = parse_json(r#"{"3": ["X", 7, null], "10": ["A"]}"#).unwrap();
        assert_eq!(dataset.ids(), vec![id(3), id(10)]);
        let features = dataset.features(id(3)).unwrap();
        assert!(features.contains("X"));
        assert!(features.contains("7"));
        assert_eq!(features.len(), 2);
    }

    #[test]
    fn test_parse_json_rows() {
        let dataset = parse_json(r#"[["A", "B"], ["C"], []]"#).unwrap();
        assert_eq!(dataset.ids(), vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn test_parse_json_rejects_bad_ids() {
        assert!(matches!(parse_json(r#"{"x": ["A"]}"#), Err(CliError::Dataset(_))));
        assert!(matches!(parse_json(r#"{"0": ["A"]}"#), Err(CliError::Dataset(_))));
    }

    #[test]
    fn test_parse_json_rejects_nested_tokens() {
        assert!(parse_json(r#"[["A", ["B"]]]"#).is_err());
    }

    #[test]
    fn test_parse_json_rejects_other_shapes() {
        assert!(matches!(parse_json(r#""text""#), Err(CliError::Dataset(_))));
    }

    #[test]
    fn test_missing_file() {
        let source = FileSource::new("/definitely/not/here.csv");
        assert!(matches!(source.load(), Err(CliError::Dataset(_))));
    }
}
