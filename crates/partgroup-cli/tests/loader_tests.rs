//! Integration tests for partgroup-cli
//!
//! Loaders read temporary files and feed the grouping pipeline.

use partgroup_cli::config::OutputFormat;
use partgroup_cli::{CliError, Config, FileSource, InputFormat};
use partgroup_domain::{DatasetSource, GroupingConfig, GroupingError, GroupingPipeline, PartId};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn set(ids: &[u64]) -> BTreeSet<PartId> {
    ids.iter().copied().map(PartId::from_value).collect()
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn source(path: &PathBuf) -> FileSource {
    FileSource::new(path.to_string_lossy().into_owned())
}

#[test]
fn test_csv_file_through_pipeline() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "parts.csv",
        "attr1,attr2,attr3\nA,B,C\nA,B,D\nX,Y,Z\nX,Y,W\n",
    );

    let source = source(&path).with_skip_header(true);
    assert_eq!(source.format(), InputFormat::Delimited);

    let outcome = GroupingPipeline::new(GroupingConfig::with_seed_count(2))
        .run_from(&source)
        .unwrap();

    assert_eq!(outcome.groups.as_slice(), &[set(&[1, 2]), set(&[3, 4])]);
    assert_eq!(outcome.report.overall, 0.5);
}

#[test]
fn test_semicolon_rows() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "parts.txt", "A;B\n;;\nB;C\n");

    let dataset = source(&path).with_delimiter(';').load().unwrap();
    assert_eq!(dataset.len(), 3);
    assert!(dataset.features(PartId::from_value(2)).unwrap().is_empty());
}

#[test]
fn test_json_file_with_sparse_ids() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "parts.json",
        r#"{"10": ["A", "B", "C"], "20": ["A", "B", "D"], "30": ["X", "Y", "Z"], "40": ["X", "Y", "W"]}"#,
    );

    let source = source(&path);
    assert_eq!(source.format(), InputFormat::Json);

    let outcome = GroupingPipeline::new(GroupingConfig::with_seed_count(2))
        .run_from(&source)
        .unwrap();
    assert_eq!(outcome.groups.as_slice(), &[set(&[10, 20]), set(&[30, 40])]);
}

#[test]
fn test_forced_json_format() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "parts.data", r#"[["A"], ["B"]]"#);

    let dataset = source(&path)
        .with_format(InputFormat::Json)
        .load()
        .unwrap();
    assert_eq!(dataset.len(), 2);
}

#[test]
fn test_malformed_json_is_terminal() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", "{not json");

    assert!(matches!(source(&path).load(), Err(CliError::Dataset(_))));

    let result = GroupingPipeline::default().run_from(&source(&path));
    assert!(matches!(result, Err(GroupingError::Source(_))));
}

#[test]
fn test_single_part_file_is_insufficient() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "one.csv", "A,B,C\n");

    let result = GroupingPipeline::default().run_from(&source(&path));
    assert_eq!(result.unwrap_err(), GroupingError::InsufficientData { parts: 1 });
}

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partgroup").join("config.toml");

    let mut config = Config::default();
    config.grouping.seed_count = 3;
    config.grouping.skip_header = true;
    config.settings.format = OutputFormat::Quiet;

    let written = config.save(Some(&path)).unwrap();
    assert_eq!(written, path);
    assert_eq!(Config::load(Some(&path)).unwrap(), config);
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.toml", "[settings]\nprecision = 42\n");
    assert!(matches!(Config::load(Some(&path)), Err(CliError::Config(_))));
}
