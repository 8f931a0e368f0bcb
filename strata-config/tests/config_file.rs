use std::fs;

use strata_config::{Config, ConfigFile, Error};
use strata_pipeline::{ExecutionMode, StageKind};
use tempfile::TempDir;

#[test]
fn test_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("strata.toml");
    fs::write(
        &path,
        "[pipeline]\nstages = [\"parse\"]\n\n[parse]\nmode = \"parallel\"\n",
    )
    .unwrap();

    let file = ConfigFile::open(&path).unwrap();

    assert_eq!(file.path(), path);
    assert!(file.content().contains("[pipeline]"));
    assert_eq!(file.config().pipeline.stages, vec![StageKind::Parse]);
    assert_eq!(file.config().parse.mode, ExecutionMode::Parallel);
}

#[test]
fn test_open_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ConfigFile::open(dir.path().join("strata.toml")).unwrap_err();
    assert!(matches!(*err, Error::Io { .. }));
}

#[test]
fn test_open_or_default_missing_file() {
    let dir = TempDir::new().unwrap();
    let file = ConfigFile::open_or_default(dir.path().join("strata.toml")).unwrap();

    assert!(file.content().is_empty());
    assert_eq!(file.into_config(), Config::default());
}

#[test]
fn test_open_or_default_keeps_parse_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("strata.toml");
    fs::write(&path, "[pipeline\n").unwrap();

    let err = ConfigFile::open_or_default(&path).unwrap_err();
    assert!(matches!(*err, Error::Parse { .. }));
}
