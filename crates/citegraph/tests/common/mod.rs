//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use citegraph::{Record, RecordSet};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path of the compiled `citegraph` binary.
pub fn citegraph_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_citegraph"))
}

/// Run the binary with colors and ambient log settings disabled.
pub fn run_citegraph(dir: &Path, args: &[&str]) -> Output {
    Command::new(citegraph_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("CITEGRAPH_MAX_WIDTH", "120")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute citegraph binary")
}

/// Write `lines` as a JSONL file named `name` inside `dir`.
pub fn write_jsonl(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).expect("Failed to write JSONL file");
    path
}

/// Four records where 0 cites 1 and 1 cites 3 by similarity; 2 is unrelated.
pub fn scenario_a_records() -> RecordSet {
    RecordSet::new(vec![
        Record::new(0, "Graph Neural Citation Networks")
            .with_authors(["Ada Lovelace", "Bob Kahn"])
            .with_year(Some(2020)),
        Record::new(1, "Graph Neural Citation Models")
            .with_authors(["Ada Lovelace", "Bob Kahn"])
            .with_year(Some(2019)),
        Record::new(2, "Medieval Poetry Archives")
            .with_authors(["Zed Quill"])
            .with_year(Some(2019)),
        Record::new(3, "Graph Citation Models Survey")
            .with_authors(["Ada Lovelace", "Bob Kahn"])
            .with_year(Some(2018)),
    ])
    .expect("scenario records are valid")
}

/// Scenario A as JSONL lines.
pub const SCENARIO_A_JSONL: [&str; 4] = [
    r#"{"title":"Graph Neural Citation Networks","authors":"Ada Lovelace; Bob Kahn","year":2020}"#,
    r#"{"title":"Graph Neural Citation Models","authors":["Ada Lovelace","Bob Kahn"],"year":"2019"}"#,
    r#"{"title":"Medieval Poetry Archives","authors":"Zed Quill","year":2019}"#,
    r#"{"title":"Graph Citation Models Survey","authors":"Ada Lovelace, Bob Kahn","year":2018}"#,
];
