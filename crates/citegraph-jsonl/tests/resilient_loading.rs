//! Integration tests for resilient JSONL loading from disk.

use citegraph_jsonl::{Error, Warning, read_jsonl_resilient, write_jsonl_atomic};
use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct SimpleRecord {
    title: String,
    #[serde(default)]
    year: Option<i32>,
}

#[fixture]
fn corrupted_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, r#"{{"title":"Deep learning for citation analysis","year":2020}}"#).unwrap();
    writeln!(file, r#"{{"title": "truncated"#).unwrap();
    writeln!(file).unwrap();
    writeln!(file, r#"{{"title":"Graph methods","year":null}}"#).unwrap();
    writeln!(file, "[1, 2, 3]").unwrap();
    writeln!(file, r#"{{"title":"Survey of bibliometrics"}}"#).unwrap();
    file.flush().unwrap();
    file
}

#[rstest]
#[tokio::test]
async fn valid_records_survive_corrupted_lines(corrupted_file: NamedTempFile) {
    let (records, warnings) = read_jsonl_resilient::<SimpleRecord, _>(corrupted_file.path())
        .await
        .expect("resilient load should not fail on bad lines");

    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Deep learning for citation analysis",
            "Graph methods",
            "Survey of bibliometrics"
        ]
    );
    assert_eq!(records[0].year, Some(2020));
    assert_eq!(records[1].year, None);

    let lines: Vec<_> = warnings.iter().map(Warning::line_number).collect();
    assert_eq!(lines, vec![2, 5]);
    assert!(warnings.iter().all(|w| w.kind() == "malformed_json"));
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_jsonl_resilient::<SimpleRecord, _>(dir.path().join("absent.jsonl")).await;
    assert!(matches!(result, Err(Error::Io(_))));
}

#[tokio::test]
async fn atomic_write_then_resilient_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.jsonl");
    let records = vec![
        SimpleRecord {
            title: "A".to_string(),
            year: Some(2001),
        },
        SimpleRecord {
            title: "B".to_string(),
            year: None,
        },
    ];

    write_jsonl_atomic(&path, &records).await.unwrap();
    let (loaded, warnings) = read_jsonl_resilient::<SimpleRecord, _>(&path).await.unwrap();

    assert!(warnings.is_empty());
    assert_eq!(loaded, records);
}
