//! JSONL reading operations.
//!
//! This module provides async functionality for reading JSONL files line-by-line
//! with efficient buffering and line number tracking for error reporting.

use crate::error::{Error, Result};
use crate::warning::Warning;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// One physical line pulled from the underlying reader.
enum RawLine {
    /// Non-blank UTF-8 text with the line terminator removed.
    Text(String),
    /// Whitespace-only line.
    Blank,
    /// Bytes that are not valid UTF-8.
    NotUtf8,
}

/// Async reader for JSONL (JSON Lines) data.
///
/// `JsonlReader` wraps an async reader and provides buffered reading of JSONL
/// formatted data. It tracks line numbers to provide useful context in error
/// messages when parsing fails. Blank lines are skipped.
///
/// # Examples
///
/// ```no_run
/// use citegraph_jsonl::JsonlReader;
/// use serde::Deserialize;
/// use tokio::fs::File;
///
/// #[derive(Deserialize)]
/// struct Entry {
///     title: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("records.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(entry) = reader.read_line::<Entry>().await? {
///     println!("{}", entry.title);
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
    /// Current line number (1-based counting, 0 before any lines are read) for error reporting.
    line_number: usize,
    /// Scratch buffer reused across reads.
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    ///
    /// Line numbering uses 1-based indexing: the counter starts at 0 and increments
    /// after each line is read, so the first line read is numbered 1.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buf: Vec::new(),
        }
    }

    /// Creates a new `JsonlReader` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buf: Vec::new(),
        }
    }

    /// Returns the current line number.
    ///
    /// Returns 0 before any lines have been read. After reading, returns the
    /// 1-based line number of the last line read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads and deserializes the next non-blank line.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the line is not valid JSON for `T`,
    /// [`Error::InvalidFormat`] if it is not valid UTF-8, and [`Error::Io`]
    /// if the underlying reader fails.
    pub async fn read_line<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        loop {
            match self.next_raw_line().await? {
                None => return Ok(None),
                Some(RawLine::Blank) => continue,
                Some(RawLine::NotUtf8) => {
                    return Err(Error::InvalidFormat(format!(
                        "line {} is not valid UTF-8",
                        self.line_number
                    )));
                }
                Some(RawLine::Text(text)) => {
                    return serde_json::from_str(&text)
                        .map(Some)
                        .map_err(|source| Error::Json {
                            line_number: self.line_number,
                            source,
                        });
                }
            }
        }
    }

    /// Reads every remaining line, skipping bad lines instead of failing.
    ///
    /// Lines that fail to deserialize produce [`Warning::MalformedJson`];
    /// lines that are not valid UTF-8 produce [`Warning::SkippedLine`].
    ///
    /// # Errors
    ///
    /// Only I/O failures of the underlying reader are returned as errors.
    pub async fn read_all_resilient<T: DeserializeOwned>(
        &mut self,
    ) -> Result<(Vec<T>, Vec<Warning>)> {
        let mut values = Vec::new();
        let mut warnings = Vec::new();

        while let Some(line) = self.next_raw_line().await? {
            match line {
                RawLine::Blank => {}
                RawLine::NotUtf8 => warnings.push(Warning::SkippedLine {
                    line_number: self.line_number,
                    reason: "line is not valid UTF-8".to_string(),
                }),
                RawLine::Text(text) => match serde_json::from_str(&text) {
                    Ok(value) => values.push(value),
                    Err(e) => {
                        tracing::debug!(
                            line_number = self.line_number,
                            error = %e,
                            "Skipping malformed JSONL line"
                        );
                        warnings.push(Warning::MalformedJson {
                            line_number: self.line_number,
                            error: e.to_string(),
                        });
                    }
                },
            }
        }

        Ok((values, warnings))
    }

    /// Pulls the next physical line, or `None` at end of input.
    async fn next_raw_line(&mut self) -> Result<Option<RawLine>> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }

        let Ok(text) = std::str::from_utf8(&self.buf) else {
            return Ok(Some(RawLine::NotUtf8));
        };
        let text = if self.line_number == 1 {
            text.trim_start_matches('\u{feff}')
        } else {
            text
        };

        if text.trim().is_empty() {
            Ok(Some(RawLine::Blank))
        } else {
            Ok(Some(RawLine::Text(text.to_string())))
        }
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}

/// Reads a JSONL file, collecting malformed lines as warnings.
///
/// This is the loading entry point used for record files: a single corrupt
/// line should not prevent the rest of the records from loading.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    let mut reader = JsonlReader::new(file);
    reader.read_all_resilient().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Entry {
        id: u32,
        title: String,
    }

    #[test]
    fn new_reader_starts_at_line_zero() {
        let reader = JsonlReader::new(Cursor::new(b""));
        assert_eq!(reader.line_number(), 0);
    }

    #[tokio::test]
    async fn read_line_returns_none_on_empty_input() {
        let mut reader = JsonlReader::new(Cursor::new(b"".to_vec()));
        let entry: Option<Entry> = reader.read_line().await.unwrap();
        assert!(entry.is_none());
    }

    #[tokio::test]
    async fn read_line_skips_blank_lines_and_tracks_numbers() {
        let data = b"\n{\"id\":1,\"title\":\"a\"}\n   \n{\"id\":2,\"title\":\"b\"}\n".to_vec();
        let mut reader = JsonlReader::new(Cursor::new(data));

        let first: Entry = reader.read_line().await.unwrap().unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(reader.line_number(), 2);

        let second: Entry = reader.read_line().await.unwrap().unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(reader.line_number(), 4);

        assert!(reader.read_line::<Entry>().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn read_line_handles_crlf_and_missing_trailing_newline() {
        let data = b"{\"id\":1,\"title\":\"a\"}\r\n{\"id\":2,\"title\":\"b\"}".to_vec();
        let mut reader = JsonlReader::new(Cursor::new(data));

        assert_eq!(reader.read_line::<Entry>().await.unwrap().unwrap().id, 1);
        assert_eq!(reader.read_line::<Entry>().await.unwrap().unwrap().id, 2);
    }

    #[tokio::test]
    async fn read_line_reports_line_number_on_bad_json() {
        let data = b"{\"id\":1,\"title\":\"a\"}\n{not json}\n".to_vec();
        let mut reader = JsonlReader::new(Cursor::new(data));
        reader.read_line::<Entry>().await.unwrap();

        let err = reader.read_line::<Entry>().await.unwrap_err();
        match err {
            Error::Json { line_number, .. } => assert_eq!(line_number, 2),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn leading_byte_order_mark_is_ignored() {
        let data = "\u{feff}{\"id\":7,\"title\":\"bom\"}\n".as_bytes().to_vec();
        let mut reader = JsonlReader::new(Cursor::new(data));
        let entry: Entry = reader.read_line().await.unwrap().unwrap();
        assert_eq!(entry.id, 7);
    }

    #[tokio::test]
    async fn resilient_read_collects_warnings() {
        let mut data = b"{\"id\":1,\"title\":\"a\"}\n{\"id\":\"x\"}\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        data.extend_from_slice(b"{\"id\":3,\"title\":\"c\"}\n");
        let mut reader = JsonlReader::new(Cursor::new(data));

        let (entries, warnings) = reader.read_all_resilient::<Entry>().await.unwrap();

        assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].line_number(), 2);
        assert_eq!(warnings[0].kind(), "malformed_json");
        assert_eq!(warnings[1].line_number(), 3);
        assert_eq!(warnings[1].kind(), "skipped_line");
    }
}
