//! JSONL writing operations.
//!
//! This module provides async functionality for writing data in JSONL format
//! with efficient buffering.

use crate::error::{Error, Result};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Async writer for JSONL (JSON Lines) data.
///
/// Each value is serialized to a single line followed by a newline character.
///
/// # Examples
///
/// ```no_run
/// use citegraph_jsonl::JsonlWriter;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::create("edges.jsonl").await?;
/// let mut writer = JsonlWriter::new(file);
/// writer.write(&serde_json::json!({"from": 0, "to": 1})).await?;
/// writer.flush().await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonlWriter<W> {
    /// Buffered writer wrapping the underlying async writer.
    writer: BufWriter<W>,
    /// Number of values written so far.
    written: usize,
}

impl<W: AsyncWrite + Unpin> JsonlWriter<W> {
    /// Creates a new `JsonlWriter` wrapping the given async writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Creates a new `JsonlWriter` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, writer),
            written: 0,
        }
    }

    /// Returns the number of values written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Serializes one value as a JSON line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub async fn write<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut line = serde_json::to_vec(value).map_err(|source| Error::Json {
            line_number: self.written + 1,
            source,
        })?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.written += 1;
        Ok(())
    }

    /// Serializes every value from the iterator, one per line.
    ///
    /// # Errors
    ///
    /// Stops at the first serialization or write failure.
    pub async fn write_all<T, I>(&mut self, values: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.write(&value).await?;
        }
        Ok(())
    }

    /// Flushes buffered data to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails to flush.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying buffered writer.
    ///
    /// Note: This does not flush the buffer. Call [`flush`](Self::flush)
    /// before calling this method to ensure all data is written.
    #[must_use]
    pub fn into_inner(self) -> BufWriter<W> {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::io::Cursor;

    #[derive(Serialize)]
    struct Edge {
        from: usize,
        to: usize,
    }

    #[tokio::test]
    async fn writes_one_value_per_line() {
        let mut writer = JsonlWriter::new(Cursor::new(Vec::new()));
        writer
            .write_all([Edge { from: 0, to: 1 }, Edge { from: 1, to: 2 }])
            .await
            .unwrap();
        writer.flush().await.unwrap();
        assert_eq!(writer.written(), 2);

        let bytes = writer.into_inner().into_inner().into_inner();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\"from\":0,\"to\":1}\n{\"from\":1,\"to\":2}\n");
    }

    #[tokio::test]
    async fn empty_input_writes_nothing() {
        let mut writer = JsonlWriter::new(Cursor::new(Vec::new()));
        writer.write_all(Vec::<Edge>::new()).await.unwrap();
        writer.flush().await.unwrap();
        assert!(writer.into_inner().into_inner().into_inner().is_empty());
    }
}
