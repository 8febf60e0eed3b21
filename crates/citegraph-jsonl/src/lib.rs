//! Async JSONL (JSON Lines) reading and writing for citegraph record files.
//!
//! Record files are produced by the upstream download/deduplication pipeline,
//! one JSON object per line. This crate reads them resiliently (malformed
//! lines become [`Warning`]s instead of aborting the load) and writes result
//! sets back out atomically.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod warning;
pub mod writer;

pub use atomic::write_jsonl_atomic;
pub use error::{Error, Result};
pub use reader::{JsonlReader, read_jsonl_resilient};
pub use warning::Warning;
pub use writer::JsonlWriter;
