//! Atomic write operations for JSONL files.
//!
//! Data is first written to a sibling temporary file, flushed, then renamed
//! over the target path. A crash mid-write leaves the original file intact.

use crate::{JsonlWriter, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Atomically writes a sequence of values to a JSONL file.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, any value fails
/// to serialize, or the final rename fails. On failure the temporary file is
/// removed on a best-effort basis and the target path is left untouched.
///
/// # Examples
///
/// ```no_run
/// use citegraph_jsonl::write_jsonl_atomic;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let ids = vec![1_u32, 2, 3];
/// write_jsonl_atomic("ids.jsonl", &ids).await?;
/// # Ok(())
/// # }
/// ```
pub async fn write_jsonl_atomic<T, I, P>(path: P, values: I) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    let written = match write_to_temp_file(&temp_path, values).await {
        Ok(written) => written,
        Err(e) => {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    tracing::debug!(path = %path.display(), written, "Wrote JSONL file");

    Ok(written)
}

/// Appends `.tmp` to the file name (`edges.jsonl` -> `edges.jsonl.tmp`).
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

async fn write_to_temp_file<T, I>(temp_path: &Path, values: I) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = File::create(temp_path).await?;
    let mut writer = JsonlWriter::new(file);
    writer.write_all(values).await?;
    writer.flush().await?;
    Ok(writer.written())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_temp_path_with_extension() {
        let temp = make_temp_path(Path::new("/path/to/edges.jsonl"));
        assert_eq!(temp, Path::new("/path/to/edges.jsonl.tmp"));
    }

    #[test]
    fn make_temp_path_without_extension() {
        let temp = make_temp_path(Path::new("/path/to/edges"));
        assert_eq!(temp, Path::new("/path/to/edges.tmp"));
    }

    #[tokio::test]
    async fn writes_file_and_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");

        let written = write_jsonl_atomic(&path, [1_u32, 2, 3]).await.unwrap();

        assert_eq!(written, 3);
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "1\n2\n3\n");
        assert!(!make_temp_path(&path).exists());
    }

    #[tokio::test]
    async fn failed_rename_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out");
        tokio::fs::create_dir(&path).await.unwrap();
        tokio::fs::write(path.join("keep"), "x").await.unwrap();

        let result = write_jsonl_atomic(&path, [1_u32]).await;

        assert!(result.is_err());
        assert!(!make_temp_path(&path).exists());
        assert!(path.join("keep").exists());
    }
}
