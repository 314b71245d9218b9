//! Artifact persistence.
//!
//! One JSON file, human-indented, fully overwritten on every run. The
//! containing directory is created if absent. When even serialization or
//! the filesystem misbehaves, [`write_fatal`] builds the smallest possible
//! diagnostic payload by hand and tries once more — the consuming site
//! must never be left with a stale or half-written feed.

use crate::errors::FetchError;
use crate::models::ResultSet;
use chrono::Utc;
use serde_json::json;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

async fn write_text(path: &Path, contents: &str) -> Result<(), FetchError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.map_err(|e| FetchError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }
    fs::write(path, contents).await.map_err(|e| FetchError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Serialize and persist the run's result set.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_result(result: &ResultSet, path: &Path) -> Result<(), FetchError> {
    let json = serde_json::to_string_pretty(result).map_err(|e| FetchError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    write_text(path, &json).await?;
    info!(
        mode = ?result.mode,
        items = result.items.len(),
        "Wrote news feed artifact"
    );
    Ok(())
}

/// Last-resort write: a minimal `fatal-error` payload assembled without
/// going through the models, so a failure inside normal payload
/// construction cannot take this path down with it.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_fatal(path: &Path, source: &str, reason: &str) -> Result<(), FetchError> {
    error!(reason, "Writing minimal fatal-error artifact");
    let payload = json!({
        "source": source,
        "mode": "fatal-error",
        "items": [],
        "error": reason,
        "generated_at": Utc::now().to_rfc3339(),
    });
    // json! of plain strings cannot fail to serialize.
    let json = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string());
    write_text(path, &json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mode, NewsItem, ResultSet};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_result_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets/data/noticias.json");

        let rs = ResultSet::new(
            "https://www.epicentrochile.com/tag/olmue2026/",
            Mode::Api,
            vec![NewsItem {
                title: "Nota".to_string(),
                url: "https://www.epicentrochile.com/2025/12/22/nota/".to_string(),
                date: "2025-12-22T10:00:00".to_string(),
                excerpt: String::new(),
            }],
        );
        write_result(&rs, &path).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let back: ResultSet = serde_json::from_str(&contents).unwrap();
        assert_eq!(back.mode, Mode::Api);
        assert_eq!(back.items.len(), 1);
        // Human-formatted, not a single line.
        assert!(contents.contains('\n'));
    }

    #[tokio::test]
    async fn test_write_result_overwrites_previous_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noticias.json");

        let first = ResultSet::new("https://x.com/tag/t/", Mode::Api, vec![]);
        write_result(&first, &path).await.unwrap();

        let mut second = ResultSet::new("https://x.com/tag/t/", Mode::Error, vec![]);
        second.error = Some("sin respuesta".to_string());
        write_result(&second, &path).await.unwrap();

        let back: ResultSet =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.mode, Mode::Error);
        assert_eq!(back.error.as_deref(), Some("sin respuesta"));
    }

    #[tokio::test]
    async fn test_write_fatal_is_valid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noticias.json");

        write_fatal(
            &path,
            "https://www.epicentrochile.com/tag/olmue2026/",
            "panic in payload construction",
        )
        .await
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["mode"], "fatal-error");
        assert_eq!(value["items"].as_array().unwrap().len(), 0);
        assert!(value["generated_at"].as_str().is_some());

        // The fatal payload still deserializes as a regular result set.
        let back: ResultSet = serde_json::from_str(&contents).unwrap();
        assert_eq!(back.mode, Mode::FatalError);
    }

    #[tokio::test]
    async fn test_write_to_unwritable_path_is_write_error() {
        // A directory sitting where the file should go.
        let dir = tempdir().unwrap();
        let path = dir.path().to_path_buf();

        let rs = ResultSet::new("https://x.com/tag/t/", Mode::Error, vec![]);
        let err = write_result(&rs, &path).await.unwrap_err();
        assert!(matches!(err, FetchError::Write { .. }));
    }
}
