//! File-backed input sources.
//!
//! Acquisition from live upstream providers is someone else's job; this
//! crate consumes their exports. Each sample source is a JSON array of
//! raw sample objects, read independently and concatenated. A source that
//! fails to read or parse is logged and skipped so one broken export does
//! not abort the run; the home history file, by contrast, is required.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::location::{HomeEntry, RawSample};

/// Read every sample source, concatenating results.
///
/// Unreadable or malformed files are skipped with a warning.
pub fn load_samples(paths: &[PathBuf]) -> Vec<RawSample> {
    let mut samples = Vec::new();
    for path in paths {
        let path = expand_tilde(path);
        match read_sample_file(&path) {
            Ok(mut file_samples) => {
                tracing::debug!(count = file_samples.len(), path = %path.display(), "read sample source");
                samples.append(&mut file_samples);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping sample source");
            }
        }
    }
    samples
}

fn read_sample_file(path: &Path) -> Result<Vec<RawSample>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Read the home history file. Errors here are fatal: the generation run
/// cannot pick a start date or fall back anywhere without it.
pub fn load_home_history(path: &Path) -> Result<Vec<HomeEntry>> {
    let raw = fs::read_to_string(expand_tilde(path))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Expand a leading `~/` using `$HOME`.
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_samples_concatenates_sources() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.json");
        let b = temp.path().join("b.json");
        fs::write(
            &a,
            r#"[{"lat": 1.0, "lon": 2.0, "accuracy": 10.0, "dt": "2020-01-01T00:00:00Z"}]"#,
        )
        .unwrap();
        fs::write(
            &b,
            r#"[{"lat": 3.0, "lon": 4.0, "accuracy": 20.0, "dt": "2020-01-02T00:00:00Z"}]"#,
        )
        .unwrap();

        let samples = load_samples(&[a, b]);
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_load_samples_skips_broken_source() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.json");
        let bad = temp.path().join("bad.json");
        let missing = temp.path().join("missing.json");
        fs::write(
            &good,
            r#"[{"lat": 1.0, "lon": 2.0, "accuracy": 10.0, "dt": "2020-01-01T00:00:00Z"}]"#,
        )
        .unwrap();
        fs::write(&bad, "not json").unwrap();

        let samples = load_samples(&[bad, missing, good]);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].lat, 1.0);
    }

    #[test]
    fn test_load_home_history_missing_is_fatal() {
        let temp = TempDir::new().unwrap();
        assert!(load_home_history(&temp.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_load_home_history() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("home.json");
        fs::write(
            &path,
            r#"[{"dt": "2020-01-01T00:00:00Z", "lat": 10.0, "lon": 20.0}]"#,
        )
        .unwrap();

        let history = load_home_history(&path).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].lat, 10.0);
    }

    #[test]
    fn test_expand_tilde() {
        std::env::set_var("HOME", "/home/tester");
        assert_eq!(
            expand_tilde(Path::new("~/data/db.json")),
            PathBuf::from("/home/tester/data/db.json")
        );
        assert_eq!(
            expand_tilde(Path::new("/abs/path.json")),
            PathBuf::from("/abs/path.json")
        );
    }
}
