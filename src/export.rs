//! Saving rendered word clouds to disk

use crate::render::RenderResult;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `wordcloud-20261019-142501.png`
pub fn default_file_name(now: DateTime<Local>) -> String {
    format!("wordcloud-{}.png", now.format("%Y%m%d-%H%M%S"))
}

/// Appends `.png` unless the path already ends in it (case-insensitive)
pub fn with_png_extension(path: PathBuf) -> PathBuf {
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if is_png {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".png");
        PathBuf::from(name)
    }
}

/// Create the directory the save dialog opens in. Failure is logged; the
/// dialog still opens, just not in that directory.
pub fn prepare_export_dir(dir: &Path) -> bool {
    match std::fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Failed to create export directory");
            false
        }
    }
}

/// Write the PNG bytes of a render, returning the final path
pub fn save_png(path: &Path, result: &RenderResult) -> Result<PathBuf, ExportError> {
    let path = with_png_extension(path.to_path_buf());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&path, &result.png).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = result.png.len(), "Word cloud exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::{Rgba, RgbaImage};

    #[test]
    fn file_name_is_timestamped() {
        let now = Local.with_ymd_and_hms(2026, 10, 19, 14, 25, 1).unwrap();
        assert_eq!(default_file_name(now), "wordcloud-20261019-142501.png");
    }

    #[test]
    fn png_extension_is_enforced() {
        assert_eq!(with_png_extension("a/cloud".into()), PathBuf::from("a/cloud.png"));
        assert_eq!(with_png_extension("cloud.PNG".into()), PathBuf::from("cloud.PNG"));
        assert_eq!(with_png_extension("cloud.jpg".into()), PathBuf::from("cloud.jpg.png"));
    }

    #[test]
    fn saves_exact_png_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            RenderResult::from_image(RgbaImage::from_pixel(8, 4, Rgba([1, 2, 3, 255]))).unwrap();
        let path = save_png(&dir.path().join("nested").join("cloud"), &result).unwrap();
        assert_eq!(path, dir.path().join("nested").join("cloud.png"));
        assert_eq!(std::fs::read(&path).unwrap(), result.png);
    }

    #[test]
    fn export_dir_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports").join("clouds");
        assert!(prepare_export_dir(&target));
        assert!(target.is_dir());

        // A regular file in the way cannot become a directory
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        assert!(!prepare_export_dir(&blocker.join("clouds")));
    }
}
