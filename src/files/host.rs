//! Host platform boundary
//!
//! Everything document I/O needs from the outside world goes through the
//! [`HostPlatform`] trait: save prompts, downloads, file pickers and file
//! reads. [`NativeHost`] implements it with rfd dialogs and the file system.

use crate::error::{Error, Result};
use crate::export::DataUri;
use crate::files::dialogs::{pick_text_file_dialog, save_html_dialog};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions accepted by "Open from disk".
pub const OPEN_EXTENSIONS: &[&str] = &["md", "txt"];

/// Where a save ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveReceipt {
    /// Written to this path
    Saved(PathBuf),
    /// The user dismissed the save prompt
    Cancelled,
}

/// Platform services used by document I/O.
///
/// Implementations must be shareable with the background read thread.
pub trait HostPlatform: Send + Sync {
    /// Whether a save prompt for in-memory content is available.
    fn supports_save_prompt(&self) -> bool;

    /// Ask the user where to save `content` and write it there.
    fn save_with_prompt(&self, file_name: &str, mime: &str, content: &str) -> Result<SaveReceipt>;

    /// Follow a download link: store the URI's payload as `file_name` in
    /// the downloads location.
    fn download(&self, uri: &DataUri, file_name: &str) -> Result<SaveReceipt>;

    /// Show a file picker limited to `extensions`. `None` when cancelled.
    fn pick_text_file(&self, extensions: &[&str]) -> Option<PathBuf>;

    /// Read a file as text. Invalid UTF-8 is replaced, not rejected.
    fn read_text_file(&self, path: &Path) -> Result<String>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Native Host
// ─────────────────────────────────────────────────────────────────────────────

/// Desktop implementation backed by rfd and `std::fs`.
#[derive(Debug, Clone)]
pub struct NativeHost {
    downloads_dir: PathBuf,
}

impl Default for NativeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeHost {
    /// Use the platform downloads folder, falling back to home, then temp.
    pub fn new() -> Self {
        let downloads_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir);
        Self { downloads_dir }
    }

    /// Store downloads in a specific directory.
    pub fn with_downloads_dir(downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
        }
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }
}

impl HostPlatform for NativeHost {
    fn supports_save_prompt(&self) -> bool {
        true
    }

    fn save_with_prompt(&self, file_name: &str, mime: &str, content: &str) -> Result<SaveReceipt> {
        debug!("Save prompt for {} ({})", file_name, mime);
        let Some(path) = save_html_dialog(file_name) else {
            debug!("Save dialog cancelled");
            return Ok(SaveReceipt::Cancelled);
        };

        write_file(&path, content.as_bytes())?;
        info!("Saved HTML to: {}", path.display());
        Ok(SaveReceipt::Saved(path))
    }

    fn download(&self, uri: &DataUri, file_name: &str) -> Result<SaveReceipt> {
        let content = uri.decode()?;

        fs::create_dir_all(&self.downloads_dir).map_err(|e| Error::FileWrite {
            path: self.downloads_dir.clone(),
            source: e,
        })?;
        let path = unique_download_path(&self.downloads_dir, file_name);

        write_file(&path, content.as_bytes())?;
        info!("Downloaded HTML to: {}", path.display());
        Ok(SaveReceipt::Saved(path))
    }

    fn pick_text_file(&self, extensions: &[&str]) -> Option<PathBuf> {
        pick_text_file_dialog(extensions)
    }

    fn read_text_file(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Pick a free name in `dir`, numbering duplicates like browsers do:
/// `export.html`, `export (1).html`, `export (2).html`, ...
pub fn unique_download_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let extension = name.extension().and_then(|e| e.to_str());

    (1..)
        .map(|n| match extension {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
