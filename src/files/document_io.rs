//! Document I/O: "Save as HTML" and "Open from disk"
//!
//! Saving renders the document and hands it to the host, through a save
//! prompt when one exists and a data-URI download otherwise. Opening shows a
//! single-use picker; the chosen file is read on a background thread and the
//! result is collected with [`DocumentIo::poll_open`] once per frame.

use crate::config::ExportStrategy;
use crate::error::{Error, Result};
use crate::export::{export_html, DataUri, EXPORT_FILE_NAME, HTML_MIME};
use crate::files::host::{HostPlatform, SaveReceipt, OPEN_EXTENSIONS};
use crate::markdown::Converter;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Result of starting an open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatus {
    /// The picker was dismissed; nothing changes
    Cancelled,
    /// A file was chosen and is being read
    Reading,
    /// Another open is still in flight
    Busy,
}

/// Result of a finished read.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded { path: PathBuf, text: String },
    Failed(Error),
}

/// Single-use picker resource for one open operation.
///
/// Lives from the moment a file is chosen until its read result is
/// collected, then is dropped. Cancelled pickers are never kept.
#[derive(Debug)]
struct FilePicker {
    path: PathBuf,
    receiver: Receiver<LoadOutcome>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Document I/O
// ─────────────────────────────────────────────────────────────────────────────

/// Saves and loads the document through a [`HostPlatform`].
pub struct DocumentIo {
    host: Arc<dyn HostPlatform>,
    strategy: ExportStrategy,
    standalone: bool,
    picker: Option<FilePicker>,
}

impl DocumentIo {
    pub fn new(host: Arc<dyn HostPlatform>) -> Self {
        Self {
            host,
            strategy: ExportStrategy::default(),
            standalone: false,
            picker: None,
        }
    }

    /// Choose how exports reach the platform.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ExportStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Wrap exports in a complete HTML document.
    #[must_use]
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Save
    // ─────────────────────────────────────────────────────────────────────────

    /// Render `markdown` and save it as `export.html`.
    ///
    /// Uses the save prompt when configured and available, otherwise a
    /// data-URI download. Errors are returned for the caller to log.
    pub fn save_as_html(&self, markdown: &str, converter: &Converter) -> Result<SaveReceipt> {
        let html = export_html(markdown, converter, self.standalone);

        if self.strategy == ExportStrategy::Prompt && self.host.supports_save_prompt() {
            debug!("Exporting via save prompt");
            self.host.save_with_prompt(EXPORT_FILE_NAME, HTML_MIME, &html)
        } else {
            debug!("Exporting via download link");
            self.host.download(&DataUri::encode(&html), EXPORT_FILE_NAME)
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Open
    // ─────────────────────────────────────────────────────────────────────────

    /// Prompt for a `.md` or `.txt` file and start reading it.
    pub fn open_from_disk(&mut self) -> OpenStatus {
        if self.picker.is_some() {
            return OpenStatus::Busy;
        }

        match self.host.pick_text_file(OPEN_EXTENSIONS) {
            Some(path) => self.start_read(path),
            None => {
                debug!("Open dialog cancelled");
                OpenStatus::Cancelled
            }
        }
    }

    /// Start reading a known path without prompting (drag and drop).
    pub fn open_path(&mut self, path: PathBuf) -> OpenStatus {
        if self.picker.is_some() {
            return OpenStatus::Busy;
        }
        self.start_read(path)
    }

    fn start_read(&mut self, path: PathBuf) -> OpenStatus {
        info!("Opening file: {}", path.display());

        let (sender, receiver) = mpsc::channel();
        let fallback = sender.clone();
        let host = Arc::clone(&self.host);
        let read_path = path.clone();

        let spawned = thread::Builder::new()
            .name("markpad-file-read".to_string())
            .spawn(move || {
                let outcome = match host.read_text_file(&read_path) {
                    Ok(text) => LoadOutcome::Loaded {
                        path: read_path,
                        text,
                    },
                    Err(e) => LoadOutcome::Failed(e),
                };
                // Receiver gone means the app shut down; nothing to deliver.
                let _ = sender.send(outcome);
            });

        if let Err(e) = spawned {
            warn!("Failed to spawn file read thread: {}", e);
            let _ = fallback.send(LoadOutcome::Failed(Error::Io(e)));
        }

        self.picker = Some(FilePicker { path, receiver });
        OpenStatus::Reading
    }

    /// Collect a finished read, if any. Never blocks.
    ///
    /// The picker is released as soon as an outcome arrives, whatever it is.
    pub fn poll_open(&mut self) -> Option<LoadOutcome> {
        let picker = self.picker.as_ref()?;

        let outcome = match picker.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => LoadOutcome::Failed(Error::Application(format!(
                "Reading '{}' stopped unexpectedly",
                picker.path.display()
            ))),
        };

        self.picker = None;
        Some(outcome)
    }

    /// Whether a picker resource is alive (an open is in flight).
    pub fn has_open_picker(&self) -> bool {
        self.picker.is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
