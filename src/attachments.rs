// src/attachments.rs

use crate::errors::{ReviewBotError, ReviewBotResult};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stable reference to a stored attachment, carried by bot messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentHandle(usize);

#[derive(Debug)]
struct StoredAttachment {
    filename: String,
    temp_path: PathBuf,
    saved_path: Option<PathBuf>,
}

/// Session-scoped storage for downloaded reply bodies.
///
/// Bodies live in a private temp directory until [`AttachmentStore::release_all`]
/// runs or the store is dropped. Copies made with [`AttachmentStore::save`]
/// are left alone.
#[derive(Debug)]
pub struct AttachmentStore {
    dir: Option<TempDir>,
    entries: Vec<StoredAttachment>,
}

impl AttachmentStore {
    pub fn new() -> ReviewBotResult<Self> {
        let dir = tempfile::Builder::new().prefix("reviewbot-").tempdir()?;
        Ok(Self {
            dir: Some(dir),
            entries: Vec::new(),
        })
    }

    pub fn stash(&mut self, bytes: &[u8], filename: &str) -> ReviewBotResult<AttachmentHandle> {
        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| ReviewBotError::attachment_error("Attachment store already released"))?;

        let index = self.entries.len();
        let temp_path = dir.path().join(format!("{}-{}", index, filename));
        fs::write(&temp_path, bytes)?;
        log::debug!("Stashed {} bytes at {}", bytes.len(), temp_path.display());

        self.entries.push(StoredAttachment {
            filename: filename.to_string(),
            temp_path,
            saved_path: None,
        });
        Ok(AttachmentHandle(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<AttachmentHandle> {
        self.entries.len().checked_sub(1).map(AttachmentHandle)
    }

    pub fn is_released(&self) -> bool {
        self.dir.is_none()
    }

    pub fn temp_path(&self, handle: AttachmentHandle) -> Option<&Path> {
        if self.is_released() {
            return None;
        }
        self.entries.get(handle.0).map(|e| e.temp_path.as_path())
    }

    pub fn saved_path(&self, handle: AttachmentHandle) -> Option<&Path> {
        self.entries.get(handle.0)?.saved_path.as_deref()
    }

    /// Copies the attachment into `dir` under its suggested filename. A
    /// second save of the same attachment reuses the first target.
    pub fn save(&mut self, handle: AttachmentHandle, dir: &Path) -> ReviewBotResult<PathBuf> {
        if self.is_released() {
            return Err(ReviewBotError::attachment_error(
                "Attachment store already released",
            ));
        }
        let entry = self
            .entries
            .get_mut(handle.0)
            .ok_or_else(|| ReviewBotError::attachment_error("Unknown attachment"))?;

        fs::create_dir_all(dir)?;
        let target = match &entry.saved_path {
            Some(path) if path.parent() == Some(dir) => path.clone(),
            _ => unique_target(dir, &entry.filename),
        };
        fs::copy(&entry.temp_path, &target)?;
        log::info!("Saved attachment to {}", target.display());

        entry.saved_path = Some(target.clone());
        Ok(target)
    }

    /// Path to hand to the system opener: the saved copy if any, otherwise
    /// the temp file.
    pub fn open_target(&self, handle: AttachmentHandle) -> ReviewBotResult<PathBuf> {
        if let Some(saved) = self.saved_path(handle) {
            return Ok(saved.to_path_buf());
        }
        self.temp_path(handle)
            .map(Path::to_path_buf)
            .ok_or_else(|| ReviewBotError::attachment_error("Attachment is not available"))
    }

    pub fn open(&self, handle: AttachmentHandle) -> ReviewBotResult<PathBuf> {
        let target = self.open_target(handle)?;
        open::that(&target)?;
        Ok(target)
    }

    /// Deletes every temp file. Saved copies are kept.
    pub fn release_all(&mut self) -> ReviewBotResult<()> {
        if let Some(dir) = self.dir.take() {
            log::debug!(
                "Releasing {} attachment(s) in {}",
                self.entries.len(),
                dir.path().display()
            );
            dir.close()?;
        }
        Ok(())
    }
}

/// `feedback.html`, then `feedback (1).html`, `feedback (2).html`, ...
fn unique_target(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let ext = path.extension().and_then(|e| e.to_str());

    (1..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
