// Client-side checks on a candidate upload. These only catch obviously bad
// files early; the server still has the final word and its rejections are
// shown as-is.

use crate::config::{ACCEPTED_EXTENSION, MAX_UPLOAD_BYTES, MAX_UPLOAD_MB};
use crate::error::{ClientError, ValidationError};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Convert a byte count to MiB for messages.
pub fn size_in_mb(size_bytes: u64) -> f64 {
    size_bytes as f64 / 1024.0 / 1024.0
}

/// Size in MiB rounded to two decimals for display. Halves round up:
/// 1.125 MiB shows as 1.13.
pub fn display_mb(size_bytes: u64) -> f64 {
    (size_in_mb(size_bytes) * 100.0).round() / 100.0
}

/// Pure check on a candidate's name and size. The size limit is checked
/// before the extension.
pub fn validate_candidate(filename: &str, size_bytes: u64) -> Result<(), ValidationError> {
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size_mb: display_mb(size_bytes),
            max_mb: MAX_UPLOAD_MB,
        });
    }
    if !filename.to_lowercase().ends_with(ACCEPTED_EXTENSION) {
        return Err(ValidationError::InvalidExtension);
    }
    Ok(())
}

/// A file picked by the user: its name and contents. The bytes are shared
/// so handing the file to a request does not copy the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    filename: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        SelectedFile {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Load a file from disk. The size recorded in the file's metadata is
    /// validated first so an oversize file is never read into memory.
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let io_err = |source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        };
        let meta = fs::metadata(path).map_err(io_err)?;
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        validate_candidate(&filename, meta.len())?;
        let bytes = fs::read(path).map_err(io_err)?;
        Ok(SelectedFile::new(filename, bytes))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size in MiB, rounded the way status messages show it.
    pub fn size_mb(&self) -> f64 {
        display_mb(self.size())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_candidate(&self.filename, self.size())
    }
}
