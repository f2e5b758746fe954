//! PNG export and file delivery.
//!
//! Export reads the live rendered surface, encodes it as PNG through the
//! backend, and hands the bytes plus a suggested file name to a
//! [`FileSink`]. With nothing rendered there is nothing to export, which is
//! reported as [`ExportOutcome::NothingToExport`] rather than an error.

use crate::imaging::{BackendError, ImageBackend, Surface};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Delivery failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Bytes were handed to the sink, which stored them at `path`.
    Delivered { path: PathBuf, bytes: usize },
    /// No image is loaded.
    NothingToExport,
}

/// Receives encoded bytes and a suggested file name.
pub trait FileSink {
    /// Store the bytes and return where they ended up.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf>;
}

/// Writes exports to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadSink {
    /// Write `<dir>/<suggested name>`, creating `dir` if needed.
    Directory(PathBuf),
    /// Write to this exact path, ignoring the suggested name.
    File(PathBuf),
}

impl FileSink for DownloadSink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = match self {
            DownloadSink::Directory(dir) => {
                fs::create_dir_all(&*dir)?;
                dir.join(file_name)
            }
            DownloadSink::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                path.clone()
            }
        };
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Encode the live surface and deliver it.
pub fn export(
    backend: &impl ImageBackend,
    surface: Option<&Surface>,
    sink: &mut impl FileSink,
    file_name: &str,
) -> Result<ExportOutcome, ExportError> {
    let Some(surface) = surface else {
        log::info!("export skipped: nothing rendered");
        return Ok(ExportOutcome::NothingToExport);
    };

    let bytes = backend.encode_png(surface.pixels())?;
    let path = sink.deliver(file_name, &bytes)?;
    log::info!(
        "exported {} ({} bytes) to {}",
        surface.size(),
        bytes.len(),
        path.display()
    );
    Ok(ExportOutcome::Delivered {
        path,
        bytes: bytes.len(),
    })
}
