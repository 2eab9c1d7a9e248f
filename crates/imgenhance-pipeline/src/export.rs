// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export encoder — serialises a rendered buffer to a lossless download and
// fingerprints the bytes with SHA-256.

use std::path::{Path, PathBuf};

use imgenhance_core::ExportFormat;
use imgenhance_core::error::Result;
use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use crate::buffer::ImageBuffer;

/// An encoded image ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Download name, e.g. `enhanced-image.png`.
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    /// Lowercase hex SHA-256 of `bytes`.
    pub sha256: String,
}

impl ExportedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Write the bytes to `dir/<file_name>` and return the full path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "Export written");
        Ok(path)
    }
}

/// Encode `buffer` as `<file_stem>.<ext>` in the given lossless format.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn export(buffer: &ImageBuffer, format: ExportFormat, file_stem: &str) -> Result<ExportedImage> {
    let bytes = buffer.encode(format)?;
    let sha256 = fingerprint(&bytes);
    info!(bytes = bytes.len(), %sha256, "Image exported");
    Ok(ExportedImage {
        file_name: format!("{file_stem}.{}", format.extension()),
        format,
        bytes,
        sha256,
    })
}

/// SHA-256 of `data` as a lowercase hex string.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn fingerprint_of_empty_input() {
        assert_eq!(fingerprint(b""), EMPTY_SHA256);
    }

    #[test]
    fn export_names_file_and_matches_pixels() {
        let buffer = ImageBuffer::from_rgba(2, 1, vec![1, 2, 3, 255, 250, 251, 252, 10]).unwrap();
        let exported = export(&buffer, ExportFormat::Png, "enhanced-image").unwrap();

        assert_eq!(exported.file_name, "enhanced-image.png");
        assert_eq!(exported.mime_type(), "image/png");
        assert_eq!(exported.sha256, fingerprint(&exported.bytes));
        assert_eq!(ImageBuffer::decode(&exported.bytes).unwrap(), buffer);
    }

    #[test]
    fn export_is_deterministic() {
        let buffer = ImageBuffer::filled(4, 4, [12, 34, 56, 255]).unwrap();
        let a = export(&buffer, ExportFormat::Png, "x").unwrap();
        let b = export(&buffer, ExportFormat::Png, "x").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tiff_export_uses_tiff_extension() {
        let buffer = ImageBuffer::filled(2, 2, [0, 0, 0, 255]).unwrap();
        let exported = export(&buffer, ExportFormat::Tiff, "enhanced-image").unwrap();
        assert_eq!(exported.file_name, "enhanced-image.tiff");
        assert_eq!(ImageBuffer::decode(&exported.bytes).unwrap(), buffer);
    }

    #[test]
    fn write_to_dir_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = ImageBuffer::filled(3, 3, [200, 100, 0, 255]).unwrap();
        let exported = export(&buffer, ExportFormat::Png, "enhanced-image").unwrap();

        let path = exported.write_to_dir(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("enhanced-image.png"));
        assert_eq!(std::fs::read(&path).unwrap(), exported.bytes);
    }

    #[test]
    fn write_to_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = ImageBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap();
        let exported = export(&buffer, ExportFormat::Png, "out").unwrap();
        let err = exported.write_to_dir(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, imgenhance_core::EnhanceError::Io(_)));
    }
}
