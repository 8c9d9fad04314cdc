// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! User-supplied file handles and their declared metadata (UI-agnostic).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// A file offered by the user through the picker or a drop.
///
/// Only declared metadata is kept; contents are never read here. Staged entries
/// share the record through an `Arc` instead of copying it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateFile {
    /// Location on disk, when the platform exposes one.
    pub path: Option<PathBuf>,
    /// Display filename.
    pub name: String,
    /// Declared size in bytes.
    pub size_bytes: u64,
    /// Declared MIME type.
    pub mime_type: String,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, mime_type: impl Into<String>) -> Self {
        Self {
            path: None,
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Attach the on-disk location the file was observed at.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Observe a picked path: size from filesystem metadata, type guessed from the name.
    ///
    /// # Errors
    ///
    /// Returns an error when the metadata cannot be read or the path is not a regular file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
        if !metadata.is_file() {
            bail!("Not a regular file: {}", path.display());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = guess_mime(path);
        Ok(Self::new(name, metadata.len(), mime).with_path(path.to_path_buf()))
    }
}

/// Guess a MIME type from a filename extension, falling back to `application/octet-stream`.
pub fn guess_mime(path: impl AsRef<Path>) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
