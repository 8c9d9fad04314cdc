// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Ordered collection of files staged for submission.
//!
//! Entries carry a stable [`EntryId`] assigned at insertion. Display ordinals are
//! a projection over the current order and are recomputed on every snapshot, so
//! removal controls address entries by id and a stale click can never hit the
//! wrong file.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::models::candidate::CandidateFile;

/// Opaque identity of a staged entry, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(Uuid);

impl EntryId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One staged file and its position at the time it was observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedEntry {
    pub id: EntryId,
    pub file: Arc<CandidateFile>,
    /// 0-based display position.
    pub ordinal: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StagingError {
    #[error("no staged file at position {index} (list has {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("staged file {0} was already removed")]
    UnknownEntry(EntryId),
}

/// Files the user has added, in insertion order. Duplicates are allowed.
#[derive(Clone, Debug, Default)]
pub struct StagingList {
    entries: Vec<(EntryId, Arc<CandidateFile>)>,
}

impl StagingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file. Admission checks are the caller's job.
    pub fn add(&mut self, file: impl Into<Arc<CandidateFile>>) -> StagedEntry {
        let entry = StagedEntry {
            id: EntryId::new(),
            file: file.into(),
            ordinal: self.entries.len(),
        };
        self.entries.push((entry.id, Arc::clone(&entry.file)));
        entry
    }

    /// Remove the entry currently displayed at `ordinal`.
    pub fn remove_at(&mut self, ordinal: usize) -> Result<StagedEntry, StagingError> {
        if ordinal >= self.entries.len() {
            return Err(StagingError::OutOfRange {
                index: ordinal,
                len: self.entries.len(),
            });
        }
        let (id, file) = self.entries.remove(ordinal);
        Ok(StagedEntry { id, file, ordinal })
    }

    /// Remove the entry with the given identity, wherever it currently sits.
    pub fn remove(&mut self, id: EntryId) -> Result<StagedEntry, StagingError> {
        let ordinal = self
            .entries
            .iter()
            .position(|(entry_id, _)| *entry_id == id)
            .ok_or(StagingError::UnknownEntry(id))?;
        self.remove_at(ordinal)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Point-in-time copy in insertion order with ordinals equal to position.
    pub fn to_ordered_sequence(&self) -> Vec<StagedEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(ordinal, (id, file))| StagedEntry {
                id: *id,
                file: Arc::clone(file),
                ordinal,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    /// Sum of declared sizes of all staged files.
    pub fn total_size_bytes(&self) -> u64 {
        self.entries
            .iter()
            .map(|(_, file)| file.size_bytes)
            .fold(0u64, u64::saturating_add)
    }

    /// Staged files in order, for building a submission.
    pub fn files(&self) -> Vec<Arc<CandidateFile>> {
        self.entries
            .iter()
            .map(|(_, file)| Arc::clone(file))
            .collect()
    }
}
