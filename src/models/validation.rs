// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Admission rules for candidate files: MIME allow-list and size ceiling.
//!
//! The two predicates are exposed separately so callers can report which check
//! failed; [`ValidationRule::check`] composes them for the common case.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::candidate::CandidateFile;
use crate::models::severity::Severity;
use crate::utils::format_size;

/// Page-supplied admission configuration. Never mutated by the staging core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    pub allowed_mime_types: BTreeSet<String>,
    pub max_size_bytes: u64,
}

/// Reason a candidate file was refused admission.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("'{name}' is not a supported file type ({mime_type})")]
    UnsupportedType { name: String, mime_type: String },

    #[error("'{name}' is too large ({size}, limit {limit})", size = human(.size_bytes), limit = human(.max_size_bytes))]
    SizeExceeded {
        name: String,
        size_bytes: u64,
        max_size_bytes: u64,
    },
}

impl AdmissionError {
    /// Severity of the notification that should surface this rejection.
    pub fn severity(&self) -> Severity {
        match self {
            AdmissionError::UnsupportedType { .. } => Severity::Danger,
            AdmissionError::SizeExceeded { .. } => Severity::Warning,
        }
    }
}

impl ValidationRule {
    pub fn new<I, S>(allowed_mime_types: I, max_size_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_mime_types: allowed_mime_types
                .into_iter()
                .map(|m| mime_essence(m.as_ref()))
                .collect(),
            max_size_bytes,
        }
    }

    /// Check type first, then size.
    pub fn check(&self, file: &CandidateFile) -> Result<(), AdmissionError> {
        if !is_allowed_type(file, &self.allowed_mime_types) {
            return Err(AdmissionError::UnsupportedType {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            });
        }
        if !is_within_size_limit(file, self.max_size_bytes) {
            return Err(AdmissionError::SizeExceeded {
                name: file.name.clone(),
                size_bytes: file.size_bytes,
                max_size_bytes: self.max_size_bytes,
            });
        }
        Ok(())
    }

    /// Filename extensions matching the allow-list, for native picker filters.
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut exts: Vec<&'static str> = self
            .allowed_mime_types
            .iter()
            .filter_map(|m| mime_guess::get_mime_extensions_str(m))
            .flat_map(|list| list.iter().copied())
            .collect();
        exts.sort_unstable();
        exts.dedup();
        exts
    }
}

/// True iff the file's declared MIME type is in the allow-list.
///
/// Parameters (`; charset=...`) are ignored and the comparison is ASCII case-insensitive.
pub fn is_allowed_type(file: &CandidateFile, allowed_types: &BTreeSet<String>) -> bool {
    let essence = mime_essence(&file.mime_type);
    allowed_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
}

/// True iff the file's declared size does not exceed `max_size_bytes`.
pub fn is_within_size_limit(file: &CandidateFile, max_size_bytes: u64) -> bool {
    file.size_bytes <= max_size_bytes
}

fn human(bytes: &u64) -> String {
    format_size(*bytes)
}

fn mime_essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_rule(max: u64) -> ValidationRule {
        ValidationRule::new(["application/pdf"], max)
    }

    #[test]
    fn predicates_are_independent() {
        let rule = pdf_rule(1_000);
        let big_pdf = CandidateFile::new("big.pdf", 5_000, "application/pdf");
        let small_txt = CandidateFile::new("notes.txt", 10, "text/plain");

        assert!(is_allowed_type(&big_pdf, &rule.allowed_mime_types));
        assert!(!is_within_size_limit(&big_pdf, rule.max_size_bytes));
        assert!(!is_allowed_type(&small_txt, &rule.allowed_mime_types));
        assert!(is_within_size_limit(&small_txt, rule.max_size_bytes));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let at_limit = CandidateFile::new("a.pdf", 1_000, "application/pdf");
        assert!(is_within_size_limit(&at_limit, 1_000));
        assert!(!is_within_size_limit(&at_limit, 999));
    }

    #[test]
    fn predicates_are_pure() {
        let rule = pdf_rule(1_000);
        let file = CandidateFile::new("a.pdf", 10, "application/pdf");
        let snapshot = file.clone();
        for _ in 0..3 {
            assert!(is_allowed_type(&file, &rule.allowed_mime_types));
            assert!(is_within_size_limit(&file, rule.max_size_bytes));
        }
        assert_eq!(file, snapshot);
    }

    #[test]
    fn mime_parameters_and_case_are_ignored() {
        let rule = pdf_rule(1_000);
        let file = CandidateFile::new("a.pdf", 10, "Application/PDF; version=1.7");
        assert!(rule.check(&file).is_ok());
    }

    #[test]
    fn check_reports_which_rule_failed() {
        let rule = pdf_rule(100);

        let wrong_type = CandidateFile::new("photo.png", 10_000, "image/png");
        let err = rule.check(&wrong_type).unwrap_err();
        assert!(matches!(err, AdmissionError::UnsupportedType { .. }));
        assert_eq!(err.severity(), Severity::Danger);

        let too_big = CandidateFile::new("scan.pdf", 2_048, "application/pdf");
        let err = rule.check(&too_big).unwrap_err();
        assert_eq!(err.severity(), Severity::Warning);
        assert_eq!(err.to_string(), "'scan.pdf' is too large (2 KB, limit 100 Bytes)");
    }

    #[test]
    fn extensions_follow_allow_list() {
        let rule = ValidationRule::new(["application/pdf", "image/png"], 1);
        let exts = rule.extensions();
        assert!(exts.contains(&"pdf"));
        assert!(exts.contains(&"png"));
        assert!(!exts.contains(&"docx"));
    }

    #[test]
    fn rule_serializes_camel_case() {
        let json = serde_json::to_string(&pdf_rule(16)).unwrap();
        assert!(json.contains("allowedMimeTypes"));
        assert!(json.contains("maxSizeBytes"));
    }
}
