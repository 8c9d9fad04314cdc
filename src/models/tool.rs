// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Document-processing tools offered by the backend and their admission policy.

use serde::{Deserialize, Serialize};

use crate::models::validation::ValidationRule;

const PDF: &[&str] = &["application/pdf"];
const WORD: &[&str] = &[
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
const IMAGES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/tiff",
    "image/webp",
];

/// One processing operation; each page of the client stages files for exactly one.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    #[default]
    MergePdf,
    SplitPdf,
    CompressPdf,
    PdfToWord,
    WordToPdf,
    ImageToPdf,
}

/// Split mode that sends explicit page ranges.
pub const SPLIT_BY_RANGES: &str = "ranges";
/// Repeated form field carrying one page range per value.
pub const PAGE_RANGES_FIELD: &str = "page_ranges[]";

/// A tool-specific form field with a closed set of choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolOption {
    pub field: &'static str,
    pub label: &'static str,
    pub choices: &'static [&'static str],
    pub default: &'static str,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::MergePdf,
        Tool::SplitPdf,
        Tool::CompressPdf,
        Tool::PdfToWord,
        Tool::WordToPdf,
        Tool::ImageToPdf,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::MergePdf => "Merge PDF",
            Tool::SplitPdf => "Split PDF",
            Tool::CompressPdf => "Compress PDF",
            Tool::PdfToWord => "PDF to Word",
            Tool::WordToPdf => "Word to PDF",
            Tool::ImageToPdf => "Image to PDF",
        }
    }

    /// Endpoint path relative to the service URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Tool::MergePdf => "merge",
            Tool::SplitPdf => "split",
            Tool::CompressPdf => "compress",
            Tool::PdfToWord => "pdf-to-word",
            Tool::WordToPdf => "word-to-pdf",
            Tool::ImageToPdf => "image-to-pdf",
        }
    }

    /// Multipart field name carrying the files.
    pub fn file_field(self) -> &'static str {
        match self {
            Tool::MergePdf | Tool::ImageToPdf | Tool::PdfToWord => "files[]",
            _ => "file",
        }
    }

    pub fn accepts_multiple(self) -> bool {
        self.max_files().is_none()
    }

    pub fn min_files(self) -> usize {
        match self {
            Tool::MergePdf => 2,
            _ => 1,
        }
    }

    /// Upper bound on staged files, `None` when unbounded.
    pub fn max_files(self) -> Option<usize> {
        match self {
            Tool::MergePdf | Tool::ImageToPdf => None,
            _ => Some(1),
        }
    }

    pub fn allowed_mime_types(self) -> &'static [&'static str] {
        match self {
            Tool::WordToPdf => WORD,
            Tool::ImageToPdf => IMAGES,
            _ => PDF,
        }
    }

    pub fn validation_rule(self, max_size_bytes: u64) -> ValidationRule {
        ValidationRule::new(self.allowed_mime_types(), max_size_bytes)
    }

    pub fn output_extension(self) -> &'static str {
        match self {
            Tool::PdfToWord => "docx",
            Tool::SplitPdf => "zip",
            _ => "pdf",
        }
    }

    /// Whether the selected option value asks for page ranges.
    pub fn needs_page_ranges(self, option_value: Option<&str>) -> bool {
        self == Tool::SplitPdf && option_value == Some(SPLIT_BY_RANGES)
    }

    pub fn default_output_name(self) -> &'static str {
        match self {
            Tool::MergePdf => "merged-document",
            Tool::SplitPdf => "split-pages",
            Tool::CompressPdf => "compressed",
            Tool::PdfToWord => "converted",
            Tool::WordToPdf => "converted",
            Tool::ImageToPdf => "images",
        }
    }

    pub fn option(self) -> Option<ToolOption> {
        match self {
            Tool::SplitPdf => Some(ToolOption {
                field: "split_type",
                label: "Split into",
                choices: &["pages", "ranges"],
                default: "pages",
            }),
            Tool::CompressPdf => Some(ToolOption {
                field: "compression_level",
                label: "Compression",
                choices: &["low", "medium", "high"],
                default: "medium",
            }),
            Tool::ImageToPdf => Some(ToolOption {
                field: "margin_size",
                label: "Margins",
                choices: &["none", "small", "medium", "large"],
                default: "medium",
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateFile;

    #[test]
    fn merge_needs_two_pdfs() {
        assert_eq!(Tool::MergePdf.min_files(), 2);
        assert_eq!(Tool::MergePdf.file_field(), "files[]");
        assert_eq!(Tool::SplitPdf.file_field(), "file");
        assert_eq!(Tool::SplitPdf.max_files(), Some(1));
    }

    #[test]
    fn rules_follow_tool_input_types() {
        let docx = CandidateFile::new(
            "a.docx",
            10,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        );
        assert!(Tool::WordToPdf.validation_rule(100).check(&docx).is_ok());
        assert!(Tool::MergePdf.validation_rule(100).check(&docx).is_err());

        let png = CandidateFile::new("a.png", 10, "image/png");
        assert!(Tool::ImageToPdf.validation_rule(100).check(&png).is_ok());
    }

    #[test]
    fn option_defaults_are_valid_choices() {
        for tool in Tool::ALL {
            if let Some(opt) = tool.option() {
                assert!(opt.choices.contains(&opt.default), "{tool:?}");
            }
        }
    }

    #[test]
    fn only_split_by_ranges_needs_page_ranges() {
        assert_eq!(Tool::SplitPdf.option().unwrap().default, "pages");
        assert!(Tool::SplitPdf.needs_page_ranges(Some("ranges")));
        assert!(!Tool::SplitPdf.needs_page_ranges(Some("pages")));
        assert!(!Tool::CompressPdf.needs_page_ranges(Some("ranges")));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Tool::PdfToWord).unwrap();
        assert_eq!(json, "\"pdf-to-word\"");
    }
}
