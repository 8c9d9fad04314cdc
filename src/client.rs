// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Submission of staged files to the document-processing service.
//!
//! The service is an external collaborator. This module only fixes what is sent
//! (a multipart form per tool endpoint) and how the JSON reply is interpreted.
//! Failed calls are not retried; each failure surfaces once to the user.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::models::candidate::CandidateFile;
use crate::models::tool::Tool;

/// Everything needed to run one tool over the staged files.
#[derive(Clone, Debug)]
pub struct Submission {
    pub tool: Tool,
    pub files: Vec<Arc<CandidateFile>>,
    /// Sanitized output filename with extension.
    pub output_filename: String,
    /// Extra tool-specific form fields, e.g. `("compression_level", "high")`.
    pub options: Vec<(String, String)>,
}

/// Successful reply from the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessingOutcome {
    pub message: String,
    pub filename: String,
    /// Absolute download link for the processed document.
    pub download_url: Option<Url>,
    pub stats: OutcomeStats,
}

/// Tool-specific figures the service adds to a successful reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct OutcomeStats {
    /// Compress: formatted size before, e.g. `"2.4 MB"`.
    pub original_size: Option<String>,
    /// Compress: formatted size after.
    pub compressed_size: Option<String>,
    /// Compress: reduction, e.g. `"37.5%"`.
    pub compression_ratio: Option<String>,
    /// Split: number of documents produced.
    pub split_count: Option<u64>,
}

impl OutcomeStats {
    /// One-line summary for the success notification, if there is anything to show.
    pub fn summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        match (&self.original_size, &self.compressed_size) {
            (Some(before), Some(after)) => parts.push(format!("{before} -> {after}")),
            (Some(before), None) => parts.push(format!("was {before}")),
            (None, Some(after)) => parts.push(format!("now {after}")),
            (None, None) => {}
        }
        if let Some(ratio) = &self.compression_ratio {
            parts.push(format!("{ratio} smaller"));
        }
        if let Some(count) = self.split_count {
            parts.push(format!("{count} file(s)"));
        }
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Could not reach the processing service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{name}' has no readable location on disk")]
    MissingSource { name: String },

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response from the processing service: {0}")]
    InvalidResponse(String),
}

/// Backend seam; the UI only talks to this trait.
pub trait ProcessingClient: Send + Sync {
    fn submit(&self, submission: &Submission) -> Result<ProcessingOutcome, ClientError>;
}

/// Blocking HTTP client posting `multipart/form-data` to `{base}/{tool endpoint}`.
pub struct HttpProcessingClient {
    base: Url,
    http: reqwest::blocking::Client,
}

impl HttpProcessingClient {
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the HTTP client cannot be built.
    pub fn new(service_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base = Url::parse(service_url)?;
        // Url::join replaces the last segment unless the path ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { base, http })
    }

    pub fn endpoint(&self, tool: Tool) -> Result<Url, ClientError> {
        Ok(self.base.join(tool.endpoint())?)
    }
}

impl ProcessingClient for HttpProcessingClient {
    fn submit(&self, submission: &Submission) -> Result<ProcessingOutcome, ClientError> {
        let url = self.endpoint(submission.tool)?;
        let mut form = reqwest::blocking::multipart::Form::new()
            .text("output_filename", submission.output_filename.clone());
        for (field, value) in &submission.options {
            form = form.text(field.clone(), value.clone());
        }
        for file in &submission.files {
            let path = file.path.clone().ok_or_else(|| ClientError::MissingSource {
                name: file.name.clone(),
            })?;
            form = form
                .file(submission.tool.file_field(), &path)
                .map_err(|source| ClientError::Io { path, source })?;
        }

        info!(
            tool = submission.tool.endpoint(),
            files = submission.files.len(),
            %url,
            "submitting files"
        );
        let response = self.http.post(url).multipart(form).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        debug!(status, bytes = body.len(), "service replied");
        interpret_response(status, &body, &self.base)
    }
}

#[derive(Debug, Deserialize)]
struct ServiceReply {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    download_url: Option<String>,
    filename: Option<String>,
    error: Option<String>,
    #[serde(flatten)]
    stats: OutcomeStats,
}

/// Map a service reply (status + JSON body) to an outcome.
///
/// Relative download links are resolved against `base`.
pub fn interpret_response(
    status: u16,
    body: &str,
    base: &Url,
) -> Result<ProcessingOutcome, ClientError> {
    let reply: ServiceReply = serde_json::from_str(body).map_err(|err| {
        warn!(status, %err, "service reply is not JSON");
        if (200..300).contains(&status) {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Rejected {
                status,
                message: format!("Processing failed (HTTP {status})"),
            }
        }
    })?;

    if !(200..300).contains(&status) || !reply.success {
        let message = reply
            .error
            .or(reply.message)
            .unwrap_or_else(|| format!("Processing failed (HTTP {status})"));
        return Err(ClientError::Rejected { status, message });
    }

    let download_url = reply
        .download_url
        .map(|link| base.join(&link))
        .transpose()
        .map_err(|err| ClientError::InvalidResponse(format!("bad download_url: {err}")))?;

    let message = reply
        .message
        .unwrap_or_else(|| "Processing complete".to_string());
    let message = match reply.stats.summary() {
        Some(summary) => format!("{message} ({summary})"),
        None => message,
    };

    Ok(ProcessingOutcome {
        message,
        filename: reply.filename.unwrap_or_default(),
        download_url,
        stats: reply.stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://127.0.0.1:5000/").unwrap()
    }

    #[test]
    fn success_reply_resolves_relative_download_link() {
        let body = r#"{"success": true, "message": "PDFs merged", "download_url": "/download/abc/merged.pdf", "filename": "merged.pdf"}"#;

        let outcome = interpret_response(200, body, &base()).expect("success");

        assert_eq!(outcome.message, "PDFs merged");
        assert_eq!(outcome.filename, "merged.pdf");
        assert_eq!(
            outcome.download_url.map(|u| u.to_string()),
            Some("http://127.0.0.1:5000/download/abc/merged.pdf".to_string())
        );
    }

    #[test]
    fn compress_and_split_figures_reach_the_message() {
        let body = r#"{"success": true, "message": "PDF compressed", "download_url": "/api/pdf/download/x/c.pdf",
            "filename": "c.pdf", "original_size": "2.0 MB", "compressed_size": "1.5 MB",
            "compression_ratio": "25.0%", "size_reduction": 524288}"#;

        let outcome = interpret_response(200, body, &base()).unwrap();

        assert_eq!(outcome.stats.compression_ratio.as_deref(), Some("25.0%"));
        assert_eq!(
            outcome.message,
            "PDF compressed (2.0 MB -> 1.5 MB, 25.0% smaller)"
        );

        let body = r#"{"success": true, "message": "Split done", "filename": "s.zip", "split_count": 4}"#;
        let outcome = interpret_response(200, body, &base()).unwrap();
        assert_eq!(outcome.stats.split_count, Some(4));
        assert_eq!(outcome.message, "Split done (4 file(s))");
        assert_eq!(outcome.download_url, None);
    }

    #[test]
    fn plain_reply_has_no_figures() {
        let body = r#"{"success": true, "message": "PDFs merged"}"#;
        let outcome = interpret_response(200, body, &base()).unwrap();
        assert_eq!(outcome.stats, OutcomeStats::default());
        assert_eq!(outcome.message, "PDFs merged");
    }

    #[test]
    fn error_reply_is_rejected_with_service_message() {
        let body = r#"{"error": "At least 2 valid PDF files are required"}"#;

        match interpret_response(400, body, &base()) {
            Err(ClientError::Rejected { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "At least 2 valid PDF files are required");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_json_failure_still_reports_status() {
        let err = interpret_response(502, "<html>Bad gateway</html>", &base()).unwrap_err();
        assert_eq!(err.to_string(), "Processing failed (HTTP 502)");

        let err = interpret_response(200, "not json", &base()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[test]
    fn endpoint_joins_under_base_path() {
        let client =
            HttpProcessingClient::new("http://localhost:8080/tools", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.endpoint(Tool::PdfToWord).unwrap().as_str(),
            "http://localhost:8080/tools/pdf-to-word"
        );
    }

    #[test]
    fn default_service_url_reaches_the_pdf_api() {
        let client = HttpProcessingClient::new(
            crate::config::DEFAULT_SERVICE_URL,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(Tool::MergePdf).unwrap().as_str(),
            "http://127.0.0.1:5000/api/pdf/merge"
        );
    }

    #[test]
    fn files_without_a_path_cannot_be_submitted() {
        let client =
            HttpProcessingClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let submission = Submission {
            tool: Tool::CompressPdf,
            files: vec![Arc::new(CandidateFile::new("web.pdf", 1, "application/pdf"))],
            output_filename: "out.pdf".into(),
            options: Vec::new(),
        };

        let err = client.submit(&submission).unwrap_err();

        assert!(matches!(err, ClientError::MissingSource { .. }));
    }
}
