// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Filesystem-safe names for the processed document returned by the service.

use crate::models::tool::Tool;

/// Build the `output_filename` form value for `tool` from user input.
///
/// Blank input falls back to the tool default. The name is transliterated to
/// ASCII with `deunicode`, reduced to alphanumerics plus `-`, `_` and `.`, and
/// the tool's output extension is enforced exactly once.
pub fn output_filename(raw: &str, tool: Tool) -> String {
    let ext = tool.output_extension();
    let trimmed = raw.trim();
    let stem = strip_extension(trimmed, ext);

    let mut base = sanitize_stem(stem);
    if base.is_empty() {
        base = tool.default_output_name().to_string();
    }
    format!("{base}.{ext}")
}

fn strip_extension<'a>(name: &'a str, ext: &str) -> &'a str {
    match name.rsplit_once('.') {
        Some((stem, found)) if found.eq_ignore_ascii_case(ext) => stem,
        _ => name,
    }
}

fn sanitize_stem(value: &str) -> String {
    let ascii = deunicode::deunicode(value);
    let mut out = String::with_capacity(ascii.len());
    for ch in ascii.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.') {
            ch
        } else {
            '_'
        };
        // Collapse separator runs.
        if matches!(mapped, '_' | '.') && out.ends_with(mapped) {
            continue;
        }
        out.push(mapped);
    }
    out.trim_matches(|c| c == '_' || c == '.').to_string()
}

#[cfg(test)]
mod tests {
    use super::output_filename;
    use crate::models::tool::Tool;

    #[test]
    fn blank_input_uses_tool_default() {
        assert_eq!(output_filename("   ", Tool::MergePdf), "merged-document.pdf");
        assert_eq!(output_filename("", Tool::PdfToWord), "converted.docx");
    }

    #[test]
    fn extension_is_enforced_once() {
        assert_eq!(output_filename("report", Tool::CompressPdf), "report.pdf");
        assert_eq!(output_filename("report.PDF", Tool::CompressPdf), "report.pdf");
        assert_eq!(output_filename("notes.txt", Tool::WordToPdf), "notes.txt.pdf");
    }

    #[test]
    fn unsafe_characters_are_replaced() {
        assert_eq!(
            output_filename("Café résumé (final)/v2", Tool::MergePdf),
            "Cafe_resume_final_v2.pdf"
        );
        assert_eq!(output_filename("../../etc/passwd", Tool::MergePdf), "etc_passwd.pdf");
    }

    #[test]
    fn names_that_sanitize_to_nothing_fall_back() {
        assert_eq!(output_filename("///", Tool::ImageToPdf), "images.pdf");
    }
}
