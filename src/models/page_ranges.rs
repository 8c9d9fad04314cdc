// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Page ranges typed by the user for splitting, e.g. `1-3, 4-6, 7`.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PageRangeError {
    #[error("Enter at least one page range, e.g. 1-3, 5")]
    Empty,

    #[error("'{0}' is not a valid page range")]
    Invalid(String),
}

/// Parse a comma-separated list of 1-based pages or `start-end` ranges.
///
/// Ranges are returned normalized (`"1-3"`, `"7"`) in the order typed.
pub fn parse_page_ranges(input: &str) -> Result<Vec<String>, PageRangeError> {
    let ranges = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(normalize)
        .collect::<Result<Vec<_>, _>>()?;
    if ranges.is_empty() {
        return Err(PageRangeError::Empty);
    }
    Ok(ranges)
}

fn normalize(part: &str) -> Result<String, PageRangeError> {
    let invalid = || PageRangeError::Invalid(part.to_string());
    let page = |text: &str| -> Result<u32, PageRangeError> {
        text.trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(invalid)
    };

    match part.split_once('-') {
        Some((start, end)) => {
            let (start, end) = (page(start)?, page(end)?);
            if start > end {
                return Err(invalid());
            }
            Ok(if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            })
        }
        None => Ok(page(part)?.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pages_and_ranges_in_order() {
        assert_eq!(
            parse_page_ranges(" 1-3, 4 - 6,7,, ").unwrap(),
            vec!["1-3", "4-6", "7"]
        );
        assert_eq!(parse_page_ranges("2-2").unwrap(), vec!["2"]);
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(parse_page_ranges(" , "), Err(PageRangeError::Empty));
    }

    #[test]
    fn rejects_zero_reversed_and_garbage() {
        assert_eq!(
            parse_page_ranges("0"),
            Err(PageRangeError::Invalid("0".into()))
        );
        assert_eq!(
            parse_page_ranges("1-3, 5-2"),
            Err(PageRangeError::Invalid("5-2".into()))
        );
        assert!(parse_page_ranges("a-b").is_err());
        assert!(parse_page_ranges("1-2-3").is_err());
    }
}
