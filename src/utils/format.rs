// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Human-readable formatting for file metadata.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count with binary (1024) units, e.g. `1536` -> `"1.5 KB"`.
///
/// The unit is the largest one whose scaled value is at least 1, capped at GB.
/// The value is rounded to two decimals and trailing zeros are dropped.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    // Integer log1024 avoids float rounding at exact unit boundaries.
    let mut unit = 0;
    let mut threshold: u64 = 1024;
    while unit < UNITS.len() - 1 && bytes >= threshold {
        unit += 1;
        threshold = threshold.saturating_mul(1024);
    }

    let scaled = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", trim_decimals(rounded), UNITS[unit])
}

fn trim_decimals(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn zero_is_bytes() {
        assert_eq!(format_size(0), "0 Bytes");
    }

    #[test]
    fn exact_and_fractional_units() {
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1 MB");
        assert_eq!(format_size(500_000), "488.28 KB");
        assert_eq!(format_size(2_000_000), "1.91 MB");
    }

    #[test]
    fn clamps_to_gigabytes() {
        assert_eq!(format_size(1024u64.pow(3)), "1 GB");
        assert_eq!(format_size(1024u64.pow(4)), "1024 GB");
    }

    // Unit never decreases and the number never decreases within a unit.
    #[test]
    fn monotonic_in_unit_and_value() {
        let parse = |s: String| {
            let (num, unit) = s.split_once(' ').expect("value and unit");
            let idx = ["Bytes", "KB", "MB", "GB"]
                .iter()
                .position(|u| *u == unit)
                .expect("known unit");
            (idx, num.parse::<f64>().expect("numeric"))
        };

        let mut prev = parse(format_size(1));
        let mut bytes = 1u64;
        while bytes < 5 * 1024u64.pow(3) {
            bytes = bytes * 3 / 2 + 7;
            let next = parse(format_size(bytes));
            assert!(next.0 >= prev.0, "unit decreased at {bytes}");
            if next.0 == prev.0 {
                assert!(next.1 >= prev.1, "value decreased at {bytes}");
            }
            prev = next;
        }
    }
}
