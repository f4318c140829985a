//! Lossy field parsers for free-text inventory columns.
//!
//! Inventory exports are hand-edited and inconsistent, so these parsers never
//! fail: anything they cannot read becomes `0`, which fails the corresponding
//! criterion. They are not validators.

/// Extract the first numeric token (`\d+(\.\d+)?`) found anywhere in `value`.
///
/// `"15.7 GB"` -> 15.7, `"RAM: 8GB"` -> 8.0, `"unknown"` or `None` -> 0.0.
pub fn first_numeric_token(value: Option<&str>) -> f64 {
    let Some(text) = value else {
        return 0.0;
    };

    let bytes = text.as_bytes();
    let Some(start) = bytes.iter().position(u8::is_ascii_digit) else {
        return 0.0;
    };

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }

    // A fractional part only counts when at least one digit follows the dot.
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    text[start..end].parse().unwrap_or(0.0)
}

/// Parse the text before the first `-` as an integer year.
///
/// `"2019-05-01"` -> 2019, `"2021"` -> 2021, `"05/01/2019"` or `None` -> 0.
/// Digit runs that overflow `i32` also yield 0.
pub fn leading_year(value: Option<&str>) -> i32 {
    let Some(text) = value else {
        return 0;
    };
    let head = text.split('-').next().unwrap_or_default();
    head.trim().parse().unwrap_or(0)
}
