//! InfluxDB line protocol encoding.
//!
//! ```text
//! measurement,module=Indoor,station=Home value=21.5 1700000000
//! ```
//!
//! Timestamps are written in seconds; the write request must therefore use
//! `precision=s`.

use crate::models::Point;
use crate::utils::constants::{MODULE_TAG, STATION_TAG, VALUE_FIELD};

/// Encode one point as a single line (no trailing newline).
///
/// Tags are written sorted by key, which is the canonical order InfluxDB
/// stores them in. Tags with an empty value are left out, since the line
/// protocol has no way to express them.
pub fn encode_point(point: &Point) -> String {
    let mut line = escape_measurement(&point.measurement);

    for (key, value) in [(MODULE_TAG, &point.module), (STATION_TAG, &point.station)] {
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(key);
        line.push('=');
        line.push_str(&escape_tag(value));
    }

    line.push(' ');
    line.push_str(VALUE_FIELD);
    line.push('=');
    line.push_str(&format_float(point.value));

    line.push(' ');
    line.push_str(&point.timestamp.to_string());
    line
}

/// Encode a batch as a newline-separated request body.
pub fn encode_batch(points: &[Point]) -> String {
    let mut body = String::with_capacity(points.len() * 96);
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            body.push('\n');
        }
        body.push_str(&encode_point(point));
    }
    body
}

/// Floats are written without a type suffix; whole numbers keep no decimal
/// point, which InfluxDB still reads as a float.
fn format_float(value: f64) -> String {
    format!("{}", value)
}

/// Spaces and commas must be escaped in measurement names.
fn escape_measurement(s: &str) -> String {
    escape(s, &[',', ' '])
}

/// Commas, equals signs and spaces must be escaped in tag values.
fn escape_tag(s: &str) -> String {
    escape(s, &[',', '=', ' '])
}

/// Backslash-escape `special`; newlines, carriage returns and tabs would
/// otherwise split or corrupt the line.
fn escape(s: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if special.contains(&c) => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped
}
