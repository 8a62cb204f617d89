//! Formatting helpers shared by every dashboard table.
//!
//! All functions here are pure: they render values for HTML table cells and
//! never touch the network or any shared state.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::{JobscopeError, Result};

/// Marker shown in place of missing or invalid data.
pub const NA_MARKER: &str = "<i>N/A</i>";

/// Naive formats emitted by the job service. They carry no offset and are UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp into an absolute instant.
///
/// Accepts RFC 3339 with an offset, naive date-times (taken as UTC) and bare
/// dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(JobscopeError::InvalidTimestamp(value.to_string()))
}

/// Whether `first` is strictly earlier than `second`.
///
/// Equal instants compare as `false`. Unparsable input is rejected rather
/// than silently ordered.
pub fn compare_two_dates(first: &str, second: &str) -> Result<bool> {
    Ok(parse_timestamp(first)? < parse_timestamp(second)?)
}

/// Whole seconds between claiming a job and its terminal event.
///
/// `None` when there is no terminal event, no claim, an unparsable timestamp
/// or a negative span.
pub fn elapsed_seconds(
    claimed: Option<&str>,
    finished: Option<&str>,
    failed: Option<&str>,
) -> Option<i64> {
    let end = failed.or(finished)?;
    let start = parse_timestamp(claimed?).ok()?;
    let end = parse_timestamp(end).ok()?;

    let elapsed = end - start;
    if elapsed < Duration::zero() {
        return None;
    }
    Some(elapsed.num_seconds())
}

/// Render the processing time of a job, e.g. `6s`, or the N/A marker.
pub fn get_duration(claimed: Option<&str>, finished: Option<&str>, failed: Option<&str>) -> String {
    match elapsed_seconds(claimed, finished, failed) {
        Some(seconds) => format!("{}s", seconds),
        None => NA_MARKER.to_string(),
    }
}

/// A value shown in an HTML list or table cell.
///
/// Floats print in full decimal form, so `1e21` renders as
/// `1000000000000000000000` rather than in exponent notation.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(x) if x.is_nan() => f.write_str("NaN"),
            Scalar::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // Covers -0.0 as well.
            Scalar::Float(x) if *x == 0.0 => f.write_str("0"),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(value.into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Scalar::Integer)
            .unwrap_or(Scalar::Float(value as f64))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&serde_json::Value> for Scalar {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::String(s) => Scalar::Text(s.clone()),
            Value::Bool(b) => Scalar::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Integer(i),
                None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::Null => Scalar::Text("null".to_string()),
            other => Scalar::Text(other.to_string()),
        }
    }
}

/// Render key/value pairs as an HTML unordered list, in iteration order.
///
/// Keys and values are not escaped.
pub fn object_as_list<I, K, V>(entries: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: fmt::Display,
    V: fmt::Display,
{
    let mut html = String::from("<ul>");
    for (key, value) in entries {
        html.push_str(&format!("<li>{}: {}</li>", key, value));
    }
    html.push_str("</ul>");
    html
}

/// [`object_as_list`] over a JSON object, keeping its insertion order.
pub fn json_object_as_list(map: &serde_json::Map<String, serde_json::Value>) -> String {
    object_as_list(map.iter().map(|(key, value)| (key, Scalar::from(value))))
}

/// Drop the seconds from `yyyy-mm-ddTHH:MM:SS`.
pub fn remove_seconds(timestamp: Option<&str>) -> String {
    let Some(timestamp) = timestamp else {
        return NA_MARKER.to_string();
    };
    let cut = timestamp
        .char_indices()
        .rev()
        .nth(2)
        .map(|(index, _)| index)
        .unwrap_or(0);
    timestamp[..cut].to_string()
}

/// A score rounded to three decimals, without trailing zeros.
pub fn format_score(score: f64) -> String {
    Scalar::Float((score * 1000.0).round() / 1000.0).to_string()
}

/// Mean processing time in whole seconds over all finished and failed jobs.
pub fn average_processing_time(total_seconds: f64, finished: u64, failed: u64) -> String {
    let done = finished + failed;
    if done == 0 {
        return NA_MARKER.to_string();
    }
    format!("{}", (total_seconds / done as f64).round() as i64)
}

/// `total/left/failed` job counts for a project.
pub fn job_totals(added: u64, finished: u64, failed: u64) -> String {
    let left = added as i64 - failed as i64 - finished as i64;
    format!("{}/{}/{}", added, left, failed)
}

/// The value itself, or the N/A marker when absent.
pub fn or_na<T: fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NA_MARKER.to_string())
}

/// Console output with line breaks as `<br>`.
pub fn output_as_html(output: &str) -> String {
    output.replace('\n', "<br>")
}
