use crate::scanner::ViolationRecord;
use chrono::{DateTime, SecondsFormat, Utc};

/// Lowercases the page description, collapses whitespace runs to single
/// hyphens, and strips everything outside `[a-z0-9_-]`.
pub fn sanitize_description(description: &str) -> String {
    description
        .split_whitespace()
        .map(|word| {
            word.to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// ISO8601 UTC timestamp with `:` and `.` replaced so it is filename-safe.
/// Lexicographic order of the result matches chronological order.
pub fn filename_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Base report filename (no extension) for one invocation. Repeated runs for
/// the same page sort chronologically and collide only within one millisecond.
pub fn report_basename(description: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", sanitize_description(description), filename_timestamp(at))
}

/// One human-readable line per failing violation for the failure diagnostic.
pub fn itemize(failing: &[&ViolationRecord]) -> Vec<String> {
    failing
        .iter()
        .map(|v| {
            let impact = v.impact.as_deref().unwrap_or("unknown");
            let mut line = format!(
                "[{impact}] {}: {} ({} node(s))",
                v.id,
                v.description,
                v.nodes.len()
            );
            if let Some(help) = &v.help_url {
                line.push_str(&format!(" -> {help}"));
            }
            line
        })
        .collect()
}
