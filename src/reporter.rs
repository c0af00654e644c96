use crate::config::{Impact, ScanRequest};
use crate::engine::{ImpactCounts, ScanOutcome};
use crate::error::{A11yError, ReportKind};
use crate::scanner::ViolationRecord;
use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Renders violation data into a standalone HTML document. The default
/// implementation is `HtmlRenderer`; tests inject failing renderers here.
pub trait ReportRenderer {
    fn render(&self, title: &str, violations: &[ViolationRecord]) -> anyhow::Result<String>;
}

/// Built-in static HTML report.
pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn render(&self, title: &str, violations: &[ViolationRecord]) -> anyhow::Result<String> {
        let mut rows = String::new();
        for v in violations {
            let impact = v.impact.as_deref().unwrap_or("unknown");
            // The engine's impact vocabulary is open; only a recognized level
            // may become a CSS class, and the cell text gets escaped like
            // every other engine-supplied field.
            let impact_class = v
                .impact
                .as_deref()
                .and_then(Impact::parse)
                .map(|i| i.as_str())
                .unwrap_or("unknown");
            let help = v
                .help_url
                .as_deref()
                .map(|url| format!("<a href=\"{}\">help</a>", escape(url)))
                .unwrap_or_default();
            rows.push_str(&format!(
                "<tr class=\"{impact_class}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{help}</td></tr>\n",
                escape(&v.id),
                escape(impact),
                escape(&v.description),
                v.nodes.len(),
            ));
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }}
tr.critical td {{ background: #fdd; }}
tr.serious td {{ background: #fed; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{count} violation(s)</p>
<table>
<tr><th>Rule</th><th>Impact</th><th>Description</th><th>Nodes</th><th>Help</th></tr>
{rows}</table>
</body>
</html>
"#,
            title = escape(title),
            count = violations.len(),
        ))
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Outcome of the best-effort report writes for one invocation.
#[derive(Debug, Default)]
pub struct WrittenReports {
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub errors: Vec<A11yError>,
}

/// Writes the enabled report artifacts. Nothing is written when there are no
/// violations. A failed write never stops the other artifact from being
/// attempted; failures are collected for the caller to surface.
pub fn write_reports(
    request: &ScanRequest,
    violations: &[ViolationRecord],
    renderer: &dyn ReportRenderer,
    at: DateTime<Utc>,
) -> WrittenReports {
    let mut written = WrittenReports::default();

    if violations.is_empty() {
        return written;
    }

    let base = crate::engine::formatter::report_basename(&request.page_description, at);

    if request.emit_html {
        let path = request.output_dir.join(format!("{base}.html"));
        match render_html(request, violations, renderer, &path) {
            Ok(()) => written.html = Some(path),
            Err(source) => written.errors.push(A11yError::ReportWrite {
                kind: ReportKind::Html,
                path,
                source,
            }),
        }
    }

    if request.emit_json {
        let path = request.output_dir.join(format!("{base}.json"));
        match write_json(request, violations, &path) {
            Ok(()) => written.json = Some(path),
            Err(source) => written.errors.push(A11yError::ReportWrite {
                kind: ReportKind::Json,
                path,
                source,
            }),
        }
    }

    written
}

fn render_html(
    request: &ScanRequest,
    violations: &[ViolationRecord],
    renderer: &dyn ReportRenderer,
    path: &Path,
) -> anyhow::Result<()> {
    fs::create_dir_all(&request.output_dir)?;
    let html = renderer.render(&request.page_description, violations)?;
    fs::write(path, html)?;
    Ok(())
}

fn write_json(
    request: &ScanRequest,
    violations: &[ViolationRecord],
    path: &Path,
) -> anyhow::Result<()> {
    fs::create_dir_all(&request.output_dir)?;
    // Engine data passes through verbatim; no re-shaping.
    let json = serde_json::to_string_pretty(violations)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn print_summary(page: &str, counts: &ImpactCounts) {
    let total = counts.total();
    let total_part = if total > 0 {
        format!("{total} violation(s)").red().to_string()
    } else {
        "0 violation(s)".green().to_string()
    };

    println!(
        "{} {} {} {} {}",
        "⛊".bold(),
        page.bold(),
        "·".dimmed(),
        total_part,
        format!(
            "(critical={} serious={} moderate={} minor={})",
            counts.critical, counts.serious, counts.moderate, counts.minor
        )
        .dimmed()
    );
}

/// Prints the summary line for a finished scan and returns the total
/// violation count. For callers that ran with `log_summary: false`.
pub fn summarize(outcome: &ScanOutcome) -> usize {
    print_summary(&outcome.page_description, &outcome.counts);
    outcome.counts.total()
}

/// One replayed report file, as shown by the CLI.
#[derive(Debug, Serialize)]
pub struct ReplayResult {
    pub file: String,
    pub page: String,
    pub counts: ImpactCounts,
    pub total: usize,
    pub failing: usize,
}

pub fn print_human_report(results: &[ReplayResult], start_time: std::time::Instant) {
    println!(
        "{} {} v{}",
        "⛊".bold(),
        "a11y-guardian".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    let mut total_failing = 0;
    let mut total_violations = 0;

    for result in results {
        total_failing += result.failing;
        total_violations += result.total;

        let symbol = if result.failing > 0 {
            "×".bright_red()
        } else {
            "✓".green()
        };
        println!(
            "{} {} {}",
            symbol,
            result.page.bold(),
            format!(
                "(critical={} serious={} moderate={} minor={})",
                result.counts.critical,
                result.counts.serious,
                result.counts.moderate,
                result.counts.minor
            )
            .dimmed()
        );
    }

    println!();

    let mut summary_parts = vec![format!("{} report(s) replayed", results.len())];
    if total_failing > 0 {
        summary_parts.push(format!("{total_failing} failing").red().to_string());
    } else {
        summary_parts.push("0 failing".green().to_string());
    }
    summary_parts.push(format!("{total_violations} violation(s) total"));
    summary_parts.push(format!("{:.2}s", start_time.elapsed().as_secs_f64()));

    println!(
        "Done: {}",
        summary_parts.join(&format!(" {} ", "·".dimmed()))
    );
}

pub fn print_json_report(results: &[ReplayResult]) {
    match serde_json::to_string_pretty(results) {
        Ok(json_output) => println!("{json_output}"),
        Err(e) => print_json_error(&format!("Failed to serialize results to JSON: {e}")),
    }
}

pub fn print_json_error(msg: &str) {
    let error_json = serde_json::json!({
        "error": msg
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&error_json).unwrap_or_else(|_| format!("{{\"error\":\"{msg}\"}}"))
    );
}
