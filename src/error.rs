use crate::config::Impact;
use crate::engine::ImpactCounts;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two report artifacts a write failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Html,
    Json,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Html => write!(f, "HTML"),
            ReportKind::Json => write!(f, "JSON"),
        }
    }
}

#[derive(Debug, Error)]
pub enum A11yError {
    /// Bad caller input, raised before any scan or I/O happens.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The external scan engine itself failed; passed through untouched.
    #[error(transparent)]
    Engine(anyhow::Error),

    /// Writing one of the report artifacts failed. The other artifact is
    /// still attempted and the fail/return decision still runs.
    #[error("failed to write {kind} report to {path:?}")]
    ReportWrite {
        kind: ReportKind,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The policy-driven "test failed" signal carrying full diagnostics.
    #[error("{0}")]
    ViolationsFound(Box<ViolationsFound>),
}

/// Diagnostic payload for `A11yError::ViolationsFound`. `Display` renders the
/// multi-line message test runners show directly to a human.
#[derive(Debug)]
pub struct ViolationsFound {
    pub page_description: String,
    pub page_url: Option<String>,
    pub fail_impacts: BTreeSet<Impact>,
    pub counts: ImpactCounts,
    pub html_report: Option<PathBuf>,
    pub json_report: Option<PathBuf>,
    /// One pre-formatted line per failing violation.
    pub failing: Vec<String>,
    /// Report artifacts that could not be written, best-effort noted here
    /// since this error takes precedence over `ReportWrite`.
    pub report_errors: Vec<String>,
}

impl fmt::Display for ViolationsFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "accessibility violations found on \"{}\"",
            self.page_description
        )?;
        if let Some(url) = &self.page_url {
            writeln!(f, "  url: {url}")?;
        }
        let impacts: Vec<&str> = self.fail_impacts.iter().map(|i| i.as_str()).collect();
        writeln!(f, "  failing impacts: [{}]", impacts.join(", "))?;
        writeln!(f, "  totals: {}", self.counts)?;
        if let Some(path) = &self.html_report {
            writeln!(f, "  html report: {}", path.display())?;
        }
        if let Some(path) = &self.json_report {
            writeln!(f, "  json report: {}", path.display())?;
        }
        for line in &self.report_errors {
            writeln!(f, "  report not written: {line}")?;
        }
        for line in &self.failing {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}
