pub mod classify;
pub mod formatter;

pub use classify::ImpactCounts;

use crate::config::ScanOptions;
use crate::error::{A11yError, ViolationsFound};
use crate::reporter::{self, HtmlRenderer, ReportRenderer};
use crate::scanner::{ScanEngine, ScanSpec, ViolationRecord};
use chrono::Utc;
use std::path::PathBuf;

/// Aggregate result of one scan invocation. Built fresh per call; only the
/// report files it points at outlive the call.
#[derive(Debug)]
pub struct ScanOutcome {
    pub page_description: String,
    pub violations: Vec<ViolationRecord>,
    pub counts: ImpactCounts,
    pub html_report: Option<PathBuf>,
    pub json_report: Option<PathBuf>,
}

/// Runs the full pipeline against a loaded page with the built-in HTML
/// renderer: normalize options, scan, classify, write reports, decide.
pub fn run(engine: &mut dyn ScanEngine, options: ScanOptions) -> Result<ScanOutcome, A11yError> {
    run_with(engine, &HtmlRenderer, options)
}

/// Same as `run` but with an injected report renderer.
pub fn run_with(
    engine: &mut dyn ScanEngine,
    renderer: &dyn ReportRenderer,
    options: ScanOptions,
) -> Result<ScanOutcome, A11yError> {
    let request = options.normalize()?;

    let spec = ScanSpec::from_request(&request);
    let violations = engine.scan(&spec).map_err(A11yError::Engine)?;

    let counts = classify::count_impacts(&violations);
    let failing = classify::failing_subset(&violations, &request.fail_impacts);

    let written = reporter::write_reports(&request, &violations, renderer, Utc::now());

    if request.log_summary {
        reporter::print_summary(&request.page_description, &counts);
    }

    if request.fail_on_violations && !failing.is_empty() {
        return Err(A11yError::ViolationsFound(Box::new(ViolationsFound {
            page_description: request.page_description,
            page_url: engine.url(),
            fail_impacts: request.fail_impacts,
            counts,
            html_report: written.html,
            json_report: written.json,
            failing: formatter::itemize(&failing),
            report_errors: written.errors.iter().map(|e| e.to_string()).collect(),
        })));
    }

    // Report-write failures surface on their own when the scan itself passes.
    // Only the first one becomes the error; the rest are warned about.
    let mut errors = written.errors.into_iter();
    if let Some(err) = errors.next() {
        for extra in errors {
            eprintln!("[Warning] {extra}");
        }
        return Err(err);
    }

    Ok(ScanOutcome {
        page_description: request.page_description,
        violations,
        counts,
        html_report: written.html,
        json_report: written.json,
    })
}
