//! Thin convenience layer over an external accessibility-scanning engine:
//! normalize scan options, run the scan against an already-loaded page,
//! classify violations by impact, write HTML/JSON reports, and decide
//! whether the invocation fails.
//!
//! The scan engine and report renderer are traits; callers plug in whatever
//! automation layer drives their pages.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod reporter;
pub mod scanner;

pub use config::{ConformanceTag, DEFAULT_OUTPUT_DIR, Impact, ScanOptions, ScanRequest};
pub use engine::{ImpactCounts, ScanOutcome, run, run_with};
pub use error::{A11yError, ReportKind, ViolationsFound};
pub use reporter::{HtmlRenderer, ReportRenderer, summarize};
pub use scanner::{NodeTarget, ReplayEngine, ScanEngine, ScanSpec, ViolationRecord};
