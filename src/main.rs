use a11y_guardian::cli::Cli;
use a11y_guardian::config::{self, Impact, ScanOptions};
use a11y_guardian::engine::classify;
use a11y_guardian::reporter::{self, ReplayResult};
use a11y_guardian::scanner::{self, ReplayEngine, ScanEngine, ScanSpec};
use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::exit;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let args = Cli::parse();

    if let Some(path) = &args.config
        && !path.exists()
    {
        if args.json {
            reporter::print_json_error("Config file not found");
        } else {
            eprintln!("Error: Config file not found at {path:?}");
        }
        exit(1);
    }

    let policy = config::load_policy(args.config.as_deref(), Path::new(config::DEFAULT_CONFIG_FILE))
        .context("Failed to load configuration")?;

    // Validates the policy's fail_impacts up front; the description for each
    // replayed file comes from its filename, not from the policy.
    let request = ScanOptions {
        page_description: "replay".to_string(),
        ..policy
    }
    .normalize()?;
    let spec = ScanSpec::from_request(&request);

    let files: Vec<PathBuf> = scanner::find_report_files(&args.reports_path).collect();
    let mut results: Vec<ReplayResult> = files
        .par_iter()
        .map(|path| replay_file(path, &spec, &request.fail_impacts))
        .collect();
    results.sort_by(|a, b| a.file.cmp(&b.file));

    if args.json {
        reporter::print_json_report(&results);
    } else {
        reporter::print_human_report(&results, start_time);
    }

    let has_failures = results.iter().any(|r| r.failing > 0);
    if has_failures {
        exit(1);
    }

    Ok(())
}

fn replay_file(path: &Path, spec: &ScanSpec, fail_impacts: &BTreeSet<Impact>) -> ReplayResult {
    let file = path.to_string_lossy().to_string();
    let page = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file.clone());

    let violations = match ReplayEngine::load(path).and_then(|mut engine| engine.scan(spec)) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("[Warning] Could not replay report {file}: {e}");
            Vec::new()
        }
    };

    let counts = classify::count_impacts(&violations);
    let failing = classify::failing_subset(&violations, fail_impacts).len();

    ReplayResult {
        file,
        page,
        counts,
        total: violations.len(),
        failing,
    }
}
