use crate::config::{ConformanceTag, ScanRequest};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One affected node as described by the engine.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NodeTarget {
    pub target: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// One violation as returned by the external engine. The engine owns this
/// data; we read it and pass it through to reports verbatim. `impact` stays a
/// raw string because the engine's vocabulary is not assumed exhaustive.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ViolationRecord {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
    pub nodes: Vec<NodeTarget>,
}

/// Fully assembled scan configuration, built once from the request and handed
/// to the engine in a single call. Include is applied before exclude; both are
/// set operations on the document, so the order only pins down determinism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSpec {
    pub include_selectors: Vec<String>,
    pub exclude_selectors: Vec<String>,
    pub tags: Vec<ConformanceTag>,
    pub disabled_rules: Vec<String>,
}

impl ScanSpec {
    pub fn from_request(request: &ScanRequest) -> Self {
        ScanSpec {
            include_selectors: request.include_selectors.clone(),
            exclude_selectors: request.exclude_selectors.clone(),
            tags: request.tags.clone(),
            disabled_rules: request.disabled_rules.clone(),
        }
    }
}

/// The external scanning capability: a loaded page that can evaluate the
/// configured rules and report violations. Implemented by whatever automation
/// layer the caller drives; errors pass through the pipeline unmodified.
pub trait ScanEngine {
    /// Runs the scan and returns the engine's ordered violation sequence.
    fn scan(&mut self, spec: &ScanSpec) -> anyhow::Result<Vec<ViolationRecord>>;

    /// Source URL of the scanned page, when the engine knows it.
    fn url(&self) -> Option<String> {
        None
    }
}

/// Replays a previously written JSON report as if it were a live scan.
/// Used by the CLI to re-evaluate stored results under a fresh policy.
pub struct ReplayEngine {
    violations: Vec<ViolationRecord>,
}

impl ReplayEngine {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let violations: Vec<ViolationRecord> = serde_json::from_reader(file)?;
        Ok(ReplayEngine { violations })
    }
}

impl ScanEngine for ReplayEngine {
    fn scan(&mut self, _spec: &ScanSpec) -> anyhow::Result<Vec<ViolationRecord>> {
        Ok(self.violations.clone())
    }
}

pub fn find_report_files<P: AsRef<Path>>(root: P) -> impl Iterator<Item = PathBuf> {
    WalkBuilder::new(root)
        .follow_links(false)
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .map(|e| e.path().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanOptions;

    #[test]
    fn test_spec_carries_request_scope() {
        let mut opts = ScanOptions {
            page_description: "Landing".to_string(),
            ..ScanOptions::default()
        };
        opts.include_selectors = vec!["main".to_string()];
        opts.exclude_selectors = vec![".ad-banner".to_string()];
        opts.disabled_rules = vec!["color-contrast".to_string()];

        let request = opts.normalize().unwrap();
        let spec = ScanSpec::from_request(&request);

        assert_eq!(spec.include_selectors, vec!["main".to_string()]);
        assert_eq!(spec.exclude_selectors, vec![".ad-banner".to_string()]);
        assert_eq!(spec.disabled_rules, vec!["color-contrast".to_string()]);
        assert_eq!(spec.tags, request.tags);
    }

    #[test]
    fn test_violation_record_json_roundtrip_keeps_unknown_impact() {
        let raw = r##"[{
            "id": "aria-hidden-focus",
            "description": "ARIA hidden element must not be focusable",
            "impact": "severe-ish",
            "nodes": [{ "target": ["#nav"] }]
        }]"##;

        let records: Vec<ViolationRecord> = serde_json::from_str(raw).unwrap();
        assert_eq!(records[0].impact.as_deref(), Some("severe-ish"));
        assert_eq!(records[0].nodes.len(), 1);
    }
}
