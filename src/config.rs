use crate::error::A11yError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Output directory used when the caller does not pick one.
pub const DEFAULT_OUTPUT_DIR: &str = "a11y-reports";

/// Policy file the CLI consults when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "a11y.yaml";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl Impact {
    pub const ALL: [Impact; 4] = [
        Impact::Minor,
        Impact::Moderate,
        Impact::Serious,
        Impact::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Minor => "minor",
            Impact::Moderate => "moderate",
            Impact::Serious => "serious",
            Impact::Critical => "critical",
        }
    }

    /// Parses an engine-reported impact string. Unknown values map to `None`;
    /// the engine's vocabulary is not assumed to stay within the four levels.
    pub fn parse(s: &str) -> Option<Impact> {
        match s {
            "minor" => Some(Impact::Minor),
            "moderate" => Some(Impact::Moderate),
            "serious" => Some(Impact::Serious),
            "critical" => Some(Impact::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conformance tag selecting which rule set the engine evaluates.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ConformanceTag {
    #[serde(rename = "wcag2a")]
    Wcag2A,
    #[serde(rename = "wcag2aa")]
    Wcag2Aa,
    #[serde(rename = "wcag21a")]
    Wcag21A,
    #[serde(rename = "wcag21aa")]
    Wcag21Aa,
    #[serde(rename = "best-practice")]
    BestPractice,
}

impl ConformanceTag {
    pub const ALL: [ConformanceTag; 5] = [
        ConformanceTag::Wcag2A,
        ConformanceTag::Wcag2Aa,
        ConformanceTag::Wcag21A,
        ConformanceTag::Wcag21Aa,
        ConformanceTag::BestPractice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConformanceTag::Wcag2A => "wcag2a",
            ConformanceTag::Wcag2Aa => "wcag2aa",
            ConformanceTag::Wcag21A => "wcag21a",
            ConformanceTag::Wcag21Aa => "wcag21aa",
            ConformanceTag::BestPractice => "best-practice",
        }
    }
}

/// Raw invocation options as supplied by the caller (or a YAML policy file).
/// Everything except `page_description` is optional with a documented default;
/// `normalize` resolves all of it up front so nothing downstream re-checks.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(default)]
pub struct ScanOptions {
    pub page_description: String,
    pub include_selectors: Vec<String>,
    pub exclude_selectors: Vec<String>,
    pub tags: Option<Vec<ConformanceTag>>,
    pub disabled_rules: Vec<String>,
    pub fail_on_violations: bool,
    pub fail_impacts: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub emit_html: Option<bool>,
    pub emit_json: Option<bool>,
    pub log_summary: Option<bool>,
}

impl ScanOptions {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open config file: {:?}", path.as_ref()))?;

        let options: ScanOptions =
            serde_yaml::from_reader(file).context("Failed to parse configuration file")?;

        Ok(options)
    }

    /// Validates the raw options and fills every default, producing the
    /// request the rest of the pipeline runs on. Pure; no I/O.
    pub fn normalize(self) -> Result<ScanRequest, A11yError> {
        if self.page_description.trim().is_empty() {
            return Err(A11yError::InvalidConfiguration(
                "page_description must be a non-empty string".to_string(),
            ));
        }

        let fail_impacts = match self.fail_impacts {
            None => Impact::ALL.into_iter().collect(),
            Some(raw) => parse_fail_impacts(&raw)?,
        };

        Ok(ScanRequest {
            page_description: self.page_description,
            include_selectors: self.include_selectors,
            exclude_selectors: self.exclude_selectors,
            tags: self.tags.unwrap_or_else(|| ConformanceTag::ALL.to_vec()),
            disabled_rules: self.disabled_rules,
            fail_on_violations: self.fail_on_violations,
            fail_impacts,
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            emit_html: self.emit_html.unwrap_or(true),
            emit_json: self.emit_json.unwrap_or(true),
            log_summary: self.log_summary.unwrap_or(true),
        })
    }
}

/// Resolves the replay CLI's policy: an explicit path must load, the default
/// policy file is used when it exists, and built-in defaults apply otherwise.
pub fn load_policy(explicit: Option<&Path>, default_path: &Path) -> Result<ScanOptions> {
    match explicit {
        Some(path) => ScanOptions::load(path),
        None if default_path.exists() => ScanOptions::load(default_path),
        None => Ok(ScanOptions::default()),
    }
}

fn parse_fail_impacts(raw: &[String]) -> Result<BTreeSet<Impact>, A11yError> {
    let mut impacts = BTreeSet::new();
    let mut unknown = Vec::new();

    for value in raw {
        match Impact::parse(value) {
            Some(impact) => {
                impacts.insert(impact);
            }
            None => unknown.push(value.as_str()),
        }
    }

    if unknown.is_empty() {
        Ok(impacts)
    } else {
        let valid: Vec<&str> = Impact::ALL.iter().map(|i| i.as_str()).collect();
        Err(A11yError::InvalidConfiguration(format!(
            "unknown fail_impacts value(s) [{}]; valid values are [{}]",
            unknown.join(", "),
            valid.join(", ")
        )))
    }
}

/// Normalized invocation parameters. Constructed once per call by
/// `ScanOptions::normalize` and consumed by the pipeline.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub page_description: String,
    pub include_selectors: Vec<String>,
    pub exclude_selectors: Vec<String>,
    pub tags: Vec<ConformanceTag>,
    pub disabled_rules: Vec<String>,
    pub fail_on_violations: bool,
    pub fail_impacts: BTreeSet<Impact>,
    pub output_dir: PathBuf,
    pub emit_html: bool,
    pub emit_json: bool,
    pub log_summary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(description: &str) -> ScanOptions {
        ScanOptions {
            page_description: description.to_string(),
            ..ScanOptions::default()
        }
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let request = options("Checkout page").normalize().unwrap();

        assert_eq!(request.page_description, "Checkout page");
        assert!(request.include_selectors.is_empty());
        assert!(request.exclude_selectors.is_empty());
        assert_eq!(request.tags, ConformanceTag::ALL.to_vec());
        assert!(!request.fail_on_violations);
        assert_eq!(
            request.fail_impacts,
            Impact::ALL.into_iter().collect::<BTreeSet<_>>()
        );
        assert_eq!(request.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert!(request.emit_html);
        assert!(request.emit_json);
        assert!(request.log_summary);
    }

    #[test]
    fn test_normalize_rejects_empty_description() {
        for description in ["", "   ", "\t\n"] {
            let err = options(description).normalize().unwrap_err();
            assert!(matches!(err, A11yError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn test_normalize_rejects_unknown_fail_impacts() {
        let mut opts = options("Home");
        opts.fail_impacts = Some(vec![
            "critical".to_string(),
            "severe".to_string(),
            "blocker".to_string(),
        ]);

        let err = opts.normalize().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("severe"));
        assert!(message.contains("blocker"));
        assert!(message.contains("minor, moderate, serious, critical"));
    }

    #[test]
    fn test_normalize_accepts_known_fail_impacts() {
        let mut opts = options("Home");
        opts.fail_impacts = Some(vec!["serious".to_string(), "critical".to_string()]);

        let request = opts.normalize().unwrap();
        assert_eq!(
            request.fail_impacts,
            [Impact::Serious, Impact::Critical].into_iter().collect()
        );
    }

    #[test]
    fn test_empty_fail_impacts_stays_empty() {
        let mut opts = options("Home");
        opts.fail_impacts = Some(vec![]);

        let request = opts.normalize().unwrap();
        assert!(request.fail_impacts.is_empty());
    }

    #[test]
    fn test_load_policy_prefers_explicit_then_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&default_path, "fail_on_violations: true\n").unwrap();

        let explicit_path = dir.path().join("strict.yaml");
        std::fs::write(&explicit_path, "fail_impacts: [critical]\n").unwrap();

        let explicit = load_policy(Some(&explicit_path), &default_path).unwrap();
        assert_eq!(explicit.fail_impacts, Some(vec!["critical".to_string()]));
        assert!(!explicit.fail_on_violations);

        let from_default = load_policy(None, &default_path).unwrap();
        assert!(from_default.fail_on_violations);
    }

    #[test]
    fn test_load_policy_falls_back_to_builtin_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing_default = dir.path().join(DEFAULT_CONFIG_FILE);

        let policy = load_policy(None, &missing_default).unwrap();
        assert!(!policy.fail_on_violations);
        assert!(policy.fail_impacts.is_none());
    }

    #[test]
    fn test_load_policy_explicit_path_must_load() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(load_policy(Some(&missing), &missing).is_err());
    }

    #[test]
    fn test_impact_parse_rejects_unknown() {
        assert_eq!(Impact::parse("critical"), Some(Impact::Critical));
        assert_eq!(Impact::parse("Critical"), None);
        assert_eq!(Impact::parse("unknown"), None);
    }
}
