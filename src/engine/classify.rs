use crate::config::Impact;
use crate::scanner::ViolationRecord;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Per-severity tally for one scan. All four levels are always present;
/// records whose impact is missing or unrecognized land in no bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImpactCounts {
    pub minor: usize,
    pub moderate: usize,
    pub serious: usize,
    pub critical: usize,
}

impl ImpactCounts {
    pub fn get(&self, impact: Impact) -> usize {
        match impact {
            Impact::Minor => self.minor,
            Impact::Moderate => self.moderate,
            Impact::Serious => self.serious,
            Impact::Critical => self.critical,
        }
    }

    pub fn total(&self) -> usize {
        self.minor + self.moderate + self.serious + self.critical
    }
}

impl fmt::Display for ImpactCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "critical={} serious={} moderate={} minor={}",
            self.critical, self.serious, self.moderate, self.minor
        )
    }
}

pub fn count_impacts(violations: &[ViolationRecord]) -> ImpactCounts {
    let mut counts = ImpactCounts::default();
    for violation in violations {
        match violation.impact.as_deref().and_then(Impact::parse) {
            Some(Impact::Minor) => counts.minor += 1,
            Some(Impact::Moderate) => counts.moderate += 1,
            Some(Impact::Serious) => counts.serious += 1,
            Some(Impact::Critical) => counts.critical += 1,
            None => {}
        }
    }
    counts
}

/// Selects the records whose impact makes the invocation fail. An empty
/// `fail_impacts` set can never fail, whatever `fail_on_violations` says.
pub fn failing_subset<'a>(
    violations: &'a [ViolationRecord],
    fail_impacts: &BTreeSet<Impact>,
) -> Vec<&'a ViolationRecord> {
    if fail_impacts.is_empty() {
        return Vec::new();
    }

    violations
        .iter()
        .filter(|v| {
            v.impact
                .as_deref()
                .and_then(Impact::parse)
                .is_some_and(|impact| fail_impacts.contains(&impact))
        })
        .collect()
}
