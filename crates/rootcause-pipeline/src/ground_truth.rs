//! Ground-truth checks against tickets with a known answer

use rootcause_domain::Verdict;
use std::collections::HashMap;

/// Tickets whose correct verdict is known in advance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundTruth {
    known_positive: Vec<String>,
}

/// A known-positive ticket whose verdict did not open with "yes"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundTruthViolation {
    /// Ticket number
    pub number: String,
    /// The stored response
    pub verdict: String,
    /// How the response was read
    pub parsed: Verdict,
}

/// Outcome of a ground-truth check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundTruthReport {
    /// Known tickets found in the results
    pub checked: usize,
    /// Known tickets absent from the results
    pub missing: Vec<String>,
    /// Known tickets with the wrong verdict
    pub violations: Vec<GroundTruthViolation>,
}

impl GroundTruthReport {
    /// Whether no violation was found
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

impl GroundTruth {
    /// Ground truth listing tickets that must be classified "yes"
    pub fn new<I, T>(known_positive: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            known_positive: known_positive.into_iter().map(Into::into).collect(),
        }
    }

    /// Tickets expected to be classified "yes"
    pub fn known_positive(&self) -> &[String] {
        &self.known_positive
    }

    /// Check results against the known answers
    ///
    /// Known tickets absent from `results` are reported as missing, not as
    /// violations.
    pub fn check(&self, results: &HashMap<String, String>) -> GroundTruthReport {
        let mut report = GroundTruthReport::default();

        for number in &self.known_positive {
            let Some(verdict) = results.get(number) else {
                report.missing.push(number.clone());
                continue;
            };

            report.checked += 1;
            let parsed = Verdict::parse(verdict);
            if parsed != Verdict::Yes {
                report.violations.push(GroundTruthViolation {
                    number: number.clone(),
                    verdict: verdict.clone(),
                    parsed,
                });
            }
        }

        report
    }
}
