//! Confidence grading shared by heading candidates, sections, and the global
//! structure rollup.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Downgrade a confidence by one step, never going below `Low`.
    pub fn downgrade(self) -> Self {
        match self {
            Confidence::High => Confidence::Medium,
            Confidence::Medium => Confidence::Low,
            Confidence::Low => Confidence::Low,
        }
    }

    /// `true` if `self` is at most `other` (e.g. a result capped at `Medium`
    /// satisfies `confidence <= Medium`).
    pub fn at_most(self, other: Confidence) -> bool {
        self <= other
    }
}
