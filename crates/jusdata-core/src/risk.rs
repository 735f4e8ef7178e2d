//! Risk categorization of a favorable-outcome probability.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Probabilities strictly below this are high risk.
pub const HIGH_RISK_BELOW: f64 = 0.30;
/// Probabilities at or above this are low risk.
pub const LOW_RISK_FROM: f64 = 0.60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Categorize a probability of favorable outcome.
    ///
    /// `p < 0.30` → High, `0.30 <= p < 0.60` → Medium, `p >= 0.60` → Low.
    pub fn from_probability(p: f64) -> Self {
        if p < HIGH_RISK_BELOW {
            Self::High
        } else if p < LOW_RISK_FROM {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Medium => "Medium Risk",
            Self::Low => "Low Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
