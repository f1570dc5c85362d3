use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ecocrop_core::DomainError;

/// How urgently the grower should act.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// One step up, saturating at High.
    pub fn escalate(self) -> Self {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium | RiskLevel::High => RiskLevel::High,
        }
    }
}

impl core::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(DomainError::validation(format!("unknown risk level: {other}"))),
        }
    }
}

/// Structured crop health advice.
///
/// This is an advisory payload, not a domain event: higher layers persist or
/// display it without it mutating anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub diagnosis: String,
    /// Confidence in the diagnosis, 0..=100.
    pub confidence_pct: u8,
    pub immediate_action: String,
    pub sustainable_treatment: String,
    pub resource_efficiency_tip: String,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("invalid analysis request: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("advisor backend unavailable: {0}")]
    Upstream(String),

    #[error("advisor answer could not be parsed: {0}")]
    MalformedAnswer(String),
}
