use core::str::FromStr;
use serde::{Deserialize, Serialize};

use ecocrop_core::DomainError;

/// Broad soil classes the rule-based recommender distinguishes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Clay,
    Loam,
    Sandy,
    Black,
}

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Clay => "clay",
            SoilType::Loam => "loam",
            SoilType::Sandy => "sandy",
            SoilType::Black => "black",
        }
    }
}

impl core::fmt::Display for SoilType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoilType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clay" => Ok(SoilType::Clay),
            "loam" => Ok(SoilType::Loam),
            "sandy" => Ok(SoilType::Sandy),
            "black" => Ok(SoilType::Black),
            other => Err(DomainError::validation(format!(
                "unknown soil type: {other} (expected clay, loam, sandy or black)"
            ))),
        }
    }
}
