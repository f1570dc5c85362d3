use core::str::FromStr;
use serde::{Deserialize, Serialize};

use ecocrop_core::DomainError;

/// Crops the advisory model knows how to place.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Rice,
    Wheat,
    Maize,
    Cotton,
    Sugarcane,
}

impl Crop {
    /// Declaration order doubles as the stable tie-break for rankings.
    pub const ALL: [Crop; 5] = [
        Crop::Rice,
        Crop::Wheat,
        Crop::Maize,
        Crop::Cotton,
        Crop::Sugarcane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Rice => "rice",
            Crop::Wheat => "wheat",
            Crop::Maize => "maize",
            Crop::Cotton => "cotton",
            Crop::Sugarcane => "sugarcane",
        }
    }
}

impl core::fmt::Display for Crop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Crop {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rice" => Ok(Crop::Rice),
            "wheat" => Ok(Crop::Wheat),
            "maize" => Ok(Crop::Maize),
            "cotton" => Ok(Crop::Cotton),
            "sugarcane" => Ok(Crop::Sugarcane),
            other => Err(DomainError::validation(format!("unknown crop: {other}"))),
        }
    }
}
