//! Crop recommendation.
//!
//! Two paths:
//! - [`recommend_by_soil`]: the coarse soil-class rule table. Takes annual
//!   rainfall in mm.
//! - [`rank_crops`]: nearest-profile ranking over a full [`FieldReading`].
//!   Each crop carries ideal ranges per measurement; a reading scores 1.0
//!   inside a range and decays linearly with the normalized distance outside
//!   it. Scores are averaged across all seven measurements.
//!
//! Both are pure and deterministic: same input, same answer.

use serde::{Deserialize, Serialize};

use ecocrop_core::DomainError;

use crate::crop::Crop;
use crate::reading::FieldReading;
use crate::soil::SoilType;

/// Coarse rule table: soil class plus annual rainfall/temperature.
pub fn recommend_by_soil(soil: SoilType, annual_rainfall_mm: f64, temperature_c: f64) -> Crop {
    match soil {
        SoilType::Clay if annual_rainfall_mm > 1000.0 => Crop::Rice,
        SoilType::Loam if temperature_c < 30.0 => Crop::Wheat,
        SoilType::Sandy => Crop::Maize,
        SoilType::Black => Crop::Cotton,
        _ => Crop::Sugarcane,
    }
}

/// A crop with its fit score in \[0, 1\].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropScore {
    pub crop: Crop,
    pub score: f64,
}

/// Ideal band for one measurement.
#[derive(Debug, Clone, Copy)]
struct Band {
    lo: f64,
    hi: f64,
}

impl Band {
    const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// 1.0 inside the band, decaying linearly with distance outside it,
    /// normalized by the band width. Floor at 0.0.
    fn score(&self, value: f64) -> f64 {
        let width = (self.hi - self.lo).max(1.0);
        let distance = if value < self.lo {
            self.lo - value
        } else if value > self.hi {
            value - self.hi
        } else {
            return 1.0;
        };
        (1.0 - distance / width).max(0.0)
    }
}

/// Agronomic profile: ideal measurement bands for one crop.
#[derive(Debug, Clone, Copy)]
struct CropProfile {
    crop: Crop,
    nitrogen: Band,
    phosphorus: Band,
    potassium: Band,
    temperature_c: Band,
    humidity_pct: Band,
    ph: Band,
    rainfall_mm: Band,
}

impl CropProfile {
    fn score(&self, reading: &FieldReading) -> f64 {
        let parts = [
            self.nitrogen.score(reading.nitrogen),
            self.phosphorus.score(reading.phosphorus),
            self.potassium.score(reading.potassium),
            self.temperature_c.score(reading.temperature_c),
            self.humidity_pct.score(reading.humidity_pct),
            self.ph.score(reading.ph),
            self.rainfall_mm.score(reading.rainfall_mm),
        ];
        parts.iter().sum::<f64>() / parts.len() as f64
    }
}

/// Ideal growing bands per crop (nutrients kg/ha, seasonal rainfall mm).
const PROFILES: [CropProfile; 5] = [
    CropProfile {
        crop: Crop::Rice,
        nitrogen: Band::new(60.0, 100.0),
        phosphorus: Band::new(35.0, 60.0),
        potassium: Band::new(35.0, 45.0),
        temperature_c: Band::new(20.0, 28.0),
        humidity_pct: Band::new(80.0, 85.0),
        ph: Band::new(5.0, 7.0),
        rainfall_mm: Band::new(150.0, 300.0),
    },
    CropProfile {
        crop: Crop::Wheat,
        nitrogen: Band::new(60.0, 100.0),
        phosphorus: Band::new(40.0, 70.0),
        potassium: Band::new(30.0, 50.0),
        temperature_c: Band::new(15.0, 25.0),
        humidity_pct: Band::new(50.0, 70.0),
        ph: Band::new(6.0, 7.5),
        rainfall_mm: Band::new(50.0, 120.0),
    },
    CropProfile {
        crop: Crop::Maize,
        nitrogen: Band::new(60.0, 100.0),
        phosphorus: Band::new(35.0, 60.0),
        potassium: Band::new(15.0, 25.0),
        temperature_c: Band::new(18.0, 27.0),
        humidity_pct: Band::new(55.0, 75.0),
        ph: Band::new(5.5, 7.0),
        rainfall_mm: Band::new(60.0, 110.0),
    },
    CropProfile {
        crop: Crop::Cotton,
        nitrogen: Band::new(100.0, 140.0),
        phosphorus: Band::new(35.0, 60.0),
        potassium: Band::new(15.0, 25.0),
        temperature_c: Band::new(22.0, 30.0),
        humidity_pct: Band::new(75.0, 85.0),
        ph: Band::new(6.0, 8.0),
        rainfall_mm: Band::new(60.0, 110.0),
    },
    CropProfile {
        crop: Crop::Sugarcane,
        nitrogen: Band::new(80.0, 120.0),
        phosphorus: Band::new(30.0, 60.0),
        potassium: Band::new(40.0, 60.0),
        temperature_c: Band::new(21.0, 32.0),
        humidity_pct: Band::new(70.0, 85.0),
        ph: Band::new(6.0, 7.5),
        rainfall_mm: Band::new(100.0, 200.0),
    },
];

/// Rank every known crop against a field reading, best fit first.
///
/// The reading is validated first; ties break on crop declaration order so
/// the ranking is total and reproducible.
pub fn rank_crops(reading: &FieldReading) -> Result<Vec<CropScore>, DomainError> {
    reading.validate()?;

    let mut scored: Vec<(usize, CropScore)> = PROFILES
        .iter()
        .enumerate()
        .map(|(idx, profile)| {
            (
                idx,
                CropScore {
                    crop: profile.crop,
                    score: profile.score(reading),
                },
            )
        })
        .collect();

    scored.sort_by(|(ia, a), (ib, b)| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| ia.cmp(ib))
    });

    Ok(scored.into_iter().map(|(_, s)| s).collect())
}
