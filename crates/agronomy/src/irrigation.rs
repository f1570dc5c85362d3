//! Threshold-based irrigation advice.

use serde::{Deserialize, Serialize};

use ecocrop_core::DomainError;

/// What the grower should do with water right now.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationAction {
    Irrigate,
    Hold,
    DrainRisk,
}

/// An action plus the threshold reasoning behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrigationAdvice {
    pub action: IrrigationAction,
    pub reason: String,
}

/// Soil moisture below this needs water.
const MOISTURE_LOW_PCT: f64 = 25.0;
/// Soil moisture above this risks waterlogging.
const MOISTURE_HIGH_PCT: f64 = 60.0;
/// Hot-and-dry escalation thresholds.
const HOT_TEMPERATURE_C: f64 = 32.0;
const DRY_HUMIDITY_PCT: f64 = 40.0;

/// Map a moisture reading (plus optional weather) to an action.
///
/// Moisture alone picks the band; a hot and dry atmosphere escalates a Hold
/// to Irrigate because evapotranspiration will drain the band early.
pub fn irrigation_advice(
    soil_moisture_pct: f64,
    temperature_c: Option<f64>,
    humidity_pct: Option<f64>,
) -> Result<IrrigationAdvice, DomainError> {
    if !soil_moisture_pct.is_finite() || !(0.0..=100.0).contains(&soil_moisture_pct) {
        return Err(DomainError::validation(
            "soil_moisture_pct must be within [0, 100]",
        ));
    }

    if soil_moisture_pct < MOISTURE_LOW_PCT {
        return Ok(IrrigationAdvice {
            action: IrrigationAction::Irrigate,
            reason: format!(
                "soil moisture {soil_moisture_pct:.0}% is below the {MOISTURE_LOW_PCT:.0}% floor"
            ),
        });
    }

    if soil_moisture_pct > MOISTURE_HIGH_PCT {
        return Ok(IrrigationAdvice {
            action: IrrigationAction::DrainRisk,
            reason: format!(
                "soil moisture {soil_moisture_pct:.0}% exceeds the {MOISTURE_HIGH_PCT:.0}% ceiling; check drainage"
            ),
        });
    }

    let hot = temperature_c.is_some_and(|t| t > HOT_TEMPERATURE_C);
    let dry = humidity_pct.is_some_and(|h| h < DRY_HUMIDITY_PCT);
    if hot && dry {
        return Ok(IrrigationAdvice {
            action: IrrigationAction::Irrigate,
            reason: format!(
                "moisture {soil_moisture_pct:.0}% is adequate but hot, dry air will deplete it; irrigate early"
            ),
        });
    }

    Ok(IrrigationAdvice {
        action: IrrigationAction::Hold,
        reason: format!(
            "soil moisture {soil_moisture_pct:.0}% sits inside the {MOISTURE_LOW_PCT:.0}-{MOISTURE_HIGH_PCT:.0}% band"
        ),
    })
}
