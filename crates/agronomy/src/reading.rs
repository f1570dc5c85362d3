use serde::{Deserialize, Serialize};

use ecocrop_core::DomainError;

/// One soil/climate measurement row for a field.
///
/// Units: nutrients in kg/ha, temperature in °C, humidity in %, rainfall in
/// mm over the growing season.
///
/// # Invariants
/// - All values are finite.
/// - Nutrients and rainfall are non-negative.
/// - pH lies in \[0, 14\], humidity in \[0, 100\].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldReading {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub ph: f64,
    pub rainfall_mm: f64,
}

impl FieldReading {
    /// Validate the reading against the invariants above.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
            ("temperature_c", self.temperature_c),
            ("humidity_pct", self.humidity_pct),
            ("ph", self.ph),
            ("rainfall_mm", self.rainfall_mm),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(DomainError::validation(format!("{name} must be finite")));
            }
        }

        for (name, value) in [
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
            ("rainfall_mm", self.rainfall_mm),
        ] {
            if value < 0.0 {
                return Err(DomainError::validation(format!("{name} must be >= 0")));
            }
        }

        if !(0.0..=14.0).contains(&self.ph) {
            return Err(DomainError::validation("ph must be within [0, 14]"));
        }
        if !(0.0..=100.0).contains(&self.humidity_pct) {
            return Err(DomainError::validation("humidity_pct must be within [0, 100]"));
        }

        Ok(())
    }
}
