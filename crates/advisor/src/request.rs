use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};

use ecocrop_core::DomainError;

/// Largest accepted photo after base64 decoding (4 MiB).
const MAX_PHOTO_BYTES: usize = 4 * 1024 * 1024;

/// What the grower sends in for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub crop_name: String,
    pub growth_stage: String,
    pub symptoms: String,
    pub soil_moisture_pct: Option<f64>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    /// Base64-encoded photo of the affected plants, if any.
    pub photo_base64: Option<String>,
}

impl AnalysisRequest {
    /// Validate the request before any engine sees it.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, value) in [
            ("crop_name", &self.crop_name),
            ("growth_stage", &self.growth_stage),
            ("symptoms", &self.symptoms),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{name} must not be empty")));
            }
        }

        for (name, value) in [
            ("soil_moisture_pct", self.soil_moisture_pct),
            ("humidity_pct", self.humidity_pct),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                    return Err(DomainError::validation(format!(
                        "{name} must be within [0, 100]"
                    )));
                }
            }
        }
        if let Some(t) = self.temperature_c {
            if !t.is_finite() {
                return Err(DomainError::validation("temperature_c must be finite"));
            }
        }

        if let Some(photo) = &self.photo_base64 {
            let bytes = B64
                .decode(photo.trim())
                .map_err(|_| DomainError::validation("photo_base64 is not valid base64"))?;
            if bytes.is_empty() {
                return Err(DomainError::validation("photo_base64 decodes to nothing"));
            }
            if bytes.len() > MAX_PHOTO_BYTES {
                return Err(DomainError::validation(format!(
                    "photo exceeds the {} MiB limit",
                    MAX_PHOTO_BYTES / (1024 * 1024)
                )));
            }
        }

        Ok(())
    }

    pub fn has_photo(&self) -> bool {
        self.photo_base64.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            crop_name: "Tomato".to_string(),
            growth_stage: "Flowering".to_string(),
            symptoms: "Yellowing leaves with brown spots".to_string(),
            soil_moisture_pct: Some(45.0),
            temperature_c: Some(25.5),
            humidity_pct: Some(70.0),
            photo_base64: None,
        }
    }

    #[test]
    fn complete_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn blank_symptoms_rejected() {
        let mut r = request();
        r.symptoms = "   ".to_string();
        assert!(r.validate().is_err());
    }

    #[test]
    fn out_of_range_moisture_rejected() {
        let mut r = request();
        r.soil_moisture_pct = Some(140.0);
        assert!(r.validate().is_err());
    }

    #[test]
    fn valid_photo_passes() {
        let mut r = request();
        r.photo_base64 = Some(B64.encode(b"jpeg bytes"));
        assert!(r.validate().is_ok());
    }

    #[test]
    fn invalid_base64_photo_rejected() {
        let mut r = request();
        r.photo_base64 = Some("!!not base64!!".to_string());
        assert!(r.validate().is_err());
    }

    #[test]
    fn oversized_photo_rejected() {
        let mut r = request();
        r.photo_base64 = Some(B64.encode(vec![0u8; MAX_PHOTO_BYTES + 1]));
        assert!(r.validate().is_err());
    }
}
