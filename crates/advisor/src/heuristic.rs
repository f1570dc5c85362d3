//! Deterministic symptom/threshold advice engine.
//!
//! Model:
//! - Symptoms are matched against keyword classes in a fixed priority order.
//! - Environment readings modulate the risk level (hot and dry soil raises
//!   water-stress risk; humid air raises fungal risk).
//! - Unmatched symptoms produce conservative monitoring advice rather than
//!   an error.

use async_trait::async_trait;

use ecocrop_agronomy::irrigation_advice;

use crate::advice::{Advice, AdvisorError, RiskLevel};
use crate::request::AnalysisRequest;
use crate::CropAdvisor;

/// Humid air above this favors fungal spread.
const FUNGAL_HUMIDITY_PCT: f64 = 75.0;
/// Soil drier than this under heat means acute water stress.
const STRESS_MOISTURE_PCT: f64 = 25.0;
const STRESS_TEMPERATURE_C: f64 = 32.0;

#[derive(Debug, Clone, Copy)]
struct SymptomClass {
    keywords: &'static [&'static str],
    diagnosis: &'static str,
    confidence_pct: u8,
    immediate_action: &'static str,
    sustainable_treatment: &'static str,
    base_risk: RiskLevel,
    humidity_sensitive: bool,
    moisture_sensitive: bool,
}

/// Priority-ordered: the first class with a keyword hit wins.
const CLASSES: [SymptomClass; 4] = [
    SymptomClass {
        keywords: &["spot", "blight", "mold", "mould", "mildew", "rust", "lesion"],
        diagnosis: "Fungal leaf disease suspected",
        confidence_pct: 72,
        immediate_action: "Remove and destroy affected leaves; avoid overhead watering",
        sustainable_treatment:
            "Apply a neem oil or bicarbonate spray and widen plant spacing for airflow; rotate crops next season",
        base_risk: RiskLevel::Medium,
        humidity_sensitive: true,
        moisture_sensitive: false,
    },
    SymptomClass {
        keywords: &["hole", "chew", "insect", "aphid", "borer", "caterpillar", "larva"],
        diagnosis: "Pest infestation",
        confidence_pct: 70,
        immediate_action: "Hand-pick visible pests and inspect leaf undersides",
        sustainable_treatment:
            "Introduce beneficial insects and use neem-based sprays before considering anything synthetic",
        base_risk: RiskLevel::Medium,
        humidity_sensitive: false,
        moisture_sensitive: false,
    },
    SymptomClass {
        keywords: &["wilt", "droop", "curl", "dry", "scorch"],
        diagnosis: "Water stress",
        confidence_pct: 68,
        immediate_action: "Check soil moisture at root depth and shade young plants",
        sustainable_treatment: "Mulch around the base and switch to early-morning drip irrigation",
        base_risk: RiskLevel::Medium,
        humidity_sensitive: false,
        moisture_sensitive: true,
    },
    SymptomClass {
        keywords: &["yellow", "chlorosis", "pale", "stunt"],
        diagnosis: "Nutrient deficiency (chlorosis)",
        confidence_pct: 65,
        immediate_action: "Test soil nitrogen before feeding",
        sustainable_treatment: "Side-dress with compost or a legume cover crop instead of synthetic nitrogen",
        base_risk: RiskLevel::Low,
        humidity_sensitive: false,
        moisture_sensitive: false,
    },
];

/// Always-available advice engine; never needs the network.
#[derive(Debug, Clone, Default)]
pub struct HeuristicAdvisor;

impl HeuristicAdvisor {
    pub fn new() -> Self {
        Self
    }

    fn efficiency_tip(request: &AnalysisRequest) -> String {
        match request.soil_moisture_pct {
            Some(moisture) => {
                match irrigation_advice(moisture, request.temperature_c, request.humidity_pct) {
                    Ok(advice) => advice.reason,
                    Err(_) => "Implement drip irrigation to conserve water".to_string(),
                }
            }
            None => "Implement drip irrigation to conserve water".to_string(),
        }
    }

    fn classify(request: &AnalysisRequest) -> Advice {
        let symptoms = request.symptoms.to_lowercase();

        let matched = CLASSES
            .iter()
            .find(|class| class.keywords.iter().any(|k| symptoms.contains(k)));

        let Some(class) = matched else {
            // Nothing recognizable: monitor rather than guess.
            return Advice {
                diagnosis: "Analysis completed".to_string(),
                confidence_pct: 75,
                immediate_action: "Monitor crop closely".to_string(),
                sustainable_treatment:
                    "Scout the field twice a week and photograph symptom progression".to_string(),
                resource_efficiency_tip: Self::efficiency_tip(request),
                risk_level: RiskLevel::Medium,
            };
        };

        let mut risk = class.base_risk;

        if class.humidity_sensitive
            && request.humidity_pct.is_some_and(|h| h > FUNGAL_HUMIDITY_PCT)
        {
            risk = risk.escalate();
        }
        if class.moisture_sensitive {
            let parched = request
                .soil_moisture_pct
                .is_some_and(|m| m < STRESS_MOISTURE_PCT);
            let hot = request
                .temperature_c
                .is_some_and(|t| t > STRESS_TEMPERATURE_C);
            if parched && hot {
                risk = risk.escalate();
            }
        }

        Advice {
            diagnosis: class.diagnosis.to_string(),
            confidence_pct: class.confidence_pct,
            immediate_action: class.immediate_action.to_string(),
            sustainable_treatment: class.sustainable_treatment.to_string(),
            resource_efficiency_tip: Self::efficiency_tip(request),
            risk_level: risk,
        }
    }
}

#[async_trait]
impl CropAdvisor for HeuristicAdvisor {
    async fn advise(&self, request: &AnalysisRequest) -> Result<Advice, AdvisorError> {
        request.validate()?;
        Ok(Self::classify(request))
    }
}
