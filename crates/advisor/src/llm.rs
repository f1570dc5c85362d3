//! Remote chat-completions advice engine.
//!
//! Speaks the OpenAI-style `/chat/completions` shape: one system message
//! carrying the advice contract, one user message carrying the reading.
//! The remote model is asked for a bare JSON object; answers wrapped in
//! Markdown fences or surrounded by prose are still accepted. Anything the
//! parser cannot salvage degrades to the [`HeuristicAdvisor`] instead of
//! failing the request.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::CropAdvisor;
use crate::advice::{Advice, AdvisorError, RiskLevel};
use crate::heuristic::HeuristicAdvisor;
use crate::request::AnalysisRequest;

const SYSTEM_PROMPT: &str = "You are EcoCrop, a sustainable agriculture expert. \
Analyze crop health data and provide eco-friendly farming advice.\n\n\
You MUST respond with ONLY valid JSON in this exact format:\n\
{\n\
  \"diagnosis\": \"Brief diagnosis (e.g. Early Blight, Water Stress)\",\n\
  \"confidence_score\": 85,\n\
  \"immediate_action\": \"Urgent step needed\",\n\
  \"sustainable_treatment\": \"Detailed organic/eco-friendly solution\",\n\
  \"resource_efficiency_tip\": \"Water/energy saving advice\",\n\
  \"risk_level\": \"Low or Medium or High\"\n\
}\n\n\
Prioritize organic pest control over synthetic pesticides, water-efficient \
irrigation, soil health through composting and crop rotation, and minimal \
chemical runoff.";

/// Connection settings for the remote model.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Chat-completions advisor with heuristic fallback.
pub struct LlmAdvisor {
    client: reqwest::Client,
    config: LlmConfig,
    fallback: HeuristicAdvisor,
}

impl LlmAdvisor {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            fallback: HeuristicAdvisor::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn user_prompt(request: &AnalysisRequest) -> String {
        let mut prompt = format!(
            "Analyze this crop:\nCrop: {}\nGrowth Stage: {}\nSymptoms: {}\n",
            request.crop_name, request.growth_stage, request.symptoms
        );

        if let Some(moisture) = request.soil_moisture_pct {
            prompt.push_str(&format!("Soil Moisture: {moisture}%\n"));
        }
        if let Some(temperature) = request.temperature_c {
            prompt.push_str(&format!("Temperature: {temperature}°C\n"));
        }
        if let Some(humidity) = request.humidity_pct {
            prompt.push_str(&format!("Humidity: {humidity}%\n"));
        }
        if request.has_photo() {
            prompt.push_str("A photo of the crop symptoms is attached for visual context.\n");
        }

        prompt.push_str("\nProvide analysis in JSON format only.");
        prompt
    }

    async fn ask_remote(&self, request: &AnalysisRequest) -> Result<Advice, AdvisorError> {
        let body = json!({
            "model": self.config.model,
            "temperature": 0.2,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::user_prompt(request) },
            ],
        });

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdvisorError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::Upstream(format!(
                "chat completions returned {status}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AdvisorError::Upstream(e.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AdvisorError::MalformedAnswer("empty completion".to_string()))?;

        parse_advice(content)
    }
}

#[async_trait]
impl CropAdvisor for LlmAdvisor {
    async fn advise(&self, request: &AnalysisRequest) -> Result<Advice, AdvisorError> {
        request.validate()?;

        match self.ask_remote(request).await {
            Ok(advice) => Ok(advice),
            Err(AdvisorError::InvalidInput(e)) => Err(AdvisorError::InvalidInput(e)),
            Err(e) => {
                tracing::warn!("llm advisor degraded to heuristic: {e}");
                self.fallback.advise(request).await
            }
        }
    }
}

/// Strip Markdown fences / surrounding prose and keep the outermost object.
fn extract_json_object(content: &str) -> Option<&str> {
    let trimmed = content.trim();

    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.strip_suffix("```").unwrap_or(rest))
        .unwrap_or(trimmed);

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    (end > start).then(|| &unfenced[start..=end])
}

/// Parse a remote answer into [`Advice`], tolerating sloppy field types.
///
/// Missing fields fall back to conservative defaults; only an answer with no
/// parseable JSON object at all is an error.
fn parse_advice(content: &str) -> Result<Advice, AdvisorError> {
    let object = extract_json_object(content)
        .ok_or_else(|| AdvisorError::MalformedAnswer("no JSON object in answer".to_string()))?;

    let value: Value = serde_json::from_str(object)
        .map_err(|e| AdvisorError::MalformedAnswer(e.to_string()))?;
    if !value.is_object() {
        return Err(AdvisorError::MalformedAnswer(
            "answer is not a JSON object".to_string(),
        ));
    }

    let text = |key: &str, default: &str| -> String {
        value[key]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    let confidence_pct = match &value["confidence_score"] {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
    .clamp(0.0, 100.0)
    .round() as u8;

    let risk_level = value["risk_level"]
        .as_str()
        .and_then(|s| s.parse::<RiskLevel>().ok())
        .unwrap_or(RiskLevel::Medium);

    Ok(Advice {
        diagnosis: text("diagnosis", "Unknown"),
        confidence_pct,
        immediate_action: text("immediate_action", "Monitor crop closely"),
        sustainable_treatment: text("sustainable_treatment", ""),
        resource_efficiency_tip: text(
            "resource_efficiency_tip",
            "Implement drip irrigation to conserve water",
        ),
        risk_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWER: &str = r#"{
        "diagnosis": "Early Blight",
        "confidence_score": 85,
        "immediate_action": "Remove affected foliage",
        "sustainable_treatment": "Copper-free biofungicide",
        "resource_efficiency_tip": "Water at dawn",
        "risk_level": "High"
    }"#;

    #[test]
    fn bare_json_parses() {
        let advice = parse_advice(ANSWER).unwrap();
        assert_eq!(advice.diagnosis, "Early Blight");
        assert_eq!(advice.confidence_pct, 85);
        assert_eq!(advice.risk_level, RiskLevel::High);
    }

    #[test]
    fn fenced_json_parses() {
        let fenced = format!("```json\n{ANSWER}\n```");
        let advice = parse_advice(&fenced).unwrap();
        assert_eq!(advice.diagnosis, "Early Blight");
    }

    #[test]
    fn prose_around_json_parses() {
        let wrapped = format!("Here is my analysis:\n{ANSWER}\nHope that helps!");
        let advice = parse_advice(&wrapped).unwrap();
        assert_eq!(advice.diagnosis, "Early Blight");
    }

    #[test]
    fn string_confidence_is_coerced_and_clamped() {
        let advice =
            parse_advice(r#"{"diagnosis": "x", "confidence_score": "92.4", "risk_level": "low"}"#)
                .unwrap();
        assert_eq!(advice.confidence_pct, 92);

        let advice = parse_advice(r#"{"confidence_score": 250}"#).unwrap();
        assert_eq!(advice.confidence_pct, 100);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let advice = parse_advice("{}").unwrap();
        assert_eq!(advice.diagnosis, "Unknown");
        assert_eq!(advice.confidence_pct, 0);
        assert_eq!(advice.risk_level, RiskLevel::Medium);
        assert!(advice.resource_efficiency_tip.contains("drip irrigation"));
    }

    #[test]
    fn unknown_risk_defaults_to_medium() {
        let advice = parse_advice(r#"{"risk_level": "catastrophic"}"#).unwrap();
        assert_eq!(advice.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn answers_without_json_are_rejected() {
        assert!(matches!(
            parse_advice("I am sorry, I cannot help with that."),
            Err(AdvisorError::MalformedAnswer(_))
        ));
    }

    #[test]
    fn user_prompt_includes_optional_readings() {
        let request = AnalysisRequest {
            crop_name: "Wheat".to_string(),
            growth_stage: "Vegetative".to_string(),
            symptoms: "Rust-colored spots".to_string(),
            soil_moisture_pct: Some(30.0),
            temperature_c: Some(22.0),
            humidity_pct: None,
            photo_base64: Some("aGVsbG8".to_string()),
        };

        let prompt = LlmAdvisor::user_prompt(&request);
        assert!(prompt.contains("Crop: Wheat"));
        assert!(prompt.contains("Soil Moisture: 30%"));
        assert!(prompt.contains("Temperature: 22°C"));
        assert!(!prompt.contains("Humidity:"));
        assert!(prompt.contains("photo"));
    }
}
