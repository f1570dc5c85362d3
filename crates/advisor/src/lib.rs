//! `ecocrop-advisor` — crop health advice boundary.
//!
//! This crate turns an analysis request (crop, growth stage, symptoms,
//! optional environment readings, optional photo) into structured advice.
//! It emits **advice payloads**, not domain state: persistence and transport
//! belong to the store/API layers.
//!
//! Two engines implement [`CropAdvisor`]:
//! - [`HeuristicAdvisor`]: deterministic keyword/threshold model, always
//!   available.
//! - [`LlmAdvisor`]: remote chat-completions model that degrades to the
//!   heuristic when the remote answer is unusable.

pub mod advice;
pub mod heuristic;
pub mod llm;
pub mod request;

use async_trait::async_trait;

pub use advice::{Advice, AdvisorError, RiskLevel};
pub use heuristic::HeuristicAdvisor;
pub use llm::{LlmAdvisor, LlmConfig};
pub use request::AnalysisRequest;

/// An engine that produces crop health advice.
#[async_trait]
pub trait CropAdvisor: Send + Sync {
    async fn advise(&self, request: &AnalysisRequest) -> Result<Advice, AdvisorError>;
}
