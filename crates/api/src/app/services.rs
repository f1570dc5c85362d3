use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use sqlx::PgPool;
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use ecocrop_advisor::{CropAdvisor, HeuristicAdvisor, LlmAdvisor, LlmConfig};
use ecocrop_auth::Hs256TokenCodec;
use ecocrop_core::UserId;
use ecocrop_store::{
    AnalysisRecord, AnalysisStore, InMemoryAnalysisStore, InMemoryUserStore,
    PostgresAnalysisStore, PostgresUserStore, UserStore, init_schema,
};

/// Realtime message broadcasted via SSE.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeMessage {
    pub user_id: UserId,
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Everything the handlers need, wired once at startup.
pub struct AppServices {
    users: Arc<dyn UserStore>,
    analyses: Arc<dyn AnalysisStore>,
    advisor: Arc<dyn CropAdvisor>,
    tokens: Arc<Hs256TokenCodec>,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

pub async fn build_services(tokens: Arc<Hs256TokenCodec>) -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let (users, analyses): (Arc<dyn UserStore>, Arc<dyn AnalysisStore>) = if use_persistent {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
        let pool = PgPool::connect(&database_url)
            .await
            .expect("failed to connect to Postgres");
        init_schema(&pool).await.expect("failed to initialize schema");
        (
            Arc::new(PostgresUserStore::new(pool.clone())),
            Arc::new(PostgresAnalysisStore::new(pool)),
        )
    } else {
        (
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryAnalysisStore::new()),
        )
    };

    let advisor = build_advisor();

    // Realtime channel (SSE): lossy broadcast, user-filtered in handlers.
    let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

    AppServices {
        users,
        analyses,
        advisor,
        tokens,
        realtime_tx,
    }
}

fn build_advisor() -> Arc<dyn CropAdvisor> {
    let mode = std::env::var("ADVISOR_MODE").unwrap_or_else(|_| "heuristic".to_string());

    match mode.as_str() {
        "llm" => {
            let config = LlmConfig {
                base_url: std::env::var("ADVISOR_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                api_key: std::env::var("ADVISOR_API_KEY")
                    .expect("ADVISOR_API_KEY must be set when ADVISOR_MODE=llm"),
                model: std::env::var("ADVISOR_MODEL")
                    .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            };
            tracing::info!(model = %config.model, "using llm advisor");
            Arc::new(LlmAdvisor::new(config))
        }
        other => {
            if other != "heuristic" {
                tracing::warn!("unknown ADVISOR_MODE {other:?}, falling back to heuristic");
            }
            Arc::new(HeuristicAdvisor::new())
        }
    }
}

impl AppServices {
    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    pub fn analyses(&self) -> &Arc<dyn AnalysisStore> {
        &self.analyses
    }

    pub fn advisor(&self) -> &Arc<dyn CropAdvisor> {
        &self.advisor
    }

    pub fn tokens(&self) -> &Arc<Hs256TokenCodec> {
        &self.tokens
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }

    /// Broadcast that an analysis finished (lossy; no backpressure on the
    /// request path).
    pub fn publish_analysis_created(&self, record: &AnalysisRecord) {
        let _ = self.realtime_tx.send(RealtimeMessage {
            user_id: record.user_id,
            topic: "analysis.created".to_string(),
            payload: serde_json::json!({
                "id": record.id.to_string(),
                "crop_name": record.crop_name,
                "diagnosis": record.advice.diagnosis,
                "risk_level": record.advice.risk_level.as_str(),
            }),
        });
    }
}

/// Build an SSE stream scoped to one user (used by `/api/stream`).
pub fn user_sse_stream(
    services: Arc<AppServices>,
    user_id: UserId,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(m) if m.user_id == user_id => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        _ => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
