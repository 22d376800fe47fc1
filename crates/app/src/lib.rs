//! ChronoChem application composition root
//!
//! Composes all domain routers into a single application.

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use chronochem_auth::{AuthBackend, AuthConfig};
use chronochem_chat::{ChatSettings, ChatState, ChatTurnService, PgChatStore};
use chronochem_common::config::Config;
use chronochem_llm::{LlmConfig, LlmService, LlmServiceFactory};
use chronochem_timeline::{TimelineRepositories, TimelineState};
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the main application router, building the completion client from
/// the environment
pub async fn create_app(config: &Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let llm_config = LlmConfig::from_env()?;
    tracing::info!(config = ?llm_config, "LLM configuration loaded");

    let settings = ChatSettings::from_llm_config(&llm_config, config.chat_history_limit);
    let llm: Arc<dyn LlmService> = Arc::from(LlmServiceFactory::create(llm_config)?);

    Ok(build_router(config, pool, llm, settings))
}

/// Assemble domain states and routers around an already-built completion client
pub fn build_router(
    config: &Config,
    pool: PgPool,
    llm: Arc<dyn LlmService>,
    settings: ChatSettings,
) -> Router {
    let auth = auth_backend(config);

    let timeline_state = TimelineState {
        repos: TimelineRepositories::new(pool.clone()),
        auth: auth.clone(),
    };

    let chat_service = ChatTurnService::new(Arc::new(PgChatStore::new(pool)), llm, settings);
    let chat_state = ChatState {
        service: Arc::new(chat_service),
        auth,
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "ChronoChem API v0.1.0" }),
        )
        .merge(chronochem_timeline::routes().with_state(timeline_state))
        .merge(chronochem_chat::routes().with_state(chat_state))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

fn auth_backend(config: &Config) -> AuthBackend {
    match &config.jwt_secret {
        Some(secret) => AuthBackend::new(AuthConfig {
            jwt_secret: secret.clone(),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
        }),
        None => {
            tracing::warn!("JWT_SECRET not set, all callers are anonymous");
            AuthBackend::disabled()
        }
    }
}

/// CORS policy from a comma-separated origin list; permissive when unset
pub fn build_cors_layer(allowed_origins: Option<&str>) -> Result<CorsLayer, anyhow::Error> {
    let Some(raw) = allowed_origins else {
        return Ok(CorsLayer::permissive());
    };

    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", o, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
