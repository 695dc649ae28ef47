use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::BotIdentity;

use super::github::GithubApp;
use super::runner::{sweep, Runner};
use super::webhook::{extract_target, verify_signature};

const SIGNATURE_HEADER: &str = "x-hub-signature";
const EVENT_HEADER: &str = "x-github-event";

pub struct ServerState {
    pub app: GithubApp,
    pub secret: Option<Vec<u8>>,
    pub bot: BotIdentity,
    pub dry_run: bool,
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/hook", post(hook_handler))
        .route("/cron", get(cron_handler).post(cron_handler))
        .route("/health", get(health_check))
        .with_state(state)
}

pub async fn serve(address: &str, state: Arc<ServerState>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("could not listen on {address}"))?;
    info!("deadline-reminder listening on {address}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn hook_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let signature = header(&headers, SIGNATURE_HEADER);
    if let Err(err) = verify_signature(signature, &body, state.secret.as_deref()) {
        warn!("bad signature: {err}");
        return (StatusCode::FORBIDDEN, "forbidden");
    }

    let event = header(&headers, EVENT_HEADER).unwrap_or_default();
    let target = match extract_target(event, &body) {
        Ok(target) => target,
        Err(err) => {
            warn!("could not extract issue info: {err}");
            return (StatusCode::BAD_REQUEST, "bad request");
        }
    };

    let client = match state.app.installation(target.installation).await {
        Ok(client) => client,
        Err(err) => {
            error!("{err:#}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
        }
    };

    let runner = Runner::new(client, state.bot.clone()).dry_run(state.dry_run);
    match runner.update_issue(&target.repo, target.number).await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(err) => {
            error!("could not update issue: {err:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn cron_handler(State(state): State<Arc<ServerState>>) -> (StatusCode, &'static str) {
    match sweep(&state.app, &state.bot, state.dry_run).await {
        Ok(summary) if summary.failures == 0 => (StatusCode::OK, "ok"),
        Ok(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        Err(err) => {
            error!("{err:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

async fn health_check() -> &'static str {
    "ok"
}
