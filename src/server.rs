//! Axum router for the standby node's client-facing surface.
//!
//! A standby node serves no client traffic of its own: every inbound
//! request is redirected to the current leader's client address.  The
//! one exception is `/health`, which answers locally so probes do not
//! bounce off the node while it waits to join.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::debug;

use crate::agent::StandbyAgent;
use crate::errors::StandbyError;

/// Build the axum [`Router`] for a standby node.
///
/// The returned router is ready to be passed to `axum::serve`.
pub fn app(agent: Arc<StandbyAgent>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .fallback(redirect_to_leader)
        .with_state(agent)
}

/// `GET /health` -- Returns `{"status": "ok"}` with 200 OK.
async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "application/json")],
        r#"{"status":"ok"}"#,
    )
}

/// Catch-all: redirect the request to the leader's client address.
///
/// Uses `307 Temporary Redirect` so the client replays the same method
/// against the leader. Only a leader lookup happens under the agent's
/// lock; no network calls are made here. Without a known leader the
/// structured standby-internal error is returned instead of a guess.
async fn redirect_to_leader(
    State(agent): State<Arc<StandbyAgent>>,
    req: Request,
) -> Result<Response, StandbyError> {
    let leader = agent.cluster_leader().ok_or(StandbyError::NoLeader)?;

    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let location = format!(
        "{}{}",
        leader.client_url.trim_end_matches('/'),
        path_and_query
    );
    debug!("redirecting {} {} to {location}", req.method(), req.uri());

    Ok((
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location)],
    )
        .into_response())
}
