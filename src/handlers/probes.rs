use axum::extract::State;
use tracing::debug;

use crate::AppState;

use super::{HandlerError, HandlerResult};

pub async fn livez() -> &'static str {
    debug!("service is live");
    "OK"
}

pub async fn healthz(State(state): State<AppState>) -> HandlerResult<&'static str> {
    state
        .submission_repository
        .ping()
        .await
        .map_err(HandlerError::Unavailable)?;
    debug!("service is healthy");
    Ok("OK")
}
