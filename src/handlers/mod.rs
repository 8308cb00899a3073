mod form;
mod listing;
mod probes;
mod submit;
mod templates;
mod viewer;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::AppState;

pub type HandlerResult<T> = Result<T, HandlerError>;

#[derive(thiserror::Error, Debug)]
pub enum HandlerError {
    #[error("Could not store the submission: {0}")]
    Storage(anyhow::Error),
    #[error("Could not load the submissions: {0}")]
    Listing(anyhow::Error),
    #[error("Database is not available: {0}")]
    Unavailable(anyhow::Error),
    #[error("Failed to render a template: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        error!("{self}");

        let status = match self {
            HandlerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let page = Html("<p>Sorry, something went wrong on our side. Please try again later.</p>");
        (status, page).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form::page).post(submit::submit))
        .route("/collaborate-form", get(form::form_fragment))
        .route("/admin/collaborate-requests", get(listing::listing))
        .route("/healthz", get(probes::healthz))
        .route("/livez", get(probes::livez))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
