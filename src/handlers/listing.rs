use askama::Template;
use axum::{extract::State, response::Html};
use tracing::debug;

use crate::AppState;

use super::{
    templates::{ListingPage, ListingRow},
    viewer::{Capability, Viewer},
    HandlerError, HandlerResult,
};

/// The table of all collaboration requests, newest first.
///
/// Viewers without the capability get an empty page.
pub async fn listing(
    State(state): State<AppState>,
    viewer: Viewer,
) -> HandlerResult<Html<String>> {
    if !viewer.can(Capability::ManageOptions) {
        debug!("Viewer {viewer:?} may not see the collaboration requests");
        return Ok(Html(String::new()));
    }

    let rows = state
        .submission_repository
        .list_newest_first()
        .await
        .map_err(HandlerError::Listing)?
        .into_iter()
        .map(ListingRow::from)
        .collect();

    Ok(Html(ListingPage { rows }.render()?))
}
