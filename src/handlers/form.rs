use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use strum::IntoEnumIterator;

use crate::{
    models::CollabType,
    utils::nonce::{SUBMIT_ACTION, TOKEN_FIELD},
    AppState,
};

use super::{
    templates::{CollaborateForm, CollaboratePage},
    HandlerResult,
};

pub const SUCCESS_PARAM: &str = "collab_success";

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    collab_success: Option<String>,
}

pub async fn page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Html<String>> {
    let success = query.collab_success.as_deref() == Some("1");
    Ok(Html(render_page(&state, success, &[])?))
}

/// The bare form, for embedding into other pages.
pub async fn form_fragment(State(state): State<AppState>) -> HandlerResult<Html<String>> {
    Ok(Html(render_form(&state)?))
}

pub(super) fn render_form(state: &AppState) -> Result<String, askama::Error> {
    let nonce = state.form_tokens.issue(SUBMIT_ACTION);

    CollaborateForm {
        token_field: TOKEN_FIELD,
        nonce: &nonce,
        choices: CollabType::iter().collect(),
    }
    .render()
}

pub(super) fn render_page(
    state: &AppState,
    success: bool,
    errors: &[String],
) -> Result<String, askama::Error> {
    let form = render_form(state)?;

    CollaboratePage {
        form: &form,
        success,
        errors,
    }
    .render()
}
