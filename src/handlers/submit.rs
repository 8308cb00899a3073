use axum::{
    extract::{rejection::FormRejection, OriginalUri, State},
    http::{header::REFERER, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    models::{NewSubmission, SubmissionFields},
    utils::{nonce::SUBMIT_ACTION, query_arg::add_query_arg},
    AppState,
};

use super::{
    form::{render_page, SUCCESS_PARAM},
    HandlerError, HandlerResult,
};

#[derive(Debug, Deserialize)]
pub struct SubmissionForm {
    collab_submit: Option<String>,
    collaborate_nonce: Option<String>,
    collab_type: Option<String>,
    collab_job_title: Option<String>,
    collab_company: Option<String>,
    collab_phone: Option<String>,
    collab_email: Option<String>,
}

/// Stores a collaboration request and sends the visitor back where they came from.
///
/// Posts that cannot be parsed, or come without the submit marker or a valid form token,
/// are answered with the plain form page and leave no trace.
pub async fn submit(
    State(state): State<AppState>,
    OriginalUri(request_uri): OriginalUri,
    headers: HeaderMap,
    form: Result<Form<SubmissionForm>, FormRejection>,
) -> HandlerResult<Response> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("Could not read the posted form: {rejection}");
            return Ok(Html(render_page(&state, false, &[])?).into_response());
        }
    };

    if form.collab_submit.is_none() {
        debug!("Form posted without the submit marker");
        return Ok(Html(render_page(&state, false, &[])?).into_response());
    }

    let Some(token_age) = form
        .collaborate_nonce
        .as_deref()
        .and_then(|token| state.form_tokens.verify(SUBMIT_ACTION, token))
    else {
        debug!("Missing or invalid form token, ignoring the submission");
        return Ok(Html(render_page(&state, false, &[])?).into_response());
    };

    debug!("Form token accepted ({token_age:?})");

    let fields = SubmissionFields {
        collab_type: form.collab_type,
        job_title: form.collab_job_title,
        company: form.collab_company,
        phone: form.collab_phone,
        email: form.collab_email,
    };

    let new_submission = match NewSubmission::from_fields(fields) {
        Ok(submission) => submission,
        Err(errors) => {
            info!("Rejected a submission: {errors}");
            let messages = errors.0.iter().map(ToString::to_string).collect::<Vec<_>>();
            let page = render_page(&state, false, &messages)?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        }
    };

    let submission = state
        .submission_repository
        .add_submission(&new_submission)
        .await
        .map_err(HandlerError::Storage)?;

    info!(
        "Stored collaboration request {:?} ({})",
        submission.id, submission.collab_type
    );

    let target = add_query_arg(&return_target(&headers, &request_uri), SUCCESS_PARAM, "1");
    Ok(Redirect::to(&target).into_response())
}

/// Path and query of the referring page, or of the current request without a usable referer.
///
/// Only the path is taken from the referer, so the redirect never leaves this host.
fn return_target(headers: &HeaderMap, request_uri: &Uri) -> String {
    headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_owned()))
        .filter(|target| target.starts_with('/') && !target.starts_with("//"))
        .or_else(|| request_uri.path_and_query().map(|pq| pq.as_str().to_owned()))
        .unwrap_or_else(|| "/".to_owned())
}

#[cfg(test)]
mod tests {
    use axum::http::{header::REFERER, HeaderMap, HeaderValue, Uri};

    use super::return_target;

    fn referer(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn uses_referer_path() {
        assert_eq!(
            return_target(
                &referer("https://example.com/contact?lang=en"),
                &Uri::from_static("/")
            ),
            "/contact?lang=en"
        );
    }

    #[test]
    fn relative_referer() {
        assert_eq!(
            return_target(&referer("/about"), &Uri::from_static("/")),
            "/about"
        );
    }

    #[test]
    fn foreign_host_keeps_only_path() {
        assert_eq!(
            return_target(&referer("https://evil.example/phish"), &Uri::from_static("/")),
            "/phish"
        );
    }

    #[test]
    fn protocol_relative_referer_is_ignored() {
        assert_eq!(
            return_target(&referer("//evil.example/phish"), &Uri::from_static("/")),
            "/"
        );
    }

    #[test]
    fn falls_back_to_request_uri() {
        assert_eq!(
            return_target(&HeaderMap::new(), &Uri::from_static("/join?ref=mail")),
            "/join?ref=mail"
        );
    }
}
