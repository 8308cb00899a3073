use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use sha2::{Digest, Sha256};

use crate::AppState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Allowed to see what visitors submitted.
    ManageOptions,
}

/// Whoever is looking at a page.
///
/// Requests carrying `Authorization: Bearer <admin token>` belong to the administrator,
/// everything else is anonymous.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Administrator,
}

impl Viewer {
    pub fn can(&self, capability: Capability) -> bool {
        match (self, capability) {
            (Viewer::Administrator, Capability::ManageOptions) => true,
            (Viewer::Anonymous, _) => false,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token);

        match presented {
            Some(token) if tokens_match(token, &state.admin_token) => Ok(Viewer::Administrator),
            _ => Ok(Viewer::Anonymous),
        }
    }
}

/// Token of an `Authorization: Bearer <token>` value. The scheme is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim_start().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
}

// Digests are compared so the timing does not depend on the common prefix.
fn tokens_match(presented: &str, expected: &str) -> bool {
    !expected.is_empty()
        && Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}
