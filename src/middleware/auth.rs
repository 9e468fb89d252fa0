use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::time::Duration;

use crate::auth::{Bearer, Principal};
use crate::config;
use crate::error::ApiError;
use crate::session::{self, SessionStore};
use crate::state::AppState;

// Static Bearer text
const BEARER: &str = "Bearer";

const MALFORMED_HEADER: &str = "must supply a valid Authorization header (Bearer <token>)";
const BAD_TOKEN: &str = "invalid or expired token";

/// Token gate middleware. Every protected route passes through here before
/// any handler or database access runs.
///
/// Validates the bearer token against the session store and injects an
/// immutable [`Principal`] plus the raw header value (for forwarding to
/// sibling services) into the request extensions. Rejects with 401 before
/// any domain work otherwise.
pub async fn token_gate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized(MALFORMED_HEADER))?;

    let token = extract_bearer_token(header_value)?;
    let principal = authenticate(state.sessions.as_ref(), &token).await?;

    request.extensions_mut().insert(principal);
    request.extensions_mut().insert(Bearer(header_value.to_string()));

    Ok(next.run(request).await)
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
fn extract_bearer_token(header: &str) -> Result<String, ApiError> {
    let rest = header
        .strip_prefix(BEARER)
        .ok_or_else(|| ApiError::unauthorized(MALFORMED_HEADER))?;

    // The scheme must be followed by whitespace, not be a prefix of a longer word
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return Err(ApiError::unauthorized(MALFORMED_HEADER));
    }

    Ok(rest.trim().to_string())
}

/// Resolve a token to a principal via the session store.
///
/// A session lives at `user:<token>` with `name` and `group` fields. A
/// missing or empty `name` means the token is unknown or expired. Store
/// failures and timeouts also surface as 401; the gate never lets a request
/// through on a store error.
async fn authenticate(store: &dyn SessionStore, token: &str) -> Result<Principal, ApiError> {
    let key = session::session_key(token);
    let timeout = Duration::from_millis(config::config().session.lookup_timeout_ms);

    let username = match lookup(store, &key, session::FIELD_NAME, timeout).await? {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ApiError::unauthorized(BAD_TOKEN)),
    };
    let group = lookup(store, &key, session::FIELD_GROUP, timeout)
        .await?
        .unwrap_or_default();

    Ok(Principal::new(username, group))
}

async fn lookup(
    store: &dyn SessionStore,
    key: &str,
    field: &str,
    timeout: Duration,
) -> Result<Option<String>, ApiError> {
    match tokio::time::timeout(timeout, store.field(key, field)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::warn!("session store lookup failed: {}", e);
            Err(ApiError::unauthorized(BAD_TOKEN))
        }
        Err(_) => {
            tracing::warn!("session store lookup timed out after {:?}", timeout);
            Err(ApiError::unauthorized(BAD_TOKEN))
        }
    }
}
