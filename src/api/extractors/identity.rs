//! Caller identity for the like ledger.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::api::middleware::{client_ip, resolve_user};
use crate::api::AppState;
use crate::config::{CLIENT_TOKEN_HEADER, CLIENT_TOKEN_IDENTITY_PREFIX, MAX_CLIENT_TOKEN_LENGTH};
use crate::domain::{Identity, IdentityStrategy};
use crate::errors::AppError;

/// Who is calling: the session user when logged in, otherwise an anonymous
/// key derived with the configured [`IdentityStrategy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for RequestIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = resolve_user(state, &parts.headers).await? {
            return Ok(RequestIdentity(Identity::User(user.id)));
        }

        let key = match state.settings.identity_strategy {
            IdentityStrategy::ClientIp => {
                client_ip(&parts.headers, &parts.extensions, state.settings.trust_proxy)
            }
            IdentityStrategy::ClientToken => {
                let token = parts
                    .headers
                    .get(CLIENT_TOKEN_HEADER)
                    .and_then(|h| h.to_str().ok())
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| AppError::bad_request("X-Client-Token header is required"))?;

                if token.len() > MAX_CLIENT_TOKEN_LENGTH {
                    return Err(AppError::bad_request("X-Client-Token is too long"));
                }
                format!("{}{}", CLIENT_TOKEN_IDENTITY_PREFIX, token)
            }
        };

        Ok(RequestIdentity(Identity::Anonymous(key)))
    }
}
