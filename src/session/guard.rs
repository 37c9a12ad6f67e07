//! Request guards built on the session cookie
//!
//! Handlers call these at the top, the way a view would be wrapped in
//! `login_required` / `anonymous_required`.

use crate::session::codec::{SessionClaims, SessionCodec};
use crate::session::cookie::extract_session_value;
use crate::utils::response_builder::ResponseBuilder;
use actix_web::{HttpRequest, HttpResponse};

/// Sign-in state of the current request
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub signin: bool,
    pub claims: Option<SessionClaims>,
}

impl SessionState {
    /// Resolve the sign-in state from the `sessionId` cookie
    #[must_use]
    pub fn from_request(req: &HttpRequest, codec: &SessionCodec) -> Self {
        let Some(value) = extract_session_value(req) else {
            return Self::default();
        };

        match codec.inspect(&value).claims() {
            Some(claims) => Self {
                signin: true,
                claims: Some(claims),
            },
            None => Self::default(),
        }
    }

    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.claims.as_ref().map(|claims| claims.uid.as_str())
    }
}

/// Require a signed-in user, else redirect to `sign_in_route`
///
/// # Errors
///
/// Returns the redirect response when the request has no live session
pub fn login_required(
    req: &HttpRequest,
    codec: &SessionCodec,
    sign_in_route: &str,
) -> Result<SessionClaims, HttpResponse> {
    SessionState::from_request(req, codec)
        .claims
        .ok_or_else(|| ResponseBuilder::redirect(sign_in_route))
}

/// Require an anonymous visitor, else redirect to `home_route`
///
/// # Errors
///
/// Returns the redirect response when the request already has a live session
pub fn anonymous_required(
    req: &HttpRequest,
    codec: &SessionCodec,
    home_route: &str,
) -> Result<(), HttpResponse> {
    if SessionState::from_request(req, codec).signin {
        Err(ResponseBuilder::redirect(home_route))
    } else {
        Ok(())
    }
}
