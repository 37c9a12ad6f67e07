use actix_web::{cookie::Cookie, HttpRequest};

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "sessionId";

/// Options for cookie creation
#[derive(Debug, Clone)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub path: String,
    /// `None` keeps the cookie for the browser session only
    pub max_age: Option<actix_web::cookie::time::Duration>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: true,
            path: "/".to_string(),
            max_age: None,
        }
    }
}

/// Build a cookie with the given options
#[must_use]
pub fn build_cookie(name: &str, value: String, options: CookieOptions) -> Cookie<'static> {
    let mut builder = Cookie::build(name.to_owned(), value)
        .http_only(options.http_only)
        .secure(options.secure)
        .path(options.path);

    if let Some(max_age) = options.max_age {
        builder = builder.max_age(max_age);
    }

    builder.finish()
}

/// Browser-session `sessionId` cookie carrying an encrypted session value
#[must_use]
pub fn session_cookie(value: String, secure: bool) -> Cookie<'static> {
    build_cookie(
        SESSION_COOKIE_NAME,
        value,
        CookieOptions {
            secure,
            ..Default::default()
        },
    )
}

/// Create an expired cookie to clear a specific cookie
#[must_use]
pub fn create_expired_cookie(name: &str, secure: bool) -> Cookie<'static> {
    build_cookie(
        name,
        String::new(),
        CookieOptions {
            secure,
            max_age: Some(actix_web::cookie::time::Duration::seconds(-1)),
            ..Default::default()
        },
    )
}

/// Read the session cookie value from a request
#[must_use]
pub fn extract_session_value(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Whether the request reached us over an encrypted transport
///
/// Uses the connection scheme, which honours `Forwarded` and
/// `X-Forwarded-Proto` from a fronting proxy.
#[must_use]
pub fn is_secure_request(req: &HttpRequest) -> bool {
    req.connection_info().scheme() != "http"
}
