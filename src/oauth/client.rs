//! Generic OAuth2 authorization-code client
//!
//! One `OAuth2Client` per provider. The flow is:
//!
//! 1. [`OAuth2Client::authorize`] redirects the browser to the provider.
//! 2. [`OAuth2Client::authorized_response`] trades the callback `code` for a token.
//! 3. [`OAuth2Client::get_openid`] (some providers only) and
//!    [`OAuth2Client::get_userinfo`] fetch the identity.
//! 4. [`OAuth2Client::goto_sign_in`] or [`OAuth2Client::goto_sign_up`] finish it.
//!
//! Providers are inconsistent about response formats, so every call returns a
//! [`ProviderResponse`] that is JSON when the body parses and raw text
//! otherwise. Only transport failures are errors.

use crate::oauth::{AppRoutes, OAuthCallback};
use crate::session::codec::{SessionCodec, SessionError};
use crate::session::cookie::{is_secure_request, session_cookie};
use crate::utils::crypto::generate_fingerprint;
use crate::utils::logging::LoggingHelper;
use crate::utils::response_builder::ResponseBuilder;
use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of the generated anti-CSRF `state` when none is configured
pub const DEFAULT_STATE_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Network error: {0}")]
    Network(String),
}

/// HTTP verb used for a provider endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl FromStr for HttpMethod {
    type Err = OAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            other => Err(OAuthError::Configuration(format!(
                "Unsupported HTTP method '{other}', only get and post are allowed"
            ))),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// Body of a provider response
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    /// The body parsed as JSON
    Json(Value),
    /// Anything else, verbatim
    Text(String),
}

impl ProviderResponse {
    /// Classify a response body
    #[must_use]
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => ProviderResponse::Json(value),
            Err(_) => ProviderResponse::Text(body),
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ProviderResponse::Json(value) => Some(value),
            ProviderResponse::Text(_) => None,
        }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        matches!(self, ProviderResponse::Json(_))
    }

    /// Read a top-level field whatever the body format
    ///
    /// JSON objects are read directly. Text bodies are tried as a JSONP
    /// wrapper (`callback( {...} );`) and then as `a=b&c=d`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<String> {
        match self {
            ProviderResponse::Json(value) => json_field(value, name),
            ProviderResponse::Text(text) => {
                if let Some(value) = unwrap_jsonp(text) {
                    return json_field(&value, name);
                }
                url_code(text).and_then(|mut pairs| pairs.remove(name))
            }
        }
    }
}

fn json_field(value: &Value, name: &str) -> Option<String> {
    match value.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn unwrap_jsonp(text: &str) -> Option<Value> {
    let start = text.find('(')?;
    let end = text.rfind(')')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(text[start + 1..end].trim()).ok()
}

/// Parse a form-encoded body into a map
///
/// Returns `None` for empty content.
#[must_use]
pub fn url_code(content: &str) -> Option<HashMap<String, String>> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }
    Some(
        url::form_urlencoded::parse(content.as_bytes())
            .into_owned()
            .collect(),
    )
}

/// Immutable per-provider client settings
#[derive(Debug, Clone)]
pub struct OAuth2ClientConfig {
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub authorize_url: String,
    pub access_token_url: String,
    pub get_userinfo_url: String,
    pub get_openid_url: Option<String>,
    pub scope: String,
    /// Anti-CSRF value sent on authorize
    pub state: String,
    pub access_token_method: HttpMethod,
    pub get_openid_method: HttpMethod,
    pub get_userinfo_method: HttpMethod,
    /// Sent as the `Accept` header on provider calls
    pub content_type: String,
    /// Parameter name under which the user-info call repeats the client id
    pub client_id_param: Option<String>,
    /// Parameter name under which the user-info call carries the openid
    pub openid_param: Option<String>,
}

impl OAuth2ClientConfig {
    /// Config with the required endpoints and the usual defaults:
    /// POST for the token call, GET elsewhere, empty scope, random state
    #[must_use]
    pub fn new(
        name: &str,
        client_id: &str,
        client_secret: &str,
        redirect_url: &str,
        authorize_url: &str,
        access_token_url: &str,
        get_userinfo_url: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_url: redirect_url.to_string(),
            authorize_url: authorize_url.to_string(),
            access_token_url: access_token_url.to_string(),
            get_userinfo_url: get_userinfo_url.to_string(),
            get_openid_url: None,
            scope: String::new(),
            state: generate_fingerprint(DEFAULT_STATE_LENGTH),
            access_token_method: HttpMethod::Post,
            get_openid_method: HttpMethod::Get,
            get_userinfo_method: HttpMethod::Get,
            content_type: "application/json".to_string(),
            client_id_param: None,
            openid_param: None,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_string();
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: &str) -> Self {
        self.state = state.to_string();
        self
    }

    #[must_use]
    pub fn with_openid_url(mut self, url: &str, method: HttpMethod) -> Self {
        self.get_openid_url = Some(url.to_string());
        self.get_openid_method = method;
        self
    }

    #[must_use]
    pub fn with_access_token_method(mut self, method: HttpMethod) -> Self {
        self.access_token_method = method;
        self
    }

    #[must_use]
    pub fn with_userinfo_method(mut self, method: HttpMethod) -> Self {
        self.get_userinfo_method = method;
        self
    }
}

/// OAuth2 authorization-code client for a single provider
#[derive(Clone)]
pub struct OAuth2Client {
    config: OAuth2ClientConfig,
    routes: AppRoutes,
    http_client: reqwest::Client,
}

impl OAuth2Client {
    #[must_use]
    pub fn new(config: OAuth2ClientConfig, routes: AppRoutes) -> Self {
        Self {
            config,
            routes,
            http_client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn config(&self) -> &OAuth2ClientConfig {
        &self.config
    }

    /// Whether a callback `state` matches the configured one
    ///
    /// `authorized_response` does not call this; callers that keep per-login
    /// state elsewhere should check it themselves.
    #[must_use]
    pub fn state_matches(&self, received: Option<&str>) -> bool {
        received == Some(self.config.state.as_str())
    }

    /// Provider authorize URL for step one
    ///
    /// # Errors
    ///
    /// Returns an error if the configured authorize URL is not a valid URL
    pub fn authorize_url(&self, extra_params: &[(&str, &str)]) -> Result<String, OAuthError> {
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("state", self.config.state.as_str()),
            ("scope", self.config.scope.as_str()),
        ];
        params.extend_from_slice(extra_params);

        let url = build_url(&self.config.authorize_url, &params)?;
        LoggingHelper::log_oauth_url_built(&self.config.name, &self.config.scope, extra_params);
        Ok(url)
    }

    /// Step one: redirect the user agent to the provider
    ///
    /// # Errors
    ///
    /// Returns an error if the configured authorize URL is not a valid URL
    pub fn authorize(&self, extra_params: &[(&str, &str)]) -> Result<HttpResponse, OAuthError> {
        let url = self.authorize_url(extra_params)?;
        Ok(ResponseBuilder::redirect(&url))
    }

    /// Step two: exchange the callback `code` for an access token
    ///
    /// Returns `None` without any request when the callback has no `code`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token endpoint cannot be reached
    pub async fn authorized_response(
        &self,
        callback: &OAuthCallback,
    ) -> Result<Option<ProviderResponse>, OAuthError> {
        let Some(code) = callback.code.as_deref().filter(|code| !code.is_empty()) else {
            return Ok(None);
        };

        log::debug!(
            "OAuth callback for {}: state present={}, state matches={}",
            self.config.name,
            callback.state.is_some(),
            self.state_matches(callback.state.as_deref())
        );

        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        LoggingHelper::log_token_exchange_start(&self.config.name);
        let response = self
            .call(
                self.config.access_token_method,
                &self.config.access_token_url,
                &params,
            )
            .await?;
        LoggingHelper::log_provider_response(&self.config.name, "token", &response);

        Ok(Some(response))
    }

    /// Step three, preparation: resolve the provider-specific openid
    ///
    /// Returns `None` when the provider has no openid endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the openid endpoint cannot be reached
    pub async fn get_openid(
        &self,
        access_token: &str,
        extra_params: &[(&str, &str)],
    ) -> Result<Option<ProviderResponse>, OAuthError> {
        let Some(url) = self.config.get_openid_url.as_deref() else {
            return Ok(None);
        };

        let mut params = vec![("access_token", access_token)];
        params.extend_from_slice(extra_params);

        let response = self
            .call(self.config.get_openid_method, url, &params)
            .await?;
        LoggingHelper::log_provider_response(&self.config.name, "openid", &response);

        Ok(Some(response))
    }

    /// Step three: fetch the user profile
    ///
    /// # Errors
    ///
    /// Returns an error if the user-info endpoint cannot be reached
    pub async fn get_userinfo(
        &self,
        access_token: &str,
        extra_params: &[(&str, &str)],
    ) -> Result<ProviderResponse, OAuthError> {
        let mut params = vec![("access_token", access_token)];
        if let Some(param) = self.config.client_id_param.as_deref() {
            params.push((param, self.config.client_id.as_str()));
        }
        params.extend_from_slice(extra_params);

        let response = self
            .call(
                self.config.get_userinfo_method,
                &self.config.get_userinfo_url,
                &params,
            )
            .await?;
        LoggingHelper::log_provider_response(&self.config.name, "userinfo", &response);

        Ok(response)
    }

    /// Third-party login succeeded for a bound account: set the session
    /// cookie and go home
    ///
    /// The cookie lives for the browser session; `Secure` is set only when
    /// the request came in over https.
    ///
    /// # Errors
    ///
    /// Returns an error if the session value cannot be issued
    pub fn goto_sign_in(
        &self,
        req: &HttpRequest,
        codec: &SessionCodec,
        uid: &str,
    ) -> Result<HttpResponse, SessionError> {
        let value = codec.issue_default(uid)?;
        let cookie = session_cookie(value, is_secure_request(req));
        LoggingHelper::log_session_issued(uid, &self.config.name);

        Ok(ResponseBuilder::redirect_with_cookie(&self.routes.home, cookie))
    }

    /// Third-party login for an unbound openid: go to the binding page
    #[must_use]
    pub fn goto_sign_up(&self, openid: &str) -> HttpResponse {
        let location = format!(
            "{}?openid={}",
            self.routes.sign_up,
            urlencoding::encode(openid)
        );
        ResponseBuilder::redirect(&location)
    }

    async fn call(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ProviderResponse, OAuthError> {
        let url = build_url(endpoint, params)?;

        let request = match method {
            HttpMethod::Get => self.http_client.get(url),
            HttpMethod::Post => self.http_client.post(url),
        };

        let response = request
            .header(reqwest::header::ACCEPT, self.config.content_type.as_str())
            .send()
            .await
            .map_err(|e| OAuthError::Network(format!("{method} {endpoint} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OAuthError::Network(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            log::warn!(
                "{} {method} {endpoint} returned status {status}",
                self.config.name
            );
        }

        Ok(ProviderResponse::from_body(body))
    }
}

impl fmt::Debug for OAuth2Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Client")
            .field("name", &self.config.name)
            .field("authorize_url", &self.config.authorize_url)
            .finish_non_exhaustive()
    }
}

fn build_url(base: &str, params: &[(&str, &str)]) -> Result<String, OAuthError> {
    let mut url = url::Url::parse(base)
        .map_err(|e| OAuthError::Configuration(format!("Invalid endpoint URL '{base}': {e}")))?;
    url.query_pairs_mut().extend_pairs(params.iter().copied());
    Ok(url.to_string())
}
