// Authentication handlers: OAuth2 sign-in, sign-out and the signed-in index
use crate::models::ApiResponse;
use crate::oauth::ProviderRegistry;
use crate::session::codec::SessionCodec;
use crate::session::cookie::{create_expired_cookie, is_secure_request, SESSION_COOKIE_NAME};
use crate::session::guard::{anonymous_required, login_required};
use crate::settings::PassportSettings;
use crate::utils::i18n::{localize_response, StaticTranslations};
use crate::utils::response_builder::ResponseBuilder;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

/// OAuth sign in handler
///
/// Anonymous visitors are redirected to the provider; signed-in users go home.
///
/// # Errors
/// Never fails; configuration problems redirect to the sign-in route
pub async fn oauth_sign_in(
    provider: web::Path<String>,
    req: HttpRequest,
    registry: web::Data<ProviderRegistry>,
    settings: web::Data<PassportSettings>,
    codec: web::Data<SessionCodec>,
) -> Result<HttpResponse> {
    if let Err(response) = anonymous_required(&req, &codec, &settings.application.home_route) {
        return Ok(response);
    }

    let provider = provider.into_inner();
    let Some(client) = registry.get(&provider) else {
        return Ok(ResponseBuilder::error_redirect(
            &settings.application.sign_in_route,
            "unsupported_provider",
        ));
    };

    let extra: Vec<(&str, &str)> = registry
        .extra_auth_params(&provider)
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    match client.authorize(&extra) {
        Ok(response) => {
            info!("Redirecting to {provider} OAuth");
            Ok(response)
        }
        Err(e) => {
            error!("Failed to build auth URL for {provider}: {e}");
            Ok(ResponseBuilder::error_redirect(
                &settings.application.sign_in_route,
                "oauth_config",
            ))
        }
    }
}

/// Clear the session cookie and go back to sign-in
///
/// # Errors
/// Never fails
pub async fn sign_out(
    req: HttpRequest,
    settings: web::Data<PassportSettings>,
) -> Result<HttpResponse> {
    let clear_cookie = create_expired_cookie(SESSION_COOKIE_NAME, is_secure_request(&req));
    Ok(ResponseBuilder::redirect_with_cookie(
        &settings.application.sign_in_route,
        clear_cookie,
    ))
}

/// Signed-in landing route, answering with a localized greeting
///
/// # Errors
/// Never fails; anonymous requests are redirected to sign-in
pub async fn index(
    req: HttpRequest,
    query: web::Query<LanguageQuery>,
    settings: web::Data<PassportSettings>,
    codec: web::Data<SessionCodec>,
) -> Result<HttpResponse> {
    let claims = match login_required(&req, &codec, &settings.application.sign_in_route) {
        Ok(claims) => claims,
        Err(response) => return Ok(response),
    };

    let language = query
        .lang
        .as_deref()
        .unwrap_or(&settings.application.default_language);
    let body = ApiResponse::ok("Hello World", Some(json!({ "uid": claims.uid })));

    Ok(HttpResponse::Ok().json(localize_response(
        body.to_value(),
        language,
        &StaticTranslations,
    )))
}
