// OAuth callback handler
use crate::models::ThirdPartyProfile;
use crate::oauth::{
    provider_code, AccountBindings, OAuth2Client, OAuthCallback, ProviderRegistry,
    ProviderResponse,
};
use crate::session::codec::SessionCodec;
use crate::settings::PassportSettings;
use crate::utils::logging::LoggingHelper;
use crate::utils::response_builder::ResponseBuilder;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use log::{error, info, warn};

/// Fields that carry the provider's user id in user-info responses
const USERINFO_ID_FIELDS: [&str; 4] = ["openid", "id", "uid", "userid"];

/// Fields that carry the user id in openid responses
const OPENID_FIELDS: [&str; 2] = ["openid", "uid"];

/// Complete a third-party login
///
/// Exchanges the code, resolves the openid and either signs the bound
/// account in or sends the visitor to the binding page.
///
/// # Errors
/// Never fails; provider errors redirect to the sign-in route with `error=`
pub async fn oauth_callback(
    provider: web::Path<String>,
    query: web::Query<OAuthCallback>,
    req: HttpRequest,
    registry: web::Data<ProviderRegistry>,
    settings: web::Data<PassportSettings>,
    codec: web::Data<SessionCodec>,
    bindings: web::Data<dyn AccountBindings>,
) -> Result<HttpResponse> {
    let callback = query.into_inner();
    LoggingHelper::log_callback_debug(&req, &callback);

    let provider = provider.into_inner();
    let sign_in_route = settings.application.sign_in_route.as_str();
    let fail = |reason: &str| ResponseBuilder::error_redirect(sign_in_route, reason);

    if let Some(provider_error) = &callback.error {
        warn!("{provider} returned an OAuth error: {provider_error}");
        return Ok(fail("auth_failed"));
    }

    let (Some(client), Ok(code)) = (registry.get(&provider), provider_code(&provider)) else {
        return Ok(fail("unsupported_provider"));
    };

    let profile = match resolve_profile(&client, &callback).await {
        Ok(profile) => profile,
        Err(reason) => return Ok(fail(reason)),
    };

    match bindings.find_uid(code, &profile.openid).await {
        Some(uid) => match client.goto_sign_in(&req, &codec, &uid) {
            Ok(response) => Ok(response),
            Err(e) => {
                error!("Failed to issue session for {uid}: {e}");
                Ok(fail("session_failed"))
            }
        },
        None => {
            info!("Unbound {provider} login, sending to binding page: {profile:?}");
            Ok(client.goto_sign_up(&profile.openid))
        }
    }
}

/// Run the token exchange and identity calls
///
/// Errors are short reasons suitable for the `error` query parameter.
async fn resolve_profile(
    client: &OAuth2Client,
    callback: &OAuthCallback,
) -> Result<ThirdPartyProfile, &'static str> {
    let provider = client.name();

    let token_response = match client.authorized_response(callback).await {
        Ok(Some(response)) => response,
        Ok(None) => {
            error!("No authorization code received from {provider}");
            return Err("auth_failed");
        }
        Err(e) => {
            error!("Token exchange with {provider} failed: {e}");
            return Err("auth_failed");
        }
    };

    let Some(access_token) = token_response.field("access_token") else {
        error!("{provider} token response carried no access_token: {token_response:?}");
        return Err("auth_failed");
    };

    let openid_response = client.get_openid(&access_token, &[]).await.map_err(|e| {
        error!("Openid lookup with {provider} failed: {e}");
        "auth_failed"
    })?;
    let openid_from_endpoint = openid_response
        .as_ref()
        .and_then(|response| first_field(response, &OPENID_FIELDS));

    let mut extra = Vec::new();
    if let (Some(param), Some(openid)) = (
        client.config().openid_param.as_deref(),
        openid_from_endpoint.as_deref(),
    ) {
        extra.push((param, openid));
    }

    let userinfo = client.get_userinfo(&access_token, &extra).await.map_err(|e| {
        error!("User info request to {provider} failed: {e}");
        "auth_failed"
    })?;

    let Some(openid) =
        openid_from_endpoint.or_else(|| first_field(&userinfo, &USERINFO_ID_FIELDS))
    else {
        error!("Could not resolve an openid from {provider}: {userinfo:?}");
        return Err("openid_missing");
    };

    Ok(ThirdPartyProfile::from_userinfo(&openid, &userinfo))
}

fn first_field(response: &ProviderResponse, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| response.field(field).filter(|value| !value.is_empty()))
}
