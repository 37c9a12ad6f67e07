// Centralized logging utilities to reduce verbose logging patterns
use crate::oauth::client::ProviderResponse;
use log::{debug, info, warn};

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log OAuth provider initialization start
    pub fn log_oauth_provider_initialization() {
        info!("🔧 Initializing OAuth providers from configuration...");
    }

    /// Log that a provider is disabled
    pub fn log_oauth_provider_disabled(provider_name: &str) {
        info!("⏭️  Provider {provider_name} is disabled, skipping");
    }

    /// Log that a provider has no account code and cannot be bound
    pub fn log_oauth_provider_unknown(provider_name: &str) {
        warn!("⚠️  Provider {provider_name} has no account code, skipping");
    }

    /// Log that a provider is configured
    pub fn log_oauth_provider_configured(display_name: &str, provider_name: &str) {
        info!("✅ {display_name} OAuth2 configured ({provider_name})");
    }

    /// Log that a provider is not configured
    pub fn log_oauth_provider_not_configured(display_name: &str) {
        info!("❌ {display_name} OAuth2 not configured - missing credentials or endpoints");
    }

    /// Log summary of configured OAuth providers
    pub fn log_oauth_providers_summary(provider_names: &[String]) {
        info!("🎯 Configured OAuth providers: {provider_names:?}");
    }

    /// Log OAuth URL building
    pub fn log_oauth_url_built(provider: &str, scope: &str, extra_params: &[(&str, &str)]) {
        info!("🔍 Built {provider} OAuth URL with scope: {scope:?} and extra params: {extra_params:?}");
    }

    /// Log token exchange start
    pub fn log_token_exchange_start(provider: &str) {
        info!("🔄 Exchanging authorization code for tokens with {provider}");
    }

    /// Log the shape of a provider response; bodies only at debug level
    pub fn log_provider_response(provider: &str, stage: &str, response: &ProviderResponse) {
        let format = if response.is_json() { "json" } else { "text" };
        info!("📥 {provider} {stage} response received ({format})");
        debug!("Raw {provider} {stage} response: {response:?}");
    }

    /// Log session creation success
    pub fn log_session_issued(uid: &str, provider: &str) {
        info!("Successfully issued session for user: {uid} (provider: {provider})");
    }

    /// Log OAuth callback details
    pub fn log_callback_debug(req: &actix_web::HttpRequest, callback: &crate::oauth::OAuthCallback) {
        debug!("OAuth callback received via {}: {:?}", req.method(), callback);
        debug!("Callback request connection info: {:?}", req.connection_info());
    }
}
