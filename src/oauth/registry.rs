// Builds one OAuth2 client per configured provider
use crate::oauth::client::{OAuth2Client, OAuth2ClientConfig};
use crate::oauth::providers::{provider_code, ProviderPreset};
use crate::settings::{PassportSettings, ProviderSettings};
use crate::utils::logging::LoggingHelper;
use std::collections::HashMap;
use std::sync::Arc;

/// Configured providers, keyed by name
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    clients: HashMap<String, Arc<OAuth2Client>>,
    extra_auth_params: HashMap<String, Vec<(String, String)>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from settings
    ///
    /// Disabled providers, providers outside the account code table and
    /// providers with missing credentials or endpoints are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider ends up usable
    pub fn from_settings(settings: &PassportSettings) -> anyhow::Result<Self> {
        LoggingHelper::log_oauth_provider_initialization();

        let mut registry = Self::new();
        for provider in &settings.providers {
            if !provider.enabled {
                LoggingHelper::log_oauth_provider_disabled(&provider.name);
                continue;
            }
            if provider_code(&provider.name).is_err() {
                LoggingHelper::log_oauth_provider_unknown(&provider.name);
                continue;
            }

            let display_name = provider.display_name.as_deref().unwrap_or(&provider.name);
            match Self::build_config(provider, &settings.application.redirect_base_url) {
                Some(config) => {
                    LoggingHelper::log_oauth_provider_configured(display_name, &provider.name);
                    registry.insert(
                        OAuth2Client::new(config, settings.app_routes()),
                        provider.get_extra_auth_params(),
                    );
                }
                None => LoggingHelper::log_oauth_provider_not_configured(display_name),
            }
        }

        if registry.is_empty() {
            anyhow::bail!("No OAuth providers configured");
        }

        LoggingHelper::log_oauth_providers_summary(&registry.provider_names());
        Ok(registry)
    }

    /// Resolve a provider's settings against its preset
    ///
    /// Returns `None` when the name has no account code, or when credentials
    /// or a required endpoint are missing.
    #[must_use]
    pub fn build_config(
        provider: &ProviderSettings,
        redirect_base_url: &str,
    ) -> Option<OAuth2ClientConfig> {
        provider_code(&provider.name).ok()?;
        let client_id = provider.get_client_id().filter(|id| !id.is_empty())?;
        let client_secret = provider.get_client_secret().filter(|s| !s.is_empty())?;
        let preset = ProviderPreset::for_name(&provider.name);

        let endpoint = |explicit: &Option<String>, from_preset: fn(&ProviderPreset) -> &'static str| {
            explicit
                .clone()
                .or_else(|| preset.as_ref().map(|p| from_preset(p).to_string()))
        };

        let authorize_url = endpoint(&provider.authorize_url, |p| p.authorize_url)?;
        let access_token_url = endpoint(&provider.access_token_url, |p| p.access_token_url)?;
        let get_userinfo_url = endpoint(&provider.get_userinfo_url, |p| p.get_userinfo_url)?;

        let mut config = OAuth2ClientConfig::new(
            &provider.name,
            &client_id,
            &client_secret,
            &provider.get_redirect_url(redirect_base_url),
            &authorize_url,
            &access_token_url,
            &get_userinfo_url,
        );

        if let Some(preset) = &preset {
            config.get_openid_url = preset.get_openid_url.map(str::to_string);
            config.scope = preset.scope.to_string();
            config.access_token_method = preset.access_token_method;
            config.get_openid_method = preset.get_openid_method;
            config.get_userinfo_method = preset.get_userinfo_method;
            config.client_id_param = preset.client_id_param.map(str::to_string);
            config.openid_param = preset.openid_param.map(str::to_string);
        }

        if let Some(url) = &provider.get_openid_url {
            config.get_openid_url = Some(url.clone());
        }
        if let Some(scope) = &provider.scope {
            config.scope.clone_from(scope);
        }
        if let Some(state) = &provider.state {
            config.state.clone_from(state);
        }
        if let Some(method) = provider.access_token_method {
            config.access_token_method = method;
        }
        if let Some(method) = provider.get_openid_method {
            config.get_openid_method = method;
        }
        if let Some(method) = provider.get_userinfo_method {
            config.get_userinfo_method = method;
        }
        if let Some(content_type) = &provider.content_type {
            config.content_type.clone_from(content_type);
        }

        Some(config)
    }

    /// Register a client with the extra authorize parameters it sends
    pub fn insert(&mut self, client: OAuth2Client, extra_auth_params: Vec<(String, String)>) {
        let name = client.name().to_string();
        self.extra_auth_params.insert(name.clone(), extra_auth_params);
        self.clients.insert(name, Arc::new(client));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<OAuth2Client>> {
        self.clients.get(name).cloned()
    }

    /// Extra authorize parameters configured for a provider
    #[must_use]
    pub fn extra_auth_params(&self, name: &str) -> &[(String, String)] {
        self.extra_auth_params
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Sorted names of the usable providers
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clients.keys().cloned().collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::client::HttpMethod;

    fn provider(name: &str) -> ProviderSettings {
        ProviderSettings {
            name: name.to_string(),
            client_id: Some(format!("{name}-id")),
            client_secret: Some(format!("{name}-secret")),
            ..Default::default()
        }
    }

    #[test]
    fn test_preset_fills_endpoints() {
        let config = ProviderRegistry::build_config(&provider("qq"), "https://p.example.com").unwrap();

        assert_eq!(config.authorize_url, "https://graph.qq.com/oauth2.0/authorize");
        assert_eq!(
            config.get_openid_url.as_deref(),
            Some("https://graph.qq.com/oauth2.0/me")
        );
        assert_eq!(config.access_token_method, HttpMethod::Get);
        assert_eq!(config.scope, "get_user_info");
        assert_eq!(
            config.redirect_url,
            "https://p.example.com/oauth2/qq/authorized"
        );
    }

    #[test]
    fn test_explicit_settings_override_preset() {
        let mut settings = provider("github");
        settings.access_token_url = Some("http://127.0.0.1:9/token".to_string());
        settings.scope = Some("read:user".to_string());
        settings.state = Some("fixed".to_string());
        settings.access_token_method = Some(HttpMethod::Get);

        let config = ProviderRegistry::build_config(&settings, "http://localhost").unwrap();

        assert_eq!(config.access_token_url, "http://127.0.0.1:9/token");
        assert_eq!(config.authorize_url, "https://github.com/login/oauth/authorize");
        assert_eq!(config.scope, "read:user");
        assert_eq!(config.state, "fixed");
        assert_eq!(config.access_token_method, HttpMethod::Get);
    }

    #[test]
    fn test_provider_without_account_code_is_skipped() {
        assert!(ProviderRegistry::build_config(&provider("custom"), "http://localhost").is_none());

        // explicit endpoints do not help: the callback could never bind it
        let mut custom = provider("custom");
        custom.authorize_url = Some("https://custom.example.com/authorize".to_string());
        custom.access_token_url = Some("https://custom.example.com/token".to_string());
        custom.get_userinfo_url = Some("https://custom.example.com/me".to_string());
        assert!(ProviderRegistry::build_config(&custom, "http://localhost").is_none());

        let settings = PassportSettings {
            providers: vec![custom],
            ..Default::default()
        };
        assert!(ProviderRegistry::from_settings(&settings).is_err());
    }

    #[test]
    fn test_endpoints_without_preset() {
        // mobile has an account code but no preset
        let mut mobile = provider("mobile");
        assert!(ProviderRegistry::build_config(&mobile, "http://localhost").is_none());

        mobile.authorize_url = Some("https://sms.example.com/authorize".to_string());
        mobile.access_token_url = Some("https://sms.example.com/token".to_string());
        mobile.get_userinfo_url = Some("https://sms.example.com/me".to_string());
        let config = ProviderRegistry::build_config(&mobile, "http://localhost").unwrap();
        assert_eq!(config.access_token_method, HttpMethod::Post);
        assert!(config.get_openid_url.is_none());
    }

    #[test]
    fn test_missing_credentials_are_skipped() {
        let mut settings = provider("github");
        settings.client_secret = None;
        assert!(ProviderRegistry::build_config(&settings, "http://localhost").is_none());

        let mut settings = provider("github");
        settings.client_id = Some(String::new());
        assert!(ProviderRegistry::build_config(&settings, "http://localhost").is_none());
    }

    #[test]
    fn test_from_settings() {
        let mut disabled = provider("gitee");
        disabled.enabled = false;
        let mut with_params = provider("github");
        with_params.extra_auth_params =
            Some(HashMap::from([("allow_signup".to_string(), "false".to_string())]));

        let settings = PassportSettings {
            providers: vec![with_params, provider("qq"), disabled, provider("custom")],
            ..Default::default()
        };

        let registry = ProviderRegistry::from_settings(&settings).unwrap();
        assert_eq!(registry.provider_names(), vec!["github", "qq"]);
        assert!(registry.get("gitee").is_none());
        assert_eq!(registry.get("qq").unwrap().name(), "qq");
        assert_eq!(
            registry.extra_auth_params("github"),
            &[("allow_signup".to_string(), "false".to_string())]
        );
        assert!(registry.extra_auth_params("qq").is_empty());
    }

    #[test]
    fn test_from_settings_without_providers_fails() {
        assert!(ProviderRegistry::from_settings(&PassportSettings::default()).is_err());
    }
}
