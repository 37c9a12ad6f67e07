use crate::oauth::{AppRoutes, HttpMethod};
use crate::session::codec::{SessionCodec, DEFAULT_SESSION_TTL_SECONDS};
use crate::utils::crypto::{generate_secret, AesGcmCipher};
use crate::utils::i18n::DEFAULT_LANGUAGE;
use crate::utils::jwt::HmacJwtSigner;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PassportSettings {
    pub application: ApplicationSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
    pub providers: Vec<ProviderSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Public base URL used to build provider redirect URLs
    pub redirect_base_url: String,
    pub cors_origins: String,
    pub home_route: String,
    pub sign_in_route: String,
    /// Binding page for openids without a local account
    pub sign_up_route: String,
    pub default_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// HS256 key for session tokens
    pub signing_secret: String,
    /// AES-256-GCM key material for session cookies
    pub cipher_key: String,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub name: String,
    pub display_name: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,

    // Direct values (can be overridden by environment variables)
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    // Environment variable names for overrides
    pub client_id_env: Option<String>,
    pub client_secret_env: Option<String>,

    /// Defaults to `<redirect_base_url>/oauth2/<name>/authorized`
    pub redirect_url: Option<String>,

    // Endpoints; missing ones come from the built-in preset for `name`
    pub authorize_url: Option<String>,
    pub access_token_url: Option<String>,
    pub get_openid_url: Option<String>,
    pub get_userinfo_url: Option<String>,

    pub scope: Option<String>,
    /// Fixed anti-CSRF state; random when unset
    pub state: Option<String>,
    pub access_token_method: Option<HttpMethod>,
    pub get_openid_method: Option<HttpMethod>,
    pub get_userinfo_method: Option<HttpMethod>,
    pub content_type: Option<String>,
    pub extra_auth_params: Option<HashMap<String, String>>,
}

fn default_true() -> bool {
    true
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            redirect_base_url: "http://localhost:8080".to_string(),
            cors_origins: "http://localhost:3000,http://localhost:8080".to_string(),
            home_route: "/".to_string(),
            sign_in_route: "/signIn".to_string(),
            sign_up_route: "/OAuthGuide".to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            signing_secret: String::new(), // Will be generated if empty
            cipher_key: String::new(),     // Will be generated if empty
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_name: None,
            enabled: true,
            client_id: None,
            client_secret: None,
            client_id_env: None,
            client_secret_env: None,
            redirect_url: None,
            authorize_url: None,
            access_token_url: None,
            get_openid_url: None,
            get_userinfo_url: None,
            scope: None,
            state: None,
            access_token_method: None,
            get_openid_method: None,
            get_userinfo_method: None,
            content_type: None,
            extra_auth_params: None,
        }
    }
}

impl PassportSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - A settings file cannot be read or parsed
    pub fn load() -> anyhow::Result<Self> {
        Self::initialize_environment()?;

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        Ok(settings)
    }

    /// Load the `.env` file and start the logger
    fn initialize_environment() -> anyhow::Result<()> {
        Self::load_env_file();
        env_logger::try_init()?;
        Ok(())
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `PASSPORT_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    fn load_base_settings() -> anyhow::Result<Self> {
        let mut settings = Self::default();

        let default_config_path = Path::new("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_toml_file(default_config_path)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(secrets_dir) = std::env::var("PASSPORT_SECRETS_DIR") {
            let secrets_path = Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                settings = Self::from_toml_file(&secrets_path)?;
                println!("✓ Overriding settings from {}", secrets_path.display());
            } else {
                println!(
                    "ℹ PASSPORT_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a single settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        basic_toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_session_env_overrides(&mut settings.session);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(redirect_base_url) = std::env::var("REDIRECT_BASE_URL") {
            app_settings.redirect_base_url = redirect_base_url;
        }
        if let Ok(cors_origins) = std::env::var("CORS_ORIGINS") {
            app_settings.cors_origins = cors_origins;
        }
    }

    /// Apply environment overrides for session settings, generating any
    /// secret that is still empty afterwards
    pub fn apply_session_env_overrides(session_settings: &mut SessionSettings) {
        if let Ok(value_str) = std::env::var("SESSION_TTL_SECONDS") {
            if let Ok(value) = value_str.parse::<u64>() {
                session_settings.ttl_seconds = value;
            }
        }

        Self::handle_secret_override(
            "SESSION_SECRET",
            "signing_secret",
            &mut session_settings.signing_secret,
        );
        Self::handle_secret_override("CIPHER_KEY", "cipher_key", &mut session_settings.cipher_key);
    }

    fn handle_secret_override(env_var: &str, setting_name: &str, target: &mut String) {
        let env_secret_set = std::env::var(env_var).is_ok_and(|secret| {
            if secret.is_empty() {
                false
            } else {
                *target = secret;
                true
            }
        });

        if !env_secret_set && target.is_empty() {
            *target = generate_secret();
            Self::warn_about_generated_secret(env_var, setting_name);
        }
    }

    fn warn_about_generated_secret(env_var: &str, setting_name: &str) {
        eprintln!("⚠️  WARNING: Using auto-generated {setting_name}");
        eprintln!("🔒 For production use, set the {env_var} environment variable");
        eprintln!("   or configure {setting_name} in Settings.toml");
        eprintln!("💡 Existing sessions become invalid on each restart unless explicitly configured");
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        self.application
            .cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Routes the login flow redirects to
    #[must_use]
    pub fn app_routes(&self) -> AppRoutes {
        AppRoutes {
            home: self.application.home_route.clone(),
            sign_up: self.application.sign_up_route.clone(),
        }
    }

    /// Session codec keyed from the session settings
    #[must_use]
    pub fn build_session_codec(&self) -> SessionCodec {
        let signer = HmacJwtSigner::new(self.session.signing_secret.as_bytes());
        let cipher = AesGcmCipher::new(self.session.cipher_key.as_bytes());

        SessionCodec::new(Arc::new(signer), Arc::new(cipher))
            .with_default_ttl(self.session.ttl_seconds)
    }
}

impl ProviderSettings {
    /// Get the client ID, checking environment variable first, then falling back to direct value
    #[must_use]
    pub fn get_client_id(&self) -> Option<String> {
        if let Some(env_var) = &self.client_id_env {
            if let Ok(value) = std::env::var(env_var) {
                return Some(value);
            }
        }
        self.client_id.clone()
    }

    /// Get the client secret, checking environment variable first, then falling back to direct value
    #[must_use]
    pub fn get_client_secret(&self) -> Option<String> {
        if let Some(env_var) = &self.client_secret_env {
            if let Ok(value) = std::env::var(env_var) {
                return Some(value);
            }
        }
        self.client_secret.clone()
    }

    /// Redirect URL registered with the provider
    #[must_use]
    pub fn get_redirect_url(&self, redirect_base_url: &str) -> String {
        self.redirect_url.clone().unwrap_or_else(|| {
            format!(
                "{}/oauth2/{}/authorized",
                redirect_base_url.trim_end_matches('/'),
                self.name
            )
        })
    }

    /// Extra authorize parameters in a stable order
    #[must_use]
    pub fn get_extra_auth_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .extra_auth_params
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        params.sort();
        params
    }
}
