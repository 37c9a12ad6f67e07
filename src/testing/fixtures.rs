//! Test fixtures providing pre-built test objects

use crate::oauth::{AppRoutes, OAuth2Client, OAuth2ClientConfig, ProviderRegistry};
use crate::session::codec::SessionCodec;
use crate::session::cookie::SESSION_COOKIE_NAME;
use crate::settings::{PassportSettings, SessionSettings};
use actix_web::cookie::Cookie;

use super::constants::{
    TEST_CIPHER_KEY, TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_SIGNING_SECRET, TEST_STATE,
};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Settings with fixed secrets and no providers
    #[must_use]
    pub fn settings() -> PassportSettings {
        PassportSettings {
            session: SessionSettings {
                signing_secret: TEST_SIGNING_SECRET.to_string(),
                cipher_key: TEST_CIPHER_KEY.to_string(),
                ..SessionSettings::default()
            },
            ..PassportSettings::default()
        }
    }

    /// Session codec keyed with the test secrets
    #[must_use]
    pub fn session_codec() -> SessionCodec {
        Self::settings().build_session_codec()
    }

    /// Cookie holding a fresh session for `uid`
    ///
    /// # Panics
    ///
    /// Panics if the session cannot be issued
    #[must_use]
    pub fn session_cookie(uid: &str) -> Cookie<'static> {
        let value = Self::session_codec()
            .issue_default(uid)
            .expect("test session should issue");
        Cookie::new(SESSION_COOKIE_NAME, value)
    }

    #[must_use]
    pub fn routes() -> AppRoutes {
        AppRoutes::default()
    }

    /// Client config named `test` with every endpoint under `base_url`
    #[must_use]
    pub fn client_config(base_url: &str) -> OAuth2ClientConfig {
        Self::named_client_config("test", base_url)
    }

    /// Client config for `name` with every endpoint under `base_url`
    #[must_use]
    pub fn named_client_config(name: &str, base_url: &str) -> OAuth2ClientConfig {
        OAuth2ClientConfig::new(
            name,
            TEST_CLIENT_ID,
            TEST_CLIENT_SECRET,
            &format!("http://localhost:8080/oauth2/{name}/authorized"),
            &format!("{base_url}/authorize"),
            &format!("{base_url}/token"),
            &format!("{base_url}/userinfo"),
        )
        .with_scope("user")
        .with_state(TEST_STATE)
    }

    /// Registry holding the given clients
    #[must_use]
    pub fn registry(configs: Vec<OAuth2ClientConfig>) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        for config in configs {
            registry.insert(OAuth2Client::new(config, Self::routes()), Vec::new());
        }
        registry
    }
}
