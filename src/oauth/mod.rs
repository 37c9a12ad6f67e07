//! OAuth2 login module
//!
//! Generic authorization-code client, the provider code table with endpoint
//! presets, the registry of configured providers and the openid binding lookup.

pub mod bindings;
pub mod client;
pub mod providers;
pub mod registry;

pub use bindings::{AccountBindings, InMemoryAccountBindings};
pub use client::{
    url_code, HttpMethod, OAuth2Client, OAuth2ClientConfig, OAuthError, ProviderResponse,
};
pub use providers::{provider_code, ProviderPreset, UnknownProvider};
pub use registry::ProviderRegistry;

use serde::Deserialize;

/// Query string of a provider callback
#[derive(Deserialize, Debug, Clone, Default)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Local routes the login flow redirects to
#[derive(Debug, Clone)]
pub struct AppRoutes {
    /// Where a signed-in user lands
    pub home: String,
    /// Binding page for an openid with no local account
    pub sign_up: String,
}

impl Default for AppRoutes {
    fn default() -> Self {
        Self {
            home: "/".to_string(),
            sign_up: "/OAuthGuide".to_string(),
        }
    }
}
