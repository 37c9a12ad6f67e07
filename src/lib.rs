#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the passport service
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod handlers;
pub mod models;
pub mod oauth;
pub mod session;
pub mod settings;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use handlers::{configure_services, health, index, oauth_callback, oauth_sign_in, sign_out};
pub use oauth::{OAuth2Client, ProviderRegistry};
pub use session::SessionCodec;
pub use settings::PassportSettings;
