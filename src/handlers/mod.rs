// HTTP request handlers for the passport service
pub mod auth;
pub mod callback;
pub mod health;

pub use auth::{index, oauth_sign_in, sign_out};
pub use callback::oauth_callback;
pub use health::health;

use actix_web::web;

/// Register every route on an app or scope
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/oauth2/{provider}/login", web::get().to(oauth_sign_in))
        .route("/oauth2/{provider}/authorized", web::get().to(oauth_callback))
        .route("/signOut", web::get().to(sign_out))
        .route("/ping", web::get().to(health));
}
