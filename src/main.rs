#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use passport::{
    configure_services,
    oauth::{AccountBindings, InMemoryAccountBindings},
    settings::PassportSettings,
    ProviderRegistry, SessionCodec,
};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = PassportSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    let registry = ProviderRegistry::from_settings(&settings)
        .map_err(|e| std::io::Error::other(format!("Failed to initialize OAuth providers: {e}")))?;

    let codec = settings.build_session_codec();

    // TODO: replace with a database-backed binding store once the account tables land
    let bindings: Arc<dyn AccountBindings> = Arc::new(InMemoryAccountBindings::new());

    println!("✓ Using stateless sessions with encrypted cookies");
    start_server(settings, registry, codec, bindings).await
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(
    settings: PassportSettings,
    registry: ProviderRegistry,
    codec: SessionCodec,
    bindings: Arc<dyn AccountBindings>,
) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings, &registry);

    let cors_origins = settings.get_cors_origins();
    let settings = web::Data::new(settings);
    let registry = web::Data::new(registry);
    let codec = web::Data::new(codec);
    let bindings: web::Data<dyn AccountBindings> = web::Data::from(bindings);

    HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(settings.clone())
            .app_data(registry.clone())
            .app_data(codec.clone())
            .app_data(bindings.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, settings: &PassportSettings, registry: &ProviderRegistry) {
    println!("Starting Passport on http://{bind_address}");
    println!();
    println!("OAuth2 endpoints:");
    println!("  GET  /oauth2/{{provider}}/login      - Redirect to the provider");
    println!("  GET  /oauth2/{{provider}}/authorized - Provider callback");
    println!("  GET  /signOut                      - Clear session");
    println!();
    println!("Callback URLs for identity providers:");
    for name in registry.provider_names() {
        println!(
            "  {}/oauth2/{name}/authorized",
            settings.application.redirect_base_url.trim_end_matches('/')
        );
    }
    println!();
    println!("System endpoints:");
    println!("  GET  /      - Signed-in index");
    println!("  GET  /ping  - Health check");
}
