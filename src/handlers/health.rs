use crate::models::HealthResponse;
use actix_web::{HttpResponse, Result};

/// Liveness probe
///
/// # Errors
/// Never fails
pub async fn health() -> Result<HttpResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        message: "Passport is running".to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}
