use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::middleware::{self, ErrorHandlerResponse, ErrorHandlers};
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Serialize;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::PlannerError;
use crate::parser::parse_request;
use crate::schedule::{analyze_conflicts, plan_week, GenerationResponse, PlanOutcome};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

// Schedule generation endpoint
async fn generate_schedule(body: web::Bytes) -> Result<HttpResponse, PlannerError> {
    let request = parse_request(&body)?;
    info!(
        days = request.days.len(),
        subjects = request.subjects.len(),
        rest_periods = request.rest_periods.len(),
        "generation requested"
    );

    let outcome = plan_week(&request);
    let blocked = matches!(outcome, PlanOutcome::Blocked(_));
    let response = GenerationResponse::from(outcome);
    if blocked {
        Ok(HttpResponse::UnprocessableEntity().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}

// Conflict preview endpoint, used before asking the user to proceed
async fn check_conflicts(body: web::Bytes) -> Result<HttpResponse, PlannerError> {
    let request = parse_request(&body)?;
    Ok(HttpResponse::Ok().json(analyze_conflicts(&request)))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(serde_json::json!({ "error": "Method not allowed" }))
}

// The body extractor answers an oversized payload with plain text
fn payload_too_large<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();
    let res = HttpResponse::PayloadTooLarge()
        .json(serde_json::json!({ "error": "Request body is too large" }));
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, res).map_into_right_body(),
    ))
}

/// Rewrites framework-generated error responses into the `{error}` JSON shape
pub fn json_errors<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::PAYLOAD_TOO_LARGE, payload_too_large)
}

/// Registers the API routes; shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/schedule")
            .route(web::post().to(generate_schedule))
            .default_service(web::route().to(method_not_allowed)),
    )
    .service(
        web::resource("/api/conflicts")
            .route(web::post().to(check_conflicts))
            .default_service(web::route().to(method_not_allowed)),
    )
    .route("/health", web::get().to(health));
}

pub async fn start_server(config: ServerConfig) -> std::io::Result<()> {
    info!(host = %config.host, port = config.port, "starting schedule service");
    let payload_limit = config.payload_limit;

    HttpServer::new(move || {
        App::new()
            .app_data(web::PayloadConfig::new(payload_limit))
            .wrap(json_errors())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
