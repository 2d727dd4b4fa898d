//! HTTP surface of the parser service.

use crate::matcher::OrderParser;
use actix_web::{web, HttpResponse, Responder};
use shared::dto::{ParseRequest, ParseResponse, ServiceStatus};
use tracing::debug;

/// Liveness endpoint for orchestration.
async fn health() -> impl Responder {
    "OK"
}

async fn status() -> HttpResponse {
    HttpResponse::Ok().json(ServiceStatus {
        status: "nlu parser online".into(),
    })
}

/// Parse one customer message. An unavailable tokenizer still answers 200
/// with an empty item list.
async fn parse(
    parser: web::Data<OrderParser>,
    web::Json(req): web::Json<ParseRequest>,
) -> HttpResponse {
    debug!(keywords = req.product_keywords.len(), "parse request");
    let items = parser.parse(&req.text, req.product_keywords.as_slice());
    HttpResponse::Ok().json(ParseResponse { items })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status))
        .route("/health", web::get().to(health))
        .route("/parse", web::post().to(parse));
}
