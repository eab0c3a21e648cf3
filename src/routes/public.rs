use axum::{Router, routing::get};
use serde::Serialize;

use crate::response::{ApiResult, JsonApiResponse};
use crate::routes::route_list::{RouteInfo, routes};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub fn router() -> Router {
    Router::new()
        .route("/up", get(health))
        .route("/api/routes.json", get(list_routes_json))
}

async fn health() -> ApiResult<HealthResponse> {
    JsonApiResponse::ok(HealthResponse { status: "up" })
}

async fn list_routes_json() -> ApiResult<&'static [RouteInfo]> {
    JsonApiResponse::ok(routes())
}
