use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::response::JsonApiResponse;

pub fn catch_panic_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(panic_to_json)
}

fn panic_to_json(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic"
    };

    let client_message = if cfg!(debug_assertions) {
        format!("internal server error: {}", details)
    } else {
        "internal server error".to_string()
    };

    JsonApiResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        message: client_message,
        data: serde_json::Value::Null,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{self, Body},
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    use super::catch_panic_layer;

    async fn explode() -> &'static str {
        panic!("store handle poisoned")
    }

    #[tokio::test]
    async fn panics_become_json_500s() {
        let app = Router::new()
            .route("/explode", get(explode))
            .layer(catch_panic_layer());

        let response = app
            .oneshot(Request::get("/explode").body(Body::empty()).expect("request"))
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("body should be json");
        assert_eq!(json["status"], 500);
        assert!(
            json["message"]
                .as_str()
                .is_some_and(|message| message.starts_with("internal server error"))
        );
    }
}
