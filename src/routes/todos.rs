use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    routing::{MethodRouter, on},
};
use serde_json::{Map, Value};

use crate::{
    db::Todo,
    error::AppError,
    response::{ApiResult, JsonApiResponse},
    routes::route_list::{Operation, RouteInfo, routes},
    services::{ServiceContext, todo_service::TodoService},
    state::AppState,
};

/// Builds the resource router from the dispatch table in `route_list`.
pub fn router(state: Arc<AppState>) -> Router {
    routes()
        .iter()
        .fold(Router::new(), |router, route| {
            router.route(route.path, method_router(route))
        })
        .with_state(state)
}

fn method_router(route: &RouteInfo) -> MethodRouter<Arc<AppState>> {
    let filter = route.method.filter();
    match route.operation {
        Operation::Index => on(filter, index),
        Operation::Store => on(filter, store),
        Operation::Show => on(filter, show),
        Operation::Update => on(filter, update),
        Operation::Destroy => on(filter, destroy),
    }
}

async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Todo>> {
    let todos = todo_service_from_state(&state).index().await?;
    JsonApiResponse::ok(todos)
}

async fn store(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Todo> {
    let fields = body_fields(&body)?;
    let todo = todo_service_from_state(&state).store(&fields).await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "created", todo)
}

async fn show(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Todo> {
    let id = todo_id(id)?;
    let todo = todo_service_from_state(&state).show(id).await?;
    JsonApiResponse::ok(todo)
}

async fn update(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> ApiResult<Todo> {
    let id = todo_id(id)?;
    let fields = body_fields(&body)?;
    let todo = todo_service_from_state(&state).update(id, &fields).await?;
    JsonApiResponse::ok(todo)
}

async fn destroy(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = todo_id(id)?;
    todo_service_from_state(&state).destroy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// An id that is not an integer can never match a record.
fn todo_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::not_found("Todo not found"))
}

/// Empty or whitespace-only bodies count as an empty field set, with or
/// without a JSON content type.
fn body_fields(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(AppError::bad_request("Request body must be a JSON object")),
        Err(err) => Err(AppError::bad_request(format!(
            "Failed to parse the request body as JSON: {err}"
        ))),
    }
}

fn todo_service_from_state(state: &AppState) -> TodoService {
    ServiceContext::from_state(state).todo()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::body_fields;
    use crate::error::AppError;

    #[test]
    fn blank_bodies_are_empty_field_sets() {
        assert!(body_fields(b"").expect("empty body").is_empty());
        assert!(body_fields(b" \n\t").expect("whitespace body").is_empty());
    }

    #[test]
    fn objects_are_passed_through() {
        let fields = body_fields(br#"{"title": "Buy milk", "extra": 1}"#).expect("object body");

        assert_eq!(fields.get("title"), Some(&json!("Buy milk")));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn non_objects_and_malformed_json_are_bad_requests() {
        let bodies: [&[u8]; 3] = [br#"["Buy milk"]"#, b"null", b"{\"title\": "];
        for body in bodies {
            let err = body_fields(body).expect_err("body should be rejected");
            assert!(matches!(err, AppError::BadRequest(_)), "unexpected {err:?}");
        }
    }
}
