use axum::routing::MethodFilter;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn filter(self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Patch => MethodFilter::PATCH,
            HttpMethod::Delete => MethodFilter::DELETE,
        }
    }
}

/// Resource operations exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Index,
    Store,
    Show,
    Update,
    Destroy,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RouteInfo {
    pub method: HttpMethod,
    pub path: &'static str,
    pub operation: Operation,
}

const fn route(method: HttpMethod, path: &'static str, operation: Operation) -> RouteInfo {
    RouteInfo {
        method,
        path,
        operation,
    }
}

// Paths are absolute; keep them in sync with `API_PREFIX`.
static ROUTES: [RouteInfo; 6] = [
    route(HttpMethod::Get, "/api/todos", Operation::Index),
    route(HttpMethod::Post, "/api/todos", Operation::Store),
    route(HttpMethod::Get, "/api/todos/{id}", Operation::Show),
    route(HttpMethod::Put, "/api/todos/{id}", Operation::Update),
    route(HttpMethod::Patch, "/api/todos/{id}", Operation::Update),
    route(HttpMethod::Delete, "/api/todos/{id}", Operation::Destroy),
];

pub fn routes() -> &'static [RouteInfo] {
    &ROUTES
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Operation, routes};
    use crate::routes::API_PREFIX;

    #[test]
    fn every_operation_is_routed() {
        let routed: HashSet<_> = routes().iter().map(|route| route.operation).collect();

        for op in [
            Operation::Index,
            Operation::Store,
            Operation::Show,
            Operation::Update,
            Operation::Destroy,
        ] {
            assert!(routed.contains(&op), "{op:?} has no route");
        }
    }

    #[test]
    fn method_and_path_pairs_are_unique() {
        let mut seen = HashSet::new();
        for route in routes() {
            assert!(route.path.starts_with(API_PREFIX));
            assert!(
                seen.insert((route.method, route.path)),
                "duplicate route {:?} {}",
                route.method,
                route.path
            );
        }
    }
}
