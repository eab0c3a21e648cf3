mod entry;
pub mod public;
pub mod route_list;
pub mod todos;

pub use entry::{API_PREFIX, app, router};
pub use route_list::{HttpMethod, Operation, RouteInfo, routes};
