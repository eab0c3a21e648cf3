pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod todo_dao;

pub use base::DaoBase;
pub use base_traits::{HasIdColumn, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{StoreError, StoreResult};
pub use todo_dao::TodoDao;
