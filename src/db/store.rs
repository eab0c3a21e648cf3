use async_trait::async_trait;

use super::dao::StoreResult;
use super::entities::todo;

pub type Todo = todo::Model;

/// Validated fields for a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Validated partial update. `None` leaves the stored value untouched;
/// `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

/// Persistence for todo records, keyed by the id the store assigns.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Every record in ascending id order.
    async fn list(&self) -> StoreResult<Vec<Todo>>;

    async fn create(&self, todo: NewTodo) -> StoreResult<Todo>;

    async fn get(&self, id: i32) -> StoreResult<Todo>;

    /// Applies the present fields and refreshes `updated_at`, even for an
    /// empty change set.
    async fn update(&self, id: i32, changes: TodoChanges) -> StoreResult<Todo>;

    async fn delete(&self, id: i32) -> StoreResult<()>;
}
