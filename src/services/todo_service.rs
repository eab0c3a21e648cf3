use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    db::{Todo, TodoStore, dao::StoreError},
    error::AppError,
    validation::{validate_create, validate_update},
};

#[derive(Clone, Copy, Debug)]
pub enum TodoOp {
    Index,
    Store,
    Show,
    Update,
    Destroy,
}

impl TodoOp {
    fn failure_context(self) -> &'static str {
        match self {
            TodoOp::Index | TodoOp::Show => "Find failed",
            TodoOp::Store => "Create failed",
            TodoOp::Update => "Update failed",
            TodoOp::Destroy => "Delete failed",
        }
    }
}

const NOT_FOUND_MESSAGE: &str = "Todo not found";

/// validate -> persist -> respond, one store round trip per step.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    fn map_error(&self, op: TodoOp, err: StoreError) -> AppError {
        match err {
            StoreError::NotFound { .. } => AppError::not_found(NOT_FOUND_MESSAGE),
            StoreError::Db(_) | StoreError::Unavailable(_) => {
                let message = format!(
                    "{}. Please check the logs for more details",
                    op.failure_context()
                );
                AppError::internal_with_source(message, err)
            }
        }
    }

    pub async fn index(&self) -> Result<Vec<Todo>, AppError> {
        self.store
            .list()
            .await
            .map_err(|err| self.map_error(TodoOp::Index, err))
    }

    pub async fn store(&self, fields: &Map<String, Value>) -> Result<Todo, AppError> {
        let new_todo = validate_create(fields)?;
        let todo = self
            .store
            .create(new_todo)
            .await
            .map_err(|err| self.map_error(TodoOp::Store, err))?;
        info!(todo_id = todo.id, "todo created");
        Ok(todo)
    }

    pub async fn show(&self, id: i32) -> Result<Todo, AppError> {
        self.store
            .get(id)
            .await
            .map_err(|err| self.map_error(TodoOp::Show, err))
    }

    pub async fn update(&self, id: i32, fields: &Map<String, Value>) -> Result<Todo, AppError> {
        self.show(id).await?;
        let changes = validate_update(fields)?;
        if changes.is_empty() {
            debug!(todo_id = id, "empty update, refreshing timestamp only");
        }
        let todo = self
            .store
            .update(id, changes)
            .await
            .map_err(|err| self.map_error(TodoOp::Update, err))?;
        info!(todo_id = id, "todo updated");
        Ok(todo)
    }

    pub async fn destroy(&self, id: i32) -> Result<(), AppError> {
        self.show(id).await?;
        self.store
            .delete(id)
            .await
            .map_err(|err| self.map_error(TodoOp::Destroy, err))?;
        info!(todo_id = id, "todo deleted");
        Ok(())
    }
}
