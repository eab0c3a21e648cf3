use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::dao::{StoreError, StoreResult};
use super::store::{NewTodo, Todo, TodoChanges, TodoStore};

const ENTITY: &str = "todo";

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    inner: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    rows: BTreeMap<i32, Todo>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let state = self.inner.read().await;
        Ok(state.rows.values().cloned().collect())
    }

    async fn create(&self, todo: NewTodo) -> StoreResult<Todo> {
        let mut state = self.inner.write().await;
        let id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable("todo id space exhausted".to_string()))?;
        let now = Utc::now().fixed_offset();
        let record = Todo {
            id,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: now,
            updated_at: now,
        };
        state.last_id = id;
        state.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: i32) -> StoreResult<Todo> {
        let state = self.inner.read().await;
        state
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    async fn update(&self, id: i32, changes: TodoChanges) -> StoreResult<Todo> {
        let mut state = self.inner.write().await;
        let record = state
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;

        if let Some(title) = changes.title {
            record.title = title;
        }
        if let Some(description) = changes.description {
            record.description = description;
        }
        if let Some(completed) = changes.completed {
            record.completed = completed;
        }
        record.updated_at = Utc::now().fixed_offset();

        Ok(record.clone())
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        state
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }
}
