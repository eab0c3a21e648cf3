use async_trait::async_trait;
use sea_orm::{DatabaseConnection, Set};

use super::{DaoBase, StoreResult};
use crate::db::entities::{prelude::Todo as TodoEntity, todo};
use crate::db::store::{NewTodo, Todo, TodoChanges, TodoStore};

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl DaoBase for TodoDao {
    type Entity = TodoEntity;
    const NAME: &'static str = "todo";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl TodoStore for TodoDao {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        self.find_all().await
    }

    async fn create(&self, todo: NewTodo) -> StoreResult<Todo> {
        let model = todo::ActiveModel {
            title: Set(todo.title),
            description: Set(todo.description),
            completed: Set(todo.completed),
            ..Default::default()
        };
        DaoBase::create(self, model).await
    }

    async fn get(&self, id: i32) -> StoreResult<Todo> {
        self.find_by_id(id).await
    }

    async fn update(&self, id: i32, changes: TodoChanges) -> StoreResult<Todo> {
        let TodoChanges {
            title,
            description,
            completed,
        } = changes;
        DaoBase::update(self, id, move |active| {
            if let Some(title) = title {
                active.title = Set(title);
            }
            if let Some(description) = description {
                active.description = Set(description);
            }
            if let Some(completed) = completed {
                active.completed = Set(completed);
            }
        })
        .await
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        DaoBase::delete(self, id).await.map(|_| ())
    }
}
