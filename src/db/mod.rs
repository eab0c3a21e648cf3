pub mod connection;
pub mod dao;
pub mod entities;
pub mod memory;
pub mod providers;
pub mod store;

pub use memory::MemoryTodoStore;
pub use store::{NewTodo, Todo, TodoChanges, TodoStore};
