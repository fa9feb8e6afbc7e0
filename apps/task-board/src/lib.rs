//! Headless task board built on the Lazyview windowed list.

pub mod board;
pub mod settings;
pub mod store;
pub mod task;
pub mod template;

pub use board::{SortKey, TaskBoard, TaskRenderer, TaskRow};
pub use settings::BoardSettings;
pub use store::{StoreError, TaskStore};
pub use task::{Task, TaskStatus};
