// File: ./src/model/mod.rs
pub mod display;
pub mod item;

pub use display::TaskDisplay;
pub use item::{
    MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS, ParsedTask, Priority, Task, TaskDraft, TaskStatus,
    TaskValidationError,
};
