//! Bridge between the terminal UI thread and the backend worker.

pub mod commands;
pub mod runtime;
