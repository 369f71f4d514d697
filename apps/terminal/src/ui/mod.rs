//! UI layer for the terminal client: command parsing, screen rendering, and the app loop.

pub mod app;
pub mod command;
pub mod output;
pub mod view;

pub use app::{spawn_stdin_reader, TerminalApp};
