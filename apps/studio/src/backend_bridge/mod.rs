//! Bridge from the shell thread to the backend worker that owns the tokio runtime.

pub mod commands;
pub mod runtime;
