// Infrastructure module - External dependencies and adapters
pub mod config;
pub mod file_sink;
pub mod logging;
pub mod memory;
pub mod serial;

pub use file_sink::FileSink;
