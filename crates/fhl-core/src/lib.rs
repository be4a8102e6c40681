// Shared plumbing for the FHL report tools: configuration and logging.

pub mod config;
pub mod logging;
