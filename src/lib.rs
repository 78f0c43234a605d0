pub mod catalog;
pub mod config;
pub mod engine;
pub mod page;
pub mod server;
pub mod source;
pub mod telemetry;
