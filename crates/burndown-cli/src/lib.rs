//! Burndown CLI - command line and HTTP surfaces for the burndown engine

#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod server;

pub use config::{AppConfig, ConfigError, ServerConfig, MAX_CONCURRENCY_ENV};
pub use server::{routes, serve, BurndownRequest};
