//! Taiga Client - tracker API access for the burndown engine
//!
//! Implements [`MilestoneFetcher`](burndown_core::MilestoneFetcher) and
//! [`StoryDetailFetcher`](burndown_core::StoryDetailFetcher) over HTTP, plus
//! the project-level lookups dashboards use to populate their pickers.

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

// Re-exports
pub use client::TaigaClient;
pub use config::{TaigaConfig, DEFAULT_BASE_URL, TAIGA_URL_ENV};
pub use error::ClientError;
pub use wire::{parse_date, CustomAttribute};
