pub mod cache;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod manifest;
pub mod resolver;
pub mod scanner;
pub mod types;

// Use cases and the capability ports they depend on
pub mod app;
// Production adapters shelling out to external tools
pub mod infra;
