pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod freshness;
pub mod logging;
pub mod mining;
pub mod query;
pub mod refresh;
pub mod rewards;
pub mod store;
pub mod views;

pub use cli::Cli;
