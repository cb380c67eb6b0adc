pub mod client;

use crate::error::ApiError;
use async_trait::async_trait;
use shared::models::Node;

pub use client::{NetrumApi, DEFAULT_API_URL};

/// Source of the active node list polled by the refresh scheduler.
#[async_trait]
pub trait NodeSource: Send + Sync {
    async fn fetch_active_nodes(&self) -> Result<Vec<Node>, ApiError>;
}
