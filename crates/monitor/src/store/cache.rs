use chrono::{DateTime, Utc};
use log::debug;
use shared::models::Node;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One successful fetch of the active node list.
#[derive(Debug, Clone)]
pub struct CachedNodes {
    pub nodes: Arc<Vec<Node>>,
    pub fetched_at: DateTime<Utc>,
}

/// Last known full node list for the session, shared by every view.
///
/// The slot is replaced wholesale on each successful refresh, so readers see
/// either the previous list or the new one. There is no expiry: staleness is
/// judged per node by the freshness classifier. Only the refresh scheduler
/// writes to it.
#[derive(Debug, Clone, Default)]
pub struct NodeCache {
    slot: Arc<RwLock<Option<CachedNodes>>>,
}

impl NodeCache {
    pub fn init() -> Self {
        Self::default()
    }

    /// `None` until the first successful fetch.
    pub async fn get(&self) -> Option<CachedNodes> {
        self.slot.read().await.clone()
    }

    pub async fn has_data(&self) -> bool {
        self.slot.read().await.is_some()
    }

    pub async fn find(&self, id: &str) -> Option<Node> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .and_then(|cached| cached.nodes.iter().find(|node| node.id == id).cloned())
    }

    pub(crate) async fn set(&self, nodes: Vec<Node>, fetched_at: DateTime<Utc>) {
        debug!("Replacing node cache with {} nodes", nodes.len());
        let entry = CachedNodes {
            nodes: Arc::new(nodes),
            fetched_at,
        };
        *self.slot.write().await = Some(entry);
    }
}
