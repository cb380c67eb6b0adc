use crate::api::NodeSource;
use crate::error::ApiError;
use alloy::primitives::Address;
use anyhow::{bail, Context as _};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use shared::models::api::{unwrap_node, unwrap_node_list};
use shared::models::mining::MiningStatusReport;
use shared::models::Node;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://node.netrumlabs.dev";

/// Client for the public node-status API.
///
/// Requests carry no timeout of their own; the transport default applies.
#[derive(Debug, Clone)]
pub struct NetrumApi {
    client: Client,
    base_url: Url,
}

impl NetrumApi {
    pub fn new(base_url: &Url) -> anyhow::Result<Self> {
        if base_url.cannot_be_a_base() {
            bail!("API base URL cannot carry a path: {base_url}");
        }
        let client = Client::builder()
            .user_agent(format!("node-monitor/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(&self, url: Url, require_success: bool) -> Result<Value, ApiError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if require_success && !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })
    }

    pub async fn fetch_active_nodes(&self) -> Result<Vec<Node>, ApiError> {
        let body = self
            .get_json(self.endpoint(&["lite", "nodes", "active"]), true)
            .await?;
        let nodes = unwrap_node_list(&body)?;
        debug!("Fetched {} active nodes", nodes.len());
        Ok(nodes)
    }

    pub async fn fetch_node(&self, id: &str) -> Result<Node, ApiError> {
        let body = self
            .get_json(self.endpoint(&["lite", "nodes", "id", id]), true)
            .await?;
        Ok(unwrap_node(&body)?)
    }

    /// Task statistics, passed through verbatim.
    pub async fn fetch_task_stats(&self, id: &str) -> Result<Value, ApiError> {
        self.get_json(self.endpoint(&["polling", "node-stats", id]), true)
            .await
    }

    /// The debug endpoint reports failures in-band through `success`, so the
    /// status code is not checked here.
    pub async fn fetch_mining_status(
        &self,
        wallet: &Address,
    ) -> Result<MiningStatusReport, ApiError> {
        let wallet = alloy::primitives::hex::encode_prefixed(wallet);
        let body = self
            .get_json(self.endpoint(&["mining", "debug", "contract", &wallet]), false)
            .await?;
        match serde_json::from_value(body) {
            Ok(report) => Ok(report),
            Err(e) => {
                debug!("Malformed mining status for {wallet}, treating as unsuccessful: {e}");
                Ok(MiningStatusReport::default())
            }
        }
    }
}

#[async_trait]
impl NodeSource for NetrumApi {
    async fn fetch_active_nodes(&self) -> Result<Vec<Node>, ApiError> {
        NetrumApi::fetch_active_nodes(self).await
    }
}
