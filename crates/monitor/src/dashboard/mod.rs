pub mod watch;

use crate::api::NetrumApi;
use crate::config::Settings;
use crate::error::ApiError;
use crate::mining::{Cooldown, MiningLookup, MiningStatusChecker};
use crate::query::QueryState;
use crate::refresh::{RefreshHandle, RefreshScheduler, RefreshStatus};
use crate::store::NodeCache;
use crate::views::{load_detail, ListView, NodeDetail, RewardsView};
use anyhow::{anyhow, Context as _, Result};
use chrono::Utc;
use log::info;
use shared::models::Node;
use shared::web3::{BalanceLookup, RpcBalanceLookup};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Nodes available to a view, plus the refresh error to show above them when
/// the latest fetch failed but an earlier one succeeded.
pub struct Snapshot {
    pub nodes: Arc<Vec<Node>>,
    pub warning: Option<String>,
}

/// Owns the session-wide pieces every view shares: one API client, one node
/// cache, the optional balance capability and the mining-status checker.
pub struct Dashboard {
    api: NetrumApi,
    cache: NodeCache,
    balances: Option<Arc<dyn BalanceLookup>>,
    mining: MiningStatusChecker,
    refresh_interval: Duration,
}

impl Dashboard {
    pub fn new(settings: &Settings) -> Result<Self> {
        let api = NetrumApi::new(&settings.api_url)?;
        let balances: Option<Arc<dyn BalanceLookup>> = if settings.balance_lookup {
            let lookup = RpcBalanceLookup::new(settings.rpc_url.clone(), settings.token_address)
                .context("failed to set up balance lookup")?;
            Some(Arc::new(lookup))
        } else {
            info!("Balance lookup disabled");
            None
        };
        Ok(Self::with_parts(api, balances, settings.refresh_interval))
    }

    pub fn with_parts(
        api: NetrumApi,
        balances: Option<Arc<dyn BalanceLookup>>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            mining: MiningStatusChecker::new(api.clone(), Cooldown::default()),
            api,
            cache: NodeCache::init(),
            balances,
            refresh_interval,
        }
    }

    pub fn cache(&self) -> &NodeCache {
        &self.cache
    }

    pub async fn start_refresh(
        &self,
        cancellation_token: CancellationToken,
    ) -> (RefreshHandle, JoinHandle<()>) {
        RefreshScheduler::new(
            Arc::new(self.api.clone()),
            self.cache.clone(),
            self.refresh_interval,
        )
        .start(cancellation_token)
        .await
    }

    /// Serves cached nodes immediately, even while a background refresh runs.
    /// Only an empty cache waits for the outstanding fetch. Fails only when no
    /// fetch has ever succeeded.
    pub async fn snapshot(&self, refresh: &RefreshHandle) -> Result<Snapshot> {
        if let Some(cached) = self.cache.get().await {
            return Ok(Snapshot {
                nodes: cached.nodes,
                warning: refresh.status().last_error,
            });
        }

        let status = refresh.settled().await;
        match self.cache.get().await {
            Some(cached) => Ok(Snapshot {
                nodes: cached.nodes,
                warning: status.last_error,
            }),
            None => Err(anyhow!(status
                .last_error
                .unwrap_or_else(|| "Failed to load nodes".to_string()))),
        }
    }

    pub async fn list_view(
        &self,
        refresh: &RefreshHandle,
        query: &QueryState,
    ) -> Result<(ListView, Option<String>)> {
        let snapshot = self.snapshot(refresh).await?;
        Ok((
            ListView::build(&snapshot.nodes, query, Utc::now()),
            snapshot.warning,
        ))
    }

    pub async fn rewards_view(
        &self,
        refresh: &RefreshHandle,
        query: &QueryState,
    ) -> Result<(RewardsView, Option<String>)> {
        let snapshot = self.snapshot(refresh).await?;
        Ok((
            RewardsView::build(&snapshot.nodes, query, Utc::now()),
            snapshot.warning,
        ))
    }

    pub async fn node_detail(&self, id: &str) -> Result<NodeDetail, ApiError> {
        load_detail(
            id,
            &self.cache,
            &self.api,
            self.balances.as_deref(),
            Utc::now(),
        )
        .await
    }

    pub async fn mining_status(&mut self, wallet: &str) -> MiningLookup {
        self.mining.check(wallet).await
    }

    pub fn describe_status(status: &RefreshStatus) -> String {
        let updated = status
            .last_updated
            .map(|ts| ts.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        match status.state {
            state if state.is_fetching() => format!("{state}, last updated {updated}"),
            _ => format!(
                "Next refresh in {}s, last updated {updated}",
                status.remaining_secs
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NodeSource;
    use crate::refresh::RefreshState;
    use async_trait::async_trait;
    use mockito::Server;
    use serde_json::json;
    use url::Url;

    fn dashboard(server: &Server) -> Dashboard {
        let api = NetrumApi::new(&Url::parse(&server.url()).unwrap()).unwrap();
        Dashboard::with_parts(api, None, Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_snapshot_after_initial_fetch() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/lite/nodes/active")
            .with_status(200)
            .with_body(
                json!({ "data": { "nodes": [
                    { "_id": "a", "nodeId": "alpha", "wallet": "0x1", "nodeStatus": "Active" }
                ] } })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let dashboard = dashboard(&server);
        let token = CancellationToken::new();
        let (refresh, task) = dashboard.start_refresh(token.clone()).await;

        let snapshot = dashboard.snapshot(&refresh).await.unwrap();
        assert_eq!(snapshot.nodes.len(), 1);
        assert!(snapshot.warning.is_none());

        let (view, _) = dashboard.list_view(&refresh, &QueryState::new()).await.unwrap();
        assert_eq!(view.page.total_matches, 1);

        token.cancel();
        task.await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_snapshot_without_data_fails_with_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/lite/nodes/active")
            .with_status(200)
            .with_body(json!({ "items": [] }).to_string())
            .create_async()
            .await;

        let dashboard = dashboard(&server);
        let (refresh, _task) = dashboard.start_refresh(CancellationToken::new()).await;

        let err = dashboard.snapshot(&refresh).await.err().unwrap();
        assert_eq!(err.to_string(), "Invalid API response");
        assert_eq!(refresh.status().state, RefreshState::Error);
        refresh.stop();
    }

    struct StalledSource;

    #[async_trait]
    impl NodeSource for StalledSource {
        async fn fetch_active_nodes(&self) -> Result<Vec<Node>, ApiError> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_serves_cache_during_background_refresh() {
        let server = Server::new_async().await;
        let dashboard = dashboard(&server);
        let cached = Node {
            id: "cached".to_string(),
            ..Default::default()
        };
        dashboard.cache().set(vec![cached], Utc::now()).await;

        let scheduler = RefreshScheduler::new(
            Arc::new(StalledSource),
            dashboard.cache().clone(),
            Duration::from_secs(30),
        );
        let (refresh, _task) = scheduler.start(CancellationToken::new()).await;
        refresh.force_refresh();
        let mut status = refresh.subscribe();
        status
            .wait_for(|s| s.state == RefreshState::FetchingBackground)
            .await
            .unwrap();

        let snapshot = tokio::time::timeout(Duration::from_secs(5), dashboard.snapshot(&refresh))
            .await
            .expect("snapshot waited for the background fetch")
            .unwrap();
        assert_eq!(snapshot.nodes[0].id, "cached");
        assert!(snapshot.warning.is_none());
        assert_eq!(refresh.status().state, RefreshState::FetchingBackground);

        let (view, _) = dashboard.list_view(&refresh, &QueryState::new()).await.unwrap();
        assert_eq!(view.page.total_matches, 1);
        refresh.stop();
    }

    #[test]
    fn test_describe_status() {
        let status = RefreshStatus {
            state: RefreshState::Idle,
            remaining_secs: 12,
            last_updated: None,
            last_error: None,
            fetches_started: 1,
        };
        assert_eq!(
            Dashboard::describe_status(&status),
            "Next refresh in 12s, last updated never"
        );
    }
}
