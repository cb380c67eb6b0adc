use super::machine::{FetchKind, RefreshMachine, RefreshStatus};
use crate::api::NodeSource;
use crate::error::ApiError;
use crate::store::NodeCache;
use chrono::Utc;
use futures::stream::FuturesUnordered;
use log::{debug, error, info, warn};
use shared::models::Node;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshCommand {
    ForceRefresh,
    Stop,
}

/// Drives a [`RefreshMachine`] against a [`NodeSource`] and publishes every
/// successful fetch into the shared [`NodeCache`]. The cache has no other writer.
pub struct RefreshScheduler<S: NodeSource + 'static> {
    source: Arc<S>,
    cache: NodeCache,
    machine: RefreshMachine,
    status_tx: watch::Sender<RefreshStatus>,
}

/// Cloneable control surface handed to views.
#[derive(Clone)]
pub struct RefreshHandle {
    commands: mpsc::UnboundedSender<RefreshCommand>,
    status: watch::Receiver<RefreshStatus>,
}

impl RefreshHandle {
    pub fn force_refresh(&self) {
        if self.commands.send(RefreshCommand::ForceRefresh).is_err() {
            debug!("Refresh scheduler already stopped, ignoring refresh request");
        }
    }

    pub fn stop(&self) {
        let _ = self.commands.send(RefreshCommand::Stop);
    }

    pub fn status(&self) -> RefreshStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RefreshStatus> {
        self.status.clone()
    }

    /// Resolves once no fetch is outstanding, returning the status at that point.
    pub async fn settled(&self) -> RefreshStatus {
        let mut status = self.status.clone();
        let settled = match status.wait_for(|s| !s.state.is_fetching()).await {
            Ok(settled) => settled.clone(),
            Err(_) => self.status(),
        };
        settled
    }
}

impl<S: NodeSource + 'static> RefreshScheduler<S> {
    pub fn new(source: Arc<S>, cache: NodeCache, interval: Duration) -> Self {
        let machine = RefreshMachine::new(interval);
        let (status_tx, _) = watch::channel(machine.status());
        Self {
            source,
            cache,
            machine,
            status_tx,
        }
    }

    /// Mounts against the current cache contents and spawns the polling loop.
    /// The returned status already reflects whether an initial fetch is running.
    pub async fn start(
        mut self,
        cancellation_token: CancellationToken,
    ) -> (RefreshHandle, JoinHandle<()>) {
        let initial = self.machine.mount(self.cache.has_data().await);
        match initial {
            Some(_) => info!("Node cache is empty, fetching active nodes"),
            None => info!(
                "Serving cached nodes, next refresh in {}s",
                self.machine.remaining_secs()
            ),
        }
        self.status_tx.send_replace(self.machine.status());

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let handle = RefreshHandle {
            commands: commands_tx,
            status: self.status_tx.subscribe(),
        };
        let task = tokio::spawn(self.run(initial, commands_rx, cancellation_token));
        (handle, task)
    }

    async fn run(
        mut self,
        initial: Option<FetchKind>,
        mut commands: mpsc::UnboundedReceiver<RefreshCommand>,
        cancellation_token: CancellationToken,
    ) {
        use futures::StreamExt as _;

        let mut ticker = interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut fetch_futures = FuturesUnordered::new();
        if initial.is_some() {
            fetch_futures.push(self.spawn_fetch());
        }

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => break,
                command = commands.recv() => match command {
                    Some(RefreshCommand::ForceRefresh) => {
                        if self.machine.force_refresh().is_some() {
                            fetch_futures.push(self.spawn_fetch());
                        } else {
                            debug!("Refresh already in flight");
                        }
                    }
                    Some(RefreshCommand::Stop) | None => break,
                },
                _ = ticker.tick() => {
                    if self.machine.tick().is_some() {
                        fetch_futures.push(self.spawn_fetch());
                    }
                }
                Some(res) = fetch_futures.next() => {
                    let outcome = match res {
                        Ok(Ok(nodes)) => {
                            let now = Utc::now();
                            info!("Fetched {} active nodes", nodes.len());
                            self.cache.set(nodes, now).await;
                            Ok(())
                        }
                        Ok(Err(e)) => {
                            warn!("Error fetching active nodes: {e}");
                            Err(e.to_string())
                        }
                        Err(e) => {
                            error!("Task failed while fetching nodes: {e}");
                            Err(e.to_string())
                        }
                    };
                    self.machine.complete(outcome, Utc::now());
                }
            }
            self.status_tx.send_replace(self.machine.status());
        }
        for fetch in fetch_futures.iter() {
            fetch.abort();
        }
        info!("Refresh scheduler stopped");
    }

    fn spawn_fetch(&self) -> JoinHandle<Result<Vec<Node>, ApiError>> {
        let source = Arc::clone(&self.source);
        tokio::task::spawn(async move { source.fetch_active_nodes().await })
    }
}
