use crate::config::Config;
use crate::dashboard::{watch, Dashboard};
use crate::query::{QueryState, SortKey};
use crate::views::{Console, MiningView};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "node-monitor")]
#[command(about = "Read-only monitor for Netrum lite nodes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Node API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Balance RPC URL (overrides config)
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Seconds between background refreshes (default 30)
    #[arg(long, global = true)]
    pub refresh_interval: Option<u64>,

    /// Skip the external balance RPC
    #[arg(long, global = true, default_value = "false")]
    pub no_balance: bool,

    /// Log level
    #[arg(short = 'l', long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Network overview and node list
    Nodes {
        /// Filter by node id or wallet
        #[arg(short, long, default_value = "")]
        search: String,

        /// freshness | cpu | ram | disk | reward
        #[arg(long, default_value = "freshness")]
        sort: SortKey,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Estimated rewards of active nodes
    Rewards {
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Details of a single node
    Node {
        /// Node id
        id: String,
    },
    /// On-chain mining status of a wallet
    MiningStatus {
        wallet: String,
    },
    /// Interactive session with background refresh
    Watch,
}

impl Cli {
    pub async fn run(self, cancellation_token: CancellationToken) -> Result<()> {
        let settings = Config::load(self.config.as_deref())?
            .with_api_url(self.api_url)
            .with_rpc_url(self.rpc_url)
            .with_refresh_interval(self.refresh_interval)
            .with_balance_lookup(self.no_balance.then_some(false))
            .resolve()?;
        let mut dashboard = Dashboard::new(&settings)?;

        match self.command {
            Commands::Nodes { search, sort, page } => {
                let mut query = QueryState::new();
                query.set_search(search);
                query.set_sort(sort);
                query.set_page(page);

                let (refresh, _task) = dashboard.start_refresh(cancellation_token).await;
                let result = dashboard.list_view(&refresh, &query).await;
                refresh.stop();
                let (view, warning) = result?;
                if let Some(warning) = warning {
                    Console::user_error(&warning);
                }
                print!("{view}");
            }
            Commands::Rewards { search, page } => {
                let mut query = QueryState::active_rewards();
                query.set_search(search);
                query.set_page(page);

                let (refresh, _task) = dashboard.start_refresh(cancellation_token).await;
                let result = dashboard.rewards_view(&refresh, &query).await;
                refresh.stop();
                let (view, warning) = result?;
                if let Some(warning) = warning {
                    Console::user_error(&warning);
                }
                print!("{view}");
            }
            Commands::Node { id } => {
                let detail = dashboard.node_detail(&id).await?;
                print!("{detail}");
            }
            Commands::MiningStatus { wallet } => {
                let lookup = dashboard.mining_status(&wallet).await;
                print!(
                    "{}",
                    MiningView {
                        wallet: wallet.trim(),
                        lookup: &lookup,
                    }
                );
            }
            Commands::Watch => watch::run(dashboard, cancellation_token).await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nodes_command() {
        let cli = Cli::try_parse_from([
            "node-monitor",
            "nodes",
            "--sort",
            "cpu",
            "--page",
            "2",
            "-l",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Nodes { search, sort, page } => {
                assert_eq!(search, "");
                assert_eq!(sort, SortKey::Cpu);
                assert_eq!(page, 2);
            }
            _ => panic!("expected nodes command"),
        }
    }

    #[test]
    fn test_parse_global_flags_and_subcommands() {
        let cli = Cli::try_parse_from([
            "node-monitor",
            "--api-url",
            "http://localhost:3000",
            "--no-balance",
            "mining-status",
            "0x1234567890abcdef1234567890abcdef12345678",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:3000"));
        assert!(cli.no_balance);
        assert!(matches!(cli.command, Commands::MiningStatus { .. }));

        assert!(Cli::try_parse_from(["node-monitor", "nodes", "--sort", "speed"]).is_err());
        assert!(Cli::try_parse_from(["node-monitor", "node"]).is_err());
    }
}
