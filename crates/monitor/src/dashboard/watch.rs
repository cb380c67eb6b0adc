use super::Dashboard;
use crate::query::{QueryState, SortKey};
use crate::refresh::{RefreshHandle, RefreshState};
use crate::views::{Console, MiningView};
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

const HELP: &str = "\
commands:
  list                 show the node list
  rewards              show estimated rewards of active nodes
  search <text>        filter by node id or wallet (empty clears)
  sort <key>           freshness | cpu | ram | disk | reward
  page <n> | next | prev
  node <id>            node details
  mining <wallet>      on-chain mining status
  refresh              refresh now
  status               refresh status
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum WatchCommand {
    List,
    Rewards,
    Search(String),
    Sort(SortKey),
    Page(usize),
    Next,
    Prev,
    Node(String),
    Mining(String),
    Refresh,
    Status,
    Help,
    Quit,
}

impl WatchCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "" | "list" | "ls" => WatchCommand::List,
            "rewards" => WatchCommand::Rewards,
            "search" | "/" => WatchCommand::Search(arg.to_string()),
            "sort" => WatchCommand::Sort(arg.parse()?),
            "page" => WatchCommand::Page(
                arg.parse()
                    .map_err(|_| format!("Invalid page number '{arg}'"))?,
            ),
            "next" | "n" => WatchCommand::Next,
            "prev" | "p" => WatchCommand::Prev,
            "node" => WatchCommand::Node(required(arg, "node <id>")?),
            "mining" => WatchCommand::Mining(arg.to_string()),
            "refresh" | "r" => WatchCommand::Refresh,
            "status" => WatchCommand::Status,
            "help" | "?" => WatchCommand::Help,
            "quit" | "exit" | "q" => WatchCommand::Quit,
            other => return Err(format!("Unknown command '{other}', type 'help'")),
        };
        Ok(command)
    }
}

fn required(arg: &str, usage: &str) -> Result<String, String> {
    if arg.is_empty() {
        return Err(format!("usage: {usage}"));
    }
    Ok(arg.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    List,
    Rewards,
}

/// Per-session view state. Each screen keeps its own query.
struct Session {
    screen: Screen,
    list_query: QueryState,
    rewards_query: QueryState,
    total_pages: usize,
}

impl Session {
    fn new() -> Self {
        Self {
            screen: Screen::List,
            list_query: QueryState::new(),
            rewards_query: QueryState::active_rewards(),
            total_pages: 1,
        }
    }

    fn query_mut(&mut self) -> &mut QueryState {
        match self.screen {
            Screen::List => &mut self.list_query,
            Screen::Rewards => &mut self.rewards_query,
        }
    }

    async fn render(&mut self, dashboard: &Dashboard, refresh: &RefreshHandle) {
        let rendered = match self.screen {
            Screen::List => dashboard
                .list_view(refresh, &self.list_query)
                .await
                .map(|(view, warning)| (view.page.total_pages, view.to_string(), warning)),
            Screen::Rewards => dashboard
                .rewards_view(refresh, &self.rewards_query)
                .await
                .map(|(view, warning)| (view.page.total_pages, view.to_string(), warning)),
        };

        match rendered {
            Ok((total_pages, text, warning)) => {
                self.total_pages = total_pages;
                if let Some(warning) = warning {
                    Console::user_error(&warning);
                }
                print!("{text}");
                Console::info("Refresh", &Dashboard::describe_status(&refresh.status()));
            }
            Err(e) => Console::user_error(&e.to_string()),
        }
    }

    /// Returns false when the session should end.
    async fn apply(
        &mut self,
        command: WatchCommand,
        dashboard: &mut Dashboard,
        refresh: &RefreshHandle,
    ) -> bool {
        match command {
            WatchCommand::List => self.screen = Screen::List,
            WatchCommand::Rewards => self.screen = Screen::Rewards,
            WatchCommand::Search(text) => self.query_mut().set_search(text),
            WatchCommand::Sort(key) => self.query_mut().set_sort(key),
            WatchCommand::Page(page) => self.query_mut().set_page(page),
            WatchCommand::Next => {
                let total_pages = self.total_pages;
                self.query_mut().next_page(total_pages);
            }
            WatchCommand::Prev => self.query_mut().prev_page(),
            WatchCommand::Refresh => {
                if refresh.status().state.is_fetching() {
                    Console::warning("Refresh already in progress");
                } else {
                    Console::progress("Refreshing");
                }
                refresh.force_refresh();
            }
            WatchCommand::Node(id) => {
                match dashboard.node_detail(&id).await {
                    Ok(detail) => print!("{detail}"),
                    Err(e) => Console::user_error(&e.to_string()),
                }
                return true;
            }
            WatchCommand::Mining(wallet) => {
                let lookup = dashboard.mining_status(&wallet).await;
                print!(
                    "{}",
                    MiningView {
                        wallet: wallet.trim(),
                        lookup: &lookup
                    }
                );
                return true;
            }
            WatchCommand::Status => {
                let status = refresh.status();
                Console::info("State", &status.state.to_string());
                Console::info("Refresh", &Dashboard::describe_status(&status));
                if let Some(error) = &status.last_error {
                    Console::user_error(error);
                }
                return true;
            }
            WatchCommand::Help => {
                println!("{HELP}");
                return true;
            }
            WatchCommand::Quit => return false,
        }
        self.render(dashboard, refresh).await;
        true
    }
}

/// Interactive session: the refresh scheduler runs in the background while
/// commands are read line by line from stdin. Every view reads the same cache.
pub async fn run(
    mut dashboard: Dashboard,
    cancellation_token: CancellationToken,
) -> Result<()> {
    let (refresh, task) = dashboard.start_refresh(cancellation_token.clone()).await;
    let mut updates = refresh.subscribe();
    let mut session = Session::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    Console::section("NETRUM NODE MONITOR");
    println!("{HELP}");
    session.render(&dashboard, &refresh).await;
    let status = refresh.status();
    let mut rendered_at: Option<DateTime<Utc>> = status.last_updated;
    // Failures up to this fetch were already shown by a render.
    let mut reported_failure = status.fetches_started;

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => break,
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match WatchCommand::parse(&line) {
                    Ok(command) => {
                        if !session.apply(command, &mut dashboard, &refresh).await {
                            break;
                        }
                        let status = refresh.status();
                        rendered_at = status.last_updated;
                        reported_failure = status.fetches_started;
                    }
                    Err(e) => Console::user_error(&e),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = updates.borrow_and_update().clone();
                if status.last_updated != rendered_at {
                    rendered_at = status.last_updated;
                    session.render(&dashboard, &refresh).await;
                } else if status.state == RefreshState::Error
                    && reported_failure != status.fetches_started
                {
                    reported_failure = status.fetches_started;
                    if let Some(error) = &status.last_error {
                        Console::user_error(&format!("Refresh failed: {error}"));
                    }
                }
            }
        }
    }

    refresh.stop();
    if let Err(e) = task.await {
        debug!("Refresh task ended abnormally: {e}");
    }
    info!("Session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(WatchCommand::parse("").unwrap(), WatchCommand::List);
        assert_eq!(
            WatchCommand::parse("search  Alpha ").unwrap(),
            WatchCommand::Search("Alpha".to_string())
        );
        assert_eq!(
            WatchCommand::parse("search").unwrap(),
            WatchCommand::Search(String::new())
        );
        assert_eq!(
            WatchCommand::parse("SORT cpu").unwrap(),
            WatchCommand::Sort(SortKey::Cpu)
        );
        assert_eq!(WatchCommand::parse("page 3").unwrap(), WatchCommand::Page(3));
        assert_eq!(
            WatchCommand::parse("node 665f1c").unwrap(),
            WatchCommand::Node("665f1c".to_string())
        );
        assert_eq!(WatchCommand::parse("q").unwrap(), WatchCommand::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(WatchCommand::parse("sort speed").is_err());
        assert!(WatchCommand::parse("page two").is_err());
        assert!(WatchCommand::parse("node").is_err());
        assert!(WatchCommand::parse("launch").is_err());
    }

    #[test]
    fn test_session_queries_are_independent() {
        let mut session = Session::new();
        session.query_mut().set_search("alpha");
        session.screen = Screen::Rewards;
        assert_eq!(session.query_mut().search(), "");
        assert!(session.query_mut().active_only());
        assert_eq!(session.list_query.search(), "alpha");
    }
}
