use super::cooldown::Cooldown;
use crate::api::NetrumApi;
use log::{debug, warn};
use shared::models::mining::MiningStatusReport;
use shared::models::wallet::{validate_wallet_address, WalletAddressError};
use std::time::Duration;

const COOLDOWN_KEY: &str = "mining-status";

#[derive(Debug)]
pub enum MiningLookup {
    Found(Box<MiningStatusReport>),
    /// Upstream answered without a usable report.
    NoData,
    RequestFailed,
    CoolingDown { remaining: Duration },
    InvalidWallet(WalletAddressError),
}

/// Looks up on-chain mining status for a wallet. Input is validated before any
/// request is made, and only a successful lookup starts the cooldown.
pub struct MiningStatusChecker {
    api: NetrumApi,
    cooldown: Cooldown,
}

impl MiningStatusChecker {
    pub fn new(api: NetrumApi, cooldown: Cooldown) -> Self {
        Self { api, cooldown }
    }

    pub fn cooldown_remaining(&self) -> Duration {
        self.cooldown.remaining(COOLDOWN_KEY)
    }

    pub async fn check(&mut self, wallet: &str) -> MiningLookup {
        let address = match validate_wallet_address(wallet) {
            Ok(address) => address,
            Err(e) => return MiningLookup::InvalidWallet(e),
        };

        if !self.cooldown.can_call(COOLDOWN_KEY) {
            return MiningLookup::CoolingDown {
                remaining: self.cooldown_remaining(),
            };
        }

        match self.api.fetch_mining_status(&address).await {
            Ok(report) if report.success => {
                self.cooldown.mark_called(COOLDOWN_KEY);
                MiningLookup::Found(Box::new(report))
            }
            Ok(_) => {
                debug!("No mining data for {address}");
                MiningLookup::NoData
            }
            Err(e) => {
                warn!("Mining status lookup failed: {e}");
                MiningLookup::RequestFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use url::Url;

    const WALLET: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn checker(server: &Server) -> MiningStatusChecker {
        let api = NetrumApi::new(&Url::parse(&server.url()).unwrap()).unwrap();
        MiningStatusChecker::new(api, Cooldown::default())
    }

    #[tokio::test]
    async fn test_invalid_wallet_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let mut checker = checker(&server);
        assert!(matches!(
            checker.check("").await,
            MiningLookup::InvalidWallet(WalletAddressError::Empty)
        ));
        assert!(matches!(
            checker.check("0x123").await,
            MiningLookup::InvalidWallet(WalletAddressError::InvalidFormat)
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_success_starts_cooldown() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", format!("/mining/debug/contract/{WALLET}").as_str())
            .with_status(200)
            .with_body(r#"{"success": true, "contract": {"miningInfo": {"isActive": true}}}"#)
            .expect(1)
            .create_async()
            .await;

        let mut checker = checker(&server);
        match checker.check(WALLET).await {
            MiningLookup::Found(report) => assert!(report.is_mining_active()),
            other => panic!("unexpected lookup result: {other:?}"),
        }
        match checker.check(WALLET).await {
            MiningLookup::CoolingDown { remaining } => {
                assert!(remaining > Duration::from_secs(25));
            }
            other => panic!("unexpected lookup result: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unsuccessful_report_does_not_start_cooldown() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", format!("/mining/debug/contract/{WALLET}").as_str())
            .with_status(500)
            .with_body(r#"{"success": false}"#)
            .expect(2)
            .create_async()
            .await;

        let mut checker = checker(&server);
        assert!(matches!(checker.check(WALLET).await, MiningLookup::NoData));
        assert!(matches!(checker.check(WALLET).await, MiningLookup::NoData));
        assert_eq!(checker.cooldown_remaining(), Duration::ZERO);
        mock.assert_async().await;
    }
}
