use crate::web3::contract::{Contract, ContractError};
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;

/// Read-only view of an ERC-20 token contract.
#[derive(Clone)]
pub struct Erc20Token<P: Provider> {
    pub instance: Contract<P>,
}

impl<P: Provider> Erc20Token<P> {
    pub fn new(address: Address, provider: P) -> Result<Self, ContractError> {
        let instance = Contract::new(address, provider, "erc20.json")?;
        Ok(Self { instance })
    }

    async fn call_uint(
        &self,
        name: &'static str,
        args: &[alloy::dyn_abi::DynSolValue],
    ) -> Result<U256, ContractError> {
        self.instance
            .instance()
            .function(name, args)?
            .call()
            .await?
            .into_iter()
            .next()
            .and_then(|value| value.as_uint())
            .map(|(value, _)| value)
            .ok_or(ContractError::UnexpectedReturn(name))
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, ContractError> {
        self.call_uint("balanceOf", &[account.into()]).await
    }

    pub async fn decimals(&self) -> Result<u8, ContractError> {
        let decimals = self.call_uint("decimals", &[]).await?;
        if decimals > U256::from(u8::MAX) {
            return Err(ContractError::UnexpectedReturn("decimals"));
        }
        Ok(decimals.to::<u8>())
    }

    pub async fn symbol(&self) -> Result<String, ContractError> {
        self.instance
            .instance()
            .function("symbol", &[])?
            .call()
            .await?
            .into_iter()
            .next()
            .and_then(|value| value.as_str().map(str::to_owned))
            .ok_or(ContractError::UnexpectedReturn("symbol"))
    }
}
