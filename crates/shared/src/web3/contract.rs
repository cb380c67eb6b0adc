use alloy::{
    contract::{ContractInstance, Interface},
    json_abi::JsonAbi,
    primitives::Address,
    providers::Provider,
};
use std::include_bytes;
use thiserror::Error;

macro_rules! include_abi {
    ($path:expr) => {{
        const ABI_BYTES: &[u8] = include_bytes!($path);
        ABI_BYTES
    }};
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("unknown ABI artifact: {0}")]
    UnknownAbi(String),
    #[error("failed to parse ABI artifact {name}: {source}")]
    InvalidAbi {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Call(#[from] alloy::contract::Error),
    #[error("unexpected return value from {0}")]
    UnexpectedReturn(&'static str),
}

#[derive(Clone)]
pub struct Contract<P: Provider> {
    instance: ContractInstance<P>,
}

impl<P: Provider> Contract<P> {
    pub fn new(address: Address, provider: P, abi_file_path: &str) -> Result<Self, ContractError> {
        let abi = Self::parse_abi(abi_file_path)?;
        let instance = ContractInstance::new(address, provider, Interface::new(abi));
        Ok(Self { instance })
    }

    fn parse_abi(path: &str) -> Result<JsonAbi, ContractError> {
        let artifact = match path {
            "erc20.json" => include_abi!("../../artifacts/abi/erc20.json"),
            _ => return Err(ContractError::UnknownAbi(path.to_string())),
        };

        serde_json::from_slice(artifact).map_err(|source| ContractError::InvalidAbi {
            name: path.to_string(),
            source,
        })
    }

    pub fn instance(&self) -> &ContractInstance<P> {
        &self.instance
    }

    pub fn address(&self) -> &Address {
        self.instance.address()
    }
}
