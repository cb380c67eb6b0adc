use alloy::primitives::Address;
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;
use thiserror::Error;

lazy_static! {
    static ref WALLET_ADDRESS: Regex =
        Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("wallet address pattern is valid");
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletAddressError {
    #[error("Wallet address is required")]
    Empty,
    #[error("Invalid wallet address format")]
    InvalidFormat,
}

/// Validates user input before any network call is made with it.
pub fn validate_wallet_address(input: &str) -> Result<Address, WalletAddressError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(WalletAddressError::Empty);
    }
    if !WALLET_ADDRESS.is_match(input) {
        return Err(WalletAddressError::InvalidFormat);
    }
    Address::from_str(input).map_err(|_| WalletAddressError::InvalidFormat)
}
