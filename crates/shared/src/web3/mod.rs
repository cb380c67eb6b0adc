pub mod balance;
pub mod contract;
pub mod token;

pub use balance::{BalanceLookup, MockBalanceLookup, RpcBalanceLookup, TokenBalance};
pub use token::Erc20Token;
