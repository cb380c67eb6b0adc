pub mod checker;
pub mod cooldown;

pub use checker::{MiningLookup, MiningStatusChecker};
pub use cooldown::{Cooldown, MINING_STATUS_COOLDOWN};
