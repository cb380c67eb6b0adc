pub mod machine;
pub mod scheduler;

pub use machine::{FetchKind, RefreshMachine, RefreshState, RefreshStatus, REFRESH_INTERVAL};
pub use scheduler::{RefreshCommand, RefreshHandle, RefreshScheduler};
