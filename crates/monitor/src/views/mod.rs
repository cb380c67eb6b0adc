pub mod console;
pub mod detail;
pub mod format;
pub mod list;
pub mod mining;
pub mod rewards;

pub use console::Console;
pub use detail::{load_detail, NodeDetail};
pub use list::ListView;
pub use mining::MiningView;
pub use rewards::RewardsView;
