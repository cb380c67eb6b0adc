pub mod api;
pub mod lenient;
pub mod mining;
pub mod node;
pub mod task;
pub mod wallet;

pub use node::Node;
pub use node::NodeMetrics;
