pub mod cache;

pub use cache::{CachedNodes, NodeCache};
