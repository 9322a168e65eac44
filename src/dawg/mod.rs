/// Mutable prefix-graph builder used while loading dictionaries.
pub mod builder;
/// Flat breadth-first node encoding and the shared arena.
pub mod compact;
/// Structural deduplication of the shared arena.
pub mod minimize;

pub use compact::{CompactNode, DawgArena, NodeId};
