//! Decision cache infrastructure

mod in_memory;

pub use in_memory::{InMemoryDecisionCache, InMemoryDecisionCacheConfig, DEFAULT_MAX_CAPACITY};
