pub mod codec;
pub mod memory_store;

pub use memory_store::{CacheStore, MemoryStore};
