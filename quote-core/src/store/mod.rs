pub mod factory;
pub mod key_value;
pub mod memory;

pub use factory::{MemoryStoreFactory, StoreConfig, StoreFactory, StoreRegistry};
pub use key_value::{KeyValueStore, StoreError};
pub use memory::MemoryStore;
