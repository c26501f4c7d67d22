mod factory;
mod store;

pub use factory::TomlStoreFactory;
pub use store::TomlFileStore;
