pub mod factory;
pub mod local;
pub mod memory;

pub use factory::ImageStoreFactoryImpl;
pub use local::LocalImageStore;
pub use memory::InMemoryImageStore;
