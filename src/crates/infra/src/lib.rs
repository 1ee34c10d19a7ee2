pub mod id_generator;
pub use id_generator::UuidIdGenerator;

pub mod storage;

pub mod config;
pub use config::{ServerConfig, StorageConfig};
