pub mod album;
pub mod image;
pub mod store;
pub mod value;
