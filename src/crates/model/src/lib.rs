pub mod album;
pub mod image;
