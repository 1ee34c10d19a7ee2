pub mod delete_image;
pub mod shared;
pub mod upload_image;
