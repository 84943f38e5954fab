pub mod root;
pub mod upload_url;
pub mod videos;
