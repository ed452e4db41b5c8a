pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod media_upload;
pub mod models;
pub mod storage;

pub use db::create_pool;
