//! HTTP handlers

pub mod cache;
pub mod db;
pub mod health;
pub mod root;

pub use health::health;
pub use root::root;
