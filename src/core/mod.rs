pub mod types;
pub mod config;
pub mod error;
pub mod stats;
pub mod transaction;
pub mod store;
pub mod memory;
pub mod lifecycle;
