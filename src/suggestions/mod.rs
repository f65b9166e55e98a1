pub mod backend;
pub mod future;
pub mod types;
