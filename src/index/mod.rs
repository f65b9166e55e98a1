pub mod inverted;
pub mod memory_index;
