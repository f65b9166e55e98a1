pub mod fuzzy;
pub mod results;
pub mod substring;
