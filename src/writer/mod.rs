pub mod catalog;
pub mod entry_sink;
pub mod transaction_writer;
