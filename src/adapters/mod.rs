// Adapters layer: concrete record sources that backends can be bound to.

pub mod record_table;

pub use record_table::RecordTable;
