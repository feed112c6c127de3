pub mod adapter;
pub mod port;
pub mod wrapper;

pub use crate::domain::model::Record;
pub use crate::domain::ports::{Backend, BackendOperations, DomainEntity, FieldTable};
pub use crate::utils::error::Result;
