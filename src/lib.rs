pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod users;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::RecordTable;
pub use crate::core::adapter::{synthesize, Adapter, AdapterFactory, AdapterType};
pub use crate::core::port::{Expose, ExposeBuilder, PortBuilder, PortDefinition};
pub use crate::core::wrapper::{wrap, DomainType, DomainWrapper};
pub use domain::model::Record;
pub use domain::ports::{Backend, BackendOperations, DomainEntity, FieldTable};
pub use utils::error::{GatewayError, Result};

#[doc(hidden)]
pub use serde_json as __serde_json;
