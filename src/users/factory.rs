use crate::adapters::RecordTable;
use crate::core::adapter::AdapterFactory;
use crate::users::gateway::{user_gateway_port, RecordTableUserGateway, UserGateway};
use crate::utils::error::Result;
use std::sync::Arc;

/// Application wiring: decides which backend serves which port.
#[derive(Debug)]
pub struct GatewayFactory {
    adapters: AdapterFactory,
    users: Arc<RecordTable>,
}

impl GatewayFactory {
    pub fn new(users: RecordTable) -> Self {
        Self {
            adapters: AdapterFactory::new(),
            users: Arc::new(users),
        }
    }

    pub fn record_table_user_gateway(&self) -> Result<UserGateway<RecordTableUserGateway>> {
        let port = user_gateway_port()?;
        let adapter_type = self.adapters.synthesize::<RecordTableUserGateway>(&port)?;
        Ok(UserGateway::new(
            adapter_type.instantiate(Arc::clone(&self.users)),
        ))
    }

    pub fn adapters(&self) -> &AdapterFactory {
        &self.adapters
    }

    pub fn users(&self) -> &RecordTable {
        &self.users
    }
}
