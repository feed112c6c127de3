use crate::adapters::RecordTable;
use crate::core::adapter::Adapter;
use crate::core::port::PortDefinition;
use crate::domain::model::Record;
use crate::domain::ports::{Backend, BackendOperations};
use crate::users::domain::User;
use crate::utils::error::{GatewayError, Result};
use serde_json::{json, Value};
use std::sync::Arc;

pub const USER_GATEWAY: &str = "UserGateway";

/// The user port: what the domain may ask of whatever stores users.
pub fn user_gateway_port() -> Result<PortDefinition> {
    PortDefinition::builder(USER_GATEWAY)
        .expose("find_by_id")
        .with(["id"])
        .and_return::<User>()
        .expose("find_by_email")
        .with(["email"])
        .and_return::<User>()
        .build()
}

/// Typed facade over an adapter synthesized from [`user_gateway_port`].
#[derive(Debug)]
pub struct UserGateway<B: Backend> {
    adapter: Adapter<B>,
}

impl<B: Backend> UserGateway<B> {
    pub fn new(adapter: Adapter<B>) -> Self {
        Self { adapter }
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.adapter.call("find_by_id", &[json!(id)])
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.adapter.call("find_by_email", &[json!(email)])
    }

    pub fn adapter(&self) -> &Adapter<B> {
        &self.adapter
    }
}

/// Backend answering user queries from a [`RecordTable`].
#[derive(Debug, Default)]
pub struct RecordTableUserGateway {
    record_class: Option<Arc<RecordTable>>,
}

impl RecordTableUserGateway {
    pub fn find_by_id(&self, id: &Value) -> Result<Option<Record>> {
        Ok(self.records("find_by_id")?.find_by("id", id))
    }

    pub fn find_by_email(&self, email: &Value) -> Result<Option<Record>> {
        Ok(self.records("find_by_email")?.find_by("email", email))
    }

    fn records(&self, operation: &str) -> Result<&RecordTable> {
        self.record_class
            .as_deref()
            .ok_or_else(|| GatewayError::BackendError {
                backend: Self::backend_name().to_string(),
                operation: operation.to_string(),
                message: "no record source bound".to_string(),
            })
    }
}

fn first_arg(args: &[Value]) -> &Value {
    args.first().unwrap_or(&Value::Null)
}

impl Backend for RecordTableUserGateway {
    type Source = Arc<RecordTable>;

    fn set_record_source(&mut self, source: Self::Source) {
        self.record_class = Some(source);
    }

    fn operations() -> BackendOperations<Self> {
        BackendOperations::new()
            .operation("find_by_id", |gateway: &Self, args| {
                gateway.find_by_id(first_arg(args))
            })
            .operation("find_by_email", |gateway: &Self, args| {
                gateway.find_by_email(first_arg(args))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_declaration() {
        let port = user_gateway_port().unwrap();
        let names: Vec<&str> = port.exposed_operations().iter().map(|e| e.name()).collect();

        assert_eq!(port.name(), USER_GATEWAY);
        assert_eq!(names, vec!["find_by_id", "find_by_email"]);
        assert!(port
            .exposed_operations()
            .iter()
            .all(|e| e.return_type().is::<User>()));
    }

    #[test]
    fn test_unbound_backend_reports_missing_source() {
        let backend = RecordTableUserGateway::default();
        let err = backend.find_by_id(&json!(1)).unwrap_err();

        match err {
            GatewayError::BackendError {
                backend, operation, ..
            } => {
                assert_eq!(backend, "RecordTableUserGateway");
                assert_eq!(operation, "find_by_id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
