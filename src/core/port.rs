use crate::core::wrapper::DomainType;
use crate::domain::ports::DomainEntity;
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::validate_non_empty_string;
use std::collections::HashSet;

/// One operation a port promises to expose.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expose {
    operation_name: String,
    parameter_names: Vec<String>,
    return_type: DomainType,
}

impl Expose {
    pub fn name(&self) -> &str {
        &self.operation_name
    }

    /// Declared parameter names. Informational only, adapters forward whatever they get.
    pub fn parameters(&self) -> &[String] {
        &self.parameter_names
    }

    pub fn return_type(&self) -> DomainType {
        self.return_type
    }
}

/// An immutable, ordered list of exposed operations under a port name.
///
/// ```ignore
/// let port = PortDefinition::builder("UserGateway")
///     .expose("find_by_id").with(["id"]).and_return::<User>()
///     .expose("find_by_email").with(["email"]).and_return::<User>()
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortDefinition {
    name: String,
    exposes: Vec<Expose>,
}

impl PortDefinition {
    pub fn builder(name: &str) -> PortBuilder {
        PortBuilder {
            name: name.to_string(),
            declared: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exposed operations in declaration order.
    pub fn exposed_operations(&self) -> &[Expose] {
        &self.exposes
    }

    pub fn operation(&self, operation_name: &str) -> Option<&Expose> {
        self.exposes.iter().find(|e| e.operation_name == operation_name)
    }

    pub fn len(&self) -> usize {
        self.exposes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exposes.is_empty()
    }
}

#[derive(Debug)]
struct PendingExpose {
    operation_name: String,
    parameter_names: Vec<String>,
    return_type: Option<DomainType>,
}

#[derive(Debug)]
pub struct PortBuilder {
    name: String,
    declared: Vec<PendingExpose>,
}

impl PortBuilder {
    pub fn expose(self, operation_name: &str) -> ExposeBuilder {
        ExposeBuilder {
            port: self,
            current: PendingExpose {
                operation_name: operation_name.to_string(),
                parameter_names: Vec::new(),
                return_type: None,
            },
        }
    }

    /// Validates every declaration and freezes the port.
    pub fn build(self) -> Result<PortDefinition> {
        validate_non_empty_string("port.name", &self.name)?;

        let mut seen = HashSet::new();
        let mut exposes = Vec::with_capacity(self.declared.len());

        for pending in self.declared {
            validate_non_empty_string(
                &format!("{}.expose", self.name),
                &pending.operation_name,
            )?;

            if !seen.insert(pending.operation_name.clone()) {
                return Err(GatewayError::DuplicateOperation {
                    port: self.name,
                    operation: pending.operation_name,
                });
            }

            let Some(return_type) = pending.return_type else {
                return Err(GatewayError::MissingReturnType {
                    port: self.name,
                    operation: pending.operation_name,
                });
            };

            exposes.push(Expose {
                operation_name: pending.operation_name,
                parameter_names: pending.parameter_names,
                return_type,
            });
        }

        tracing::debug!("Port {} declared with {} operations", self.name, exposes.len());

        Ok(PortDefinition {
            name: self.name,
            exposes,
        })
    }
}

/// Builder for the operation most recently passed to `expose`.
#[derive(Debug)]
pub struct ExposeBuilder {
    port: PortBuilder,
    current: PendingExpose,
}

impl ExposeBuilder {
    pub fn with<I, S>(mut self, parameter_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.current.parameter_names = parameter_names.into_iter().map(Into::into).collect();
        self
    }

    pub fn and_return<T: DomainEntity>(mut self) -> Self {
        self.current.return_type = Some(DomainType::of::<T>());
        self
    }

    pub fn expose(self, operation_name: &str) -> ExposeBuilder {
        self.finish().expose(operation_name)
    }

    pub fn build(self) -> Result<PortDefinition> {
        self.finish().build()
    }

    fn finish(mut self) -> PortBuilder {
        self.port.declared.push(self.current);
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Account {
        owner: String,
    }

    crate::domain_entity!(Account { owner });

    #[derive(Debug, Default)]
    struct Balance {
        cents: i64,
    }

    crate::domain_entity!(Balance { cents });

    #[test]
    fn test_exposed_operations_keep_declaration_order() {
        let port = PortDefinition::builder("AccountGateway")
            .expose("find_by_id")
            .with(["id"])
            .and_return::<Account>()
            .expose("balance_for")
            .with(["account_id", "currency"])
            .and_return::<Balance>()
            .expose("find_by_owner")
            .with(["owner"])
            .and_return::<Account>()
            .build()
            .unwrap();

        assert_eq!(port.name(), "AccountGateway");
        assert_eq!(port.len(), 3);

        let ops = port.exposed_operations();
        assert_eq!(ops[0].name(), "find_by_id");
        assert_eq!(ops[0].parameters(), ["id".to_string()]);
        assert!(ops[0].return_type().is::<Account>());

        assert_eq!(ops[1].name(), "balance_for");
        assert_eq!(ops[1].parameters(), ["account_id".to_string(), "currency".to_string()]);
        assert_eq!(ops[1].return_type().name(), "Balance");

        assert_eq!(ops[2].name(), "find_by_owner");
    }

    #[test]
    fn test_with_is_optional() {
        let port = PortDefinition::builder("AccountGateway")
            .expose("first")
            .and_return::<Account>()
            .build()
            .unwrap();

        assert!(port.operation("first").unwrap().parameters().is_empty());
        assert!(port.operation("second").is_none());
    }

    #[test]
    fn test_missing_return_type_is_rejected() {
        let err = PortDefinition::builder("AccountGateway")
            .expose("find_by_id")
            .with(["id"])
            .expose("find_by_owner")
            .and_return::<Account>()
            .build()
            .unwrap_err();

        match err {
            GatewayError::MissingReturnType { port, operation } => {
                assert_eq!(port, "AccountGateway");
                assert_eq!(operation, "find_by_id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_operation_is_rejected() {
        let err = PortDefinition::builder("AccountGateway")
            .expose("find_by_id")
            .and_return::<Account>()
            .expose("find_by_id")
            .and_return::<Balance>()
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            GatewayError::DuplicateOperation { ref operation, .. } if operation == "find_by_id"
        ));
    }

    #[test]
    fn test_blank_names_are_rejected() {
        assert!(PortDefinition::builder(" ").build().is_err());

        let err = PortDefinition::builder("AccountGateway")
            .expose("")
            .and_return::<Account>()
            .build()
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_empty_port_is_allowed() {
        let port = PortDefinition::builder("NothingGateway").build().unwrap();
        assert!(port.is_empty());
    }
}
