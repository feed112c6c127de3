use crate::domain::model::Record;
use crate::domain::ports::{DomainEntity, FieldTable};
use crate::utils::error::{GatewayError, Result};
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Builds domain entities out of raw records by matching field names.
///
/// The field table is taken from the entity once, when the wrapper is created.
/// Every declared field whose column is present on the record is assigned; the
/// rest keep their `Default` value. Record columns nobody declared are ignored.
pub struct DomainWrapper<T> {
    table: FieldTable<T>,
}

impl<T: DomainEntity> DomainWrapper<T> {
    pub fn new() -> Self {
        Self {
            table: T::field_table(),
        }
    }

    pub fn field_table(&self) -> &FieldTable<T> {
        &self.table
    }

    pub fn wrap(&self, record: &Record) -> Result<T> {
        let mut entity = T::default();

        for field in self.table.fields() {
            let Some(value) = record.get(field.column) else {
                tracing::trace!(
                    "{}.{} left unset: record has no `{}`",
                    T::entity_name(),
                    field.name,
                    field.column
                );
                continue;
            };

            (field.assign)(&mut entity, value.clone()).map_err(|source| {
                GatewayError::FieldMappingError {
                    entity: T::entity_name().to_string(),
                    field: field.name.to_string(),
                    source,
                }
            })?;
        }

        Ok(entity)
    }
}

impl<T: DomainEntity> Default for DomainWrapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DomainEntity> fmt::Debug for DomainWrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainWrapper")
            .field("entity", &T::entity_name())
            .field("fields", &self.table)
            .finish()
    }
}

/// One-shot wrap. Prefer keeping a [`DomainWrapper`] around when wrapping many records.
pub fn wrap<T: DomainEntity>(record: &Record) -> Result<T> {
    DomainWrapper::<T>::new().wrap(record)
}

pub(crate) trait ErasedWrapper: Send + Sync {
    fn wrap_any(&self, record: &Record) -> Result<Box<dyn Any + Send>>;
}

impl<T: DomainEntity> ErasedWrapper for DomainWrapper<T> {
    fn wrap_any(&self, record: &Record) -> Result<Box<dyn Any + Send>> {
        Ok(Box::new(self.wrap(record)?))
    }
}

fn erased_wrapper<T: DomainEntity>() -> Arc<dyn ErasedWrapper> {
    Arc::new(DomainWrapper::<T>::new())
}

/// Runtime handle to a domain entity type, as stored in a port declaration.
#[derive(Clone, Copy)]
pub struct DomainType {
    name: &'static str,
    type_id: TypeId,
    wrapper: fn() -> Arc<dyn ErasedWrapper>,
}

impl DomainType {
    pub fn of<T: DomainEntity>() -> Self {
        Self {
            name: T::entity_name(),
            type_id: TypeId::of::<T>(),
            wrapper: erased_wrapper::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub(crate) fn wrapper(&self) -> Arc<dyn ErasedWrapper> {
        (self.wrapper)()
    }
}

impl PartialEq for DomainType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for DomainType {}

impl Hash for DomainType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
