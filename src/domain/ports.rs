use crate::domain::model::Record;
use crate::utils::error::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A backend callable: receives the bound backend and the forwarded arguments.
pub type BackendOperation<B> = Arc<dyn Fn(&B, &[Value]) -> Result<Option<Record>> + Send + Sync>;

/// Field setter used by the domain wrapper. Deserializes one record value into one field.
pub type FieldSetter<T> = fn(&mut T, Value) -> serde_json::Result<()>;

/// The persistence side of a port.
///
/// A fresh backend is default-constructed for every adapter call, bound to the
/// adapter's record source, then asked to run one entry of its operation table.
pub trait Backend: Default + 'static {
    type Source: Clone;

    fn set_record_source(&mut self, source: Self::Source);

    fn operations() -> BackendOperations<Self>;

    fn backend_name() -> &'static str {
        short_type_name::<Self>()
    }
}

/// The domain side of a port: a plain data holder with a declared field table.
pub trait DomainEntity: Default + Send + 'static {
    fn entity_name() -> &'static str;

    fn field_table() -> FieldTable<Self>;
}

pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    // 泛型參數內也有 `::`，只截取外層路徑
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

pub struct BackendOperations<B> {
    operations: HashMap<String, BackendOperation<B>>,
}

impl<B> BackendOperations<B> {
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    pub fn operation<F>(mut self, name: &str, operation: F) -> Self
    where
        F: Fn(&B, &[Value]) -> Result<Option<Record>> + Send + Sync + 'static,
    {
        self.operations.insert(name.to_string(), Arc::new(operation));
        self
    }

    pub fn get(&self, name: &str) -> Option<&BackendOperation<B>> {
        self.operations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<B> Default for BackendOperations<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> fmt::Debug for BackendOperations<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("BackendOperations")
            .field("operations", &names)
            .finish()
    }
}

pub struct FieldDescriptor<T> {
    pub name: &'static str,
    pub column: &'static str,
    pub assign: FieldSetter<T>,
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            column: self.column,
            assign: self.assign,
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("column", &self.column)
            .finish()
    }
}

/// Ordered writable fields of a domain entity, each paired with the record column it reads.
pub struct FieldTable<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> FieldTable<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declares a field read from the record column of the same name.
    pub fn field(self, name: &'static str, assign: FieldSetter<T>) -> Self {
        self.field_from(name, name, assign)
    }

    /// Declares a field read from a differently named record column.
    /// Redeclaring a field replaces the earlier declaration in place.
    pub fn field_from(
        mut self,
        name: &'static str,
        column: &'static str,
        assign: FieldSetter<T>,
    ) -> Self {
        let descriptor = FieldDescriptor {
            name,
            column,
            assign,
        };
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => *existing = descriptor,
            None => self.fields.push(descriptor),
        }
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> Default for FieldTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

/// Implements [`DomainEntity`] for a struct from its list of writable fields.
///
/// ```ignore
/// domain_entity!(User { id, full_name, biography });
/// domain_entity!(Author { display_name = "full_name" });
/// ```
#[macro_export]
macro_rules! domain_entity {
    (@column $field:ident) => {
        stringify!($field)
    };
    (@column $field:ident = $column:literal) => {
        $column
    };
    ($entity:ident { $($field:ident $(= $column:literal)?),* $(,)? }) => {
        impl $crate::domain::ports::DomainEntity for $entity {
            fn entity_name() -> &'static str {
                stringify!($entity)
            }

            fn field_table() -> $crate::domain::ports::FieldTable<Self> {
                $crate::domain::ports::FieldTable::new()
                    $(.field_from(
                        stringify!($field),
                        $crate::domain_entity!(@column $field $(= $column)?),
                        |entity: &mut Self, value: $crate::__serde_json::Value| {
                            entity.$field = $crate::__serde_json::from_value(value)?;
                            Ok(())
                        },
                    ))*
            }
        }
    };
}
