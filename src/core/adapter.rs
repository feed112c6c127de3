use crate::core::port::{Expose, PortDefinition};
use crate::core::wrapper::ErasedWrapper;
use crate::domain::ports::{Backend, BackendOperation, DomainEntity};
use crate::utils::error::{GatewayError, Result};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

struct OperationEntry<B> {
    expose: Expose,
    backend: BackendOperation<B>,
    wrapper: Arc<dyn ErasedWrapper>,
}

struct AdapterTypeInner<B> {
    port: PortDefinition,
    backend_name: &'static str,
    operations: HashMap<String, OperationEntry<B>>,
}

/// A port bound to one backend type. Create adapters from it with [`AdapterType::instantiate`].
pub struct AdapterType<B: Backend> {
    inner: Arc<AdapterTypeInner<B>>,
}

/// Synthesizes an adapter type without going through a memoizing [`AdapterFactory`].
pub fn synthesize<B: Backend>(port: &PortDefinition) -> Result<AdapterType<B>> {
    AdapterType::synthesize(port)
}

impl<B: Backend> AdapterType<B> {
    /// Pairs each exposed operation with the backend's callable and the wrapper
    /// of its return type. Fails if the backend lacks any exposed operation.
    pub fn synthesize(port: &PortDefinition) -> Result<Self> {
        let table = B::operations();
        let mut operations = HashMap::with_capacity(port.len());

        for expose in port.exposed_operations() {
            let backend = table.get(expose.name()).cloned().ok_or_else(|| {
                GatewayError::MissingBackendOperation {
                    port: port.name().to_string(),
                    backend: B::backend_name().to_string(),
                    operation: expose.name().to_string(),
                }
            })?;

            operations.insert(
                expose.name().to_string(),
                OperationEntry {
                    expose: expose.clone(),
                    backend,
                    wrapper: expose.return_type().wrapper(),
                },
            );
        }

        if table.len() > operations.len() {
            tracing::debug!(
                "{} implements {} operations not exposed by {}",
                B::backend_name(),
                table.len() - operations.len(),
                port.name()
            );
        }

        tracing::info!(
            "Synthesized {} adapter over {} ({} operations)",
            port.name(),
            B::backend_name(),
            operations.len()
        );

        Ok(Self {
            inner: Arc::new(AdapterTypeInner {
                port: port.clone(),
                backend_name: B::backend_name(),
                operations,
            }),
        })
    }

    /// Creates an adapter holding `record_source`. Every call binds it onto a fresh backend.
    pub fn instantiate(&self, record_source: B::Source) -> Adapter<B> {
        Adapter {
            adapter_type: self.clone(),
            record_source,
        }
    }

    pub fn port(&self) -> &PortDefinition {
        &self.inner.port
    }

    pub fn backend_name(&self) -> &'static str {
        self.inner.backend_name
    }

    /// True when both handles come from the same synthesis.
    pub fn same_type(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn entry(&self, operation: &str) -> Result<&OperationEntry<B>> {
        self.inner
            .operations
            .get(operation)
            .ok_or_else(|| GatewayError::UnknownOperation {
                port: self.inner.port.name().to_string(),
                operation: operation.to_string(),
            })
    }
}

impl<B: Backend> Clone for AdapterType<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: Backend> fmt::Debug for AdapterType<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterType")
            .field("port", &self.inner.port.name())
            .field("backend", &self.inner.backend_name)
            .finish()
    }
}

/// A callable adapter: an adapter type plus the record source captured at construction.
pub struct Adapter<B: Backend> {
    adapter_type: AdapterType<B>,
    record_source: B::Source,
}

impl<B: Backend> Adapter<B> {
    pub fn adapter_type(&self) -> &AdapterType<B> {
        &self.adapter_type
    }

    pub fn port(&self) -> &PortDefinition {
        self.adapter_type.port()
    }

    pub fn record_source(&self) -> &B::Source {
        &self.record_source
    }

    /// Runs `operation` and returns the wrapped entity type-erased, `None` when
    /// the backend found nothing.
    pub fn invoke(&self, operation: &str, args: &[Value]) -> Result<Option<Box<dyn Any + Send>>> {
        let entry = self.adapter_type.entry(operation)?;
        self.invoke_entry(entry, args)
    }

    /// Runs `operation` and returns the wrapped entity as `T`.
    ///
    /// `T` must be the return type the port declared for `operation`.
    pub fn call<T: DomainEntity>(&self, operation: &str, args: &[Value]) -> Result<Option<T>> {
        let entry = self.adapter_type.entry(operation)?;
        let declared = entry.expose.return_type();
        let mismatch = || GatewayError::ReturnTypeMismatch {
            operation: operation.to_string(),
            declared: declared.name().to_string(),
            requested: T::entity_name().to_string(),
        };

        if !declared.is::<T>() {
            return Err(mismatch());
        }

        match self.invoke_entry(entry, args)? {
            Some(entity) => entity.downcast::<T>().map(|e| Some(*e)).map_err(|_| mismatch()),
            None => Ok(None),
        }
    }

    fn invoke_entry(
        &self,
        entry: &OperationEntry<B>,
        args: &[Value],
    ) -> Result<Option<Box<dyn Any + Send>>> {
        let expose = &entry.expose;
        if args.len() != expose.parameters().len() {
            tracing::debug!(
                "{}.{} declares {} parameters, forwarding {}",
                self.port().name(),
                expose.name(),
                expose.parameters().len(),
                args.len()
            );
        }

        let mut backend = B::default();
        backend.set_record_source(self.record_source.clone());

        let Some(record) = (entry.backend)(&backend, args)? else {
            tracing::debug!("{}.{} found nothing", self.port().name(), expose.name());
            return Ok(None);
        };

        tracing::debug!(
            "{}.{} wrapping record into {}",
            self.port().name(),
            expose.name(),
            expose.return_type().name()
        );
        entry.wrapper.wrap_any(&record).map(Some)
    }
}

impl<B: Backend> Clone for Adapter<B> {
    fn clone(&self) -> Self {
        Self {
            adapter_type: self.adapter_type.clone(),
            record_source: self.record_source.clone(),
        }
    }
}

impl<B: Backend> fmt::Debug for Adapter<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("port", &self.port().name())
            .field("backend", &self.adapter_type.backend_name())
            .finish()
    }
}

type SynthesisKey = (PortDefinition, TypeId);

/// Memoizes adapter types per `(port definition, backend type)`. Two ports that
/// share a name but declare different operations are cached separately.
#[derive(Default)]
pub struct AdapterFactory {
    synthesized: Mutex<HashMap<SynthesisKey, Arc<dyn Any + Send + Sync>>>,
}

impl AdapterFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn synthesize<B: Backend>(&self, port: &PortDefinition) -> Result<AdapterType<B>> {
        let key = (port.clone(), TypeId::of::<B>());
        // 快取只會整筆插入，中毒後內容仍然一致
        let mut synthesized = self
            .synthesized
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(cached) = synthesized
            .get(&key)
            .and_then(|c| c.downcast_ref::<AdapterType<B>>())
        {
            tracing::debug!("Reusing {} adapter over {}", port.name(), B::backend_name());
            return Ok(cached.clone());
        }

        let adapter_type = AdapterType::<B>::synthesize(port)?;
        synthesized.insert(key, Arc::new(adapter_type.clone()));
        Ok(adapter_type)
    }

    pub fn len(&self) -> usize {
        self.synthesized
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for AdapterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterFactory")
            .field("synthesized", &self.len())
            .finish()
    }
}
