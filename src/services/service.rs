use std::any::{Any, TypeId};

/// A reference-counted pointer holding a service.
pub type Svc<T> = std::sync::Arc<T>;

/// A non-owning handle to a service, used by weak singletons.
pub type WeakSvc<T> = std::sync::Weak<T>;

/// A type-erased value moving between resolvers, definitions and callers.
/// Services travel through it as a boxed `Svc<T>`, plain parameter values as
/// a boxed `T`.
pub type AnyValue = Box<dyn Any + Send>;

/// Implemented automatically on types that are capable of being a service.
pub trait Service: Any + Send + Sync {}
impl<T: ?Sized + Any + Send + Sync> Service for T {}

/// Type information about a service.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ServiceInfo {
    id: TypeId,
    name: &'static str,
}

impl ServiceInfo {
    /// Creates a [`ServiceInfo`] for the given type.
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + Any>() -> Self {
        ServiceInfo {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Gets the [`TypeId`] for this service.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Gets the type name of this service.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Display for ServiceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}
