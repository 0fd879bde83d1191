use crate::{
    guard::{Phase, ResolutionGuard},
    AnyValue, Container, InjectResult, Service, ServiceInfo, ServiceKey, Svc,
    WeakSvc,
};
use derive_more::Display;
use downcast_rs::{impl_downcast, DowncastSync};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fmt::{Debug, Formatter};

/// A function which builds a service. The container requesting the service is
/// passed in rather than captured so that definitions never keep their own
/// container alive.
pub type Builder<T> =
    Box<dyn Fn(&Container) -> InjectResult<Svc<T>> + Send + Sync>;

/// How long a service produced by a definition lives.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Lifecycle {
    /// A pre-built value, returned as-is.
    #[display(fmt = "instance")]
    Instance,

    /// Built once, then shared for as long as the definition exists.
    #[display(fmt = "singleton")]
    Singleton,

    /// Built on demand and shared while anyone else still holds it.
    #[display(fmt = "weak singleton")]
    WeakSingleton,

    /// Built fresh on every request.
    #[display(fmt = "factory")]
    Factory,
}

enum Policy<T: ?Sized + Service> {
    Instance(Svc<T>),
    Singleton {
        builder: Builder<T>,
        cell: OnceCell<Svc<T>>,
    },
    WeakSingleton {
        builder: Builder<T>,
        // Held while the builder runs. `cached` is only ever locked briefly.
        building: Mutex<()>,
        cached: Mutex<Option<WeakSvc<T>>>,
    },
    Factory {
        builder: Builder<T>,
    },
}

/// A recipe for producing a service, combined with the state its lifecycle
/// needs.
///
/// # Example
///
/// ```
/// use runtime_container::{Container, Definition, Lifecycle, ServiceKey, Svc};
///
/// let container = Container::new();
/// let definition: Definition<String> =
///     Definition::singleton(|_| Ok(Svc::new("hello".to_owned())));
/// assert_eq!(Lifecycle::Singleton, definition.lifecycle());
/// assert!(!definition.is_resolved());
///
/// let first = definition.resolve(&container).unwrap();
/// let second = definition.resolve(&container).unwrap();
/// assert!(Svc::ptr_eq(&first, &second));
/// assert!(definition.is_resolved());
/// ```
pub struct Definition<T: ?Sized + Service> {
    policy: Policy<T>,
}

impl<T: ?Sized + Service> Definition<T> {
    /// Wraps an already built service.
    #[must_use]
    pub fn instance(service: Svc<T>) -> Self {
        Definition {
            policy: Policy::Instance(service),
        }
    }

    /// Builds the service the first time it is resolved and caches it.
    ///
    /// Concurrent first resolutions run the builder once. If the builder
    /// fails, nothing is cached and the next resolution tries again.
    #[must_use]
    pub fn singleton<F>(builder: F) -> Self
    where
        F: Fn(&Container) -> InjectResult<Svc<T>> + Send + Sync + 'static,
    {
        Definition {
            policy: Policy::Singleton {
                builder: Box::new(builder),
                cell: OnceCell::new(),
            },
        }
    }

    /// Builds the service on demand but only keeps a weak reference to it.
    /// Once every strong reference is gone, the next resolution builds a new
    /// one.
    #[must_use]
    pub fn weak<F>(builder: F) -> Self
    where
        F: Fn(&Container) -> InjectResult<Svc<T>> + Send + Sync + 'static,
    {
        Definition {
            policy: Policy::WeakSingleton {
                builder: Box::new(builder),
                building: Mutex::new(()),
                cached: Mutex::new(None),
            },
        }
    }

    /// Builds a new service each time it is resolved.
    #[must_use]
    pub fn factory<F>(builder: F) -> Self
    where
        F: Fn(&Container) -> InjectResult<Svc<T>> + Send + Sync + 'static,
    {
        Definition {
            policy: Policy::Factory {
                builder: Box::new(builder),
            },
        }
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        match &self.policy {
            Policy::Instance(_) => Lifecycle::Instance,
            Policy::Singleton { .. } => Lifecycle::Singleton,
            Policy::WeakSingleton { .. } => Lifecycle::WeakSingleton,
            Policy::Factory { .. } => Lifecycle::Factory,
        }
    }

    /// Whether a singleton or weak singleton currently holds a live service
    /// produced by its builder. Instances and factories have no resolution
    /// state and always report `false`.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match &self.policy {
            Policy::Instance(_) | Policy::Factory { .. } => false,
            Policy::Singleton { cell, .. } => cell.get().is_some(),
            Policy::WeakSingleton { cached, .. } => cached
                .lock()
                .as_ref()
                .map_or(false, |weak| weak.strong_count() > 0),
        }
    }

    /// Produces the service according to this definition's lifecycle.
    ///
    /// A builder that ends up resolving the same definition again on this
    /// thread fails with [`InjectError::CircularDependency`].
    ///
    /// [`InjectError::CircularDependency`]: crate::InjectError::CircularDependency
    pub fn resolve(&self, container: &Container) -> InjectResult<Svc<T>> {
        if let Policy::Instance(service) = &self.policy {
            return Ok(service.clone());
        }

        // Entered before any cell or lock so re-entry never blocks on them.
        let _guard = ResolutionGuard::enter(
            self.id(),
            Phase::Build,
            &ServiceKey::exact::<T>(),
        )?;
        match &self.policy {
            Policy::Instance(service) => Ok(service.clone()),
            Policy::Singleton { builder, cell } => {
                cell.get_or_try_init(|| builder(container)).map(Svc::clone)
            }
            Policy::WeakSingleton {
                builder,
                building,
                cached,
            } => {
                if let Some(service) = Self::upgrade(cached) {
                    return Ok(service);
                }

                // Concurrent callers wait here and then share one instance.
                let _building = building.lock();
                if let Some(service) = Self::upgrade(cached) {
                    return Ok(service);
                }

                let service = builder(container)?;
                *cached.lock() = Some(Svc::downgrade(&service));
                Ok(service)
            }
            Policy::Factory { builder } => builder(container),
        }
    }

    fn upgrade(cached: &Mutex<Option<WeakSvc<T>>>) -> Option<Svc<T>> {
        cached.lock().as_ref().and_then(WeakSvc::upgrade)
    }

    fn id(&self) -> usize {
        self as *const Self as usize
    }
}

impl<T: ?Sized + Service> Debug for Definition<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("service", &std::any::type_name::<T>())
            .field("lifecycle", &self.lifecycle())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// A [`Definition`] with its service type erased, as stored by containers.
/// Use [`downcast_arc`](trait.ErasedDefinition.html#method.downcast_arc) to
/// recover the typed definition.
pub trait ErasedDefinition: DowncastSync {
    /// The type of service this definition produces.
    fn service_info(&self) -> ServiceInfo;

    fn lifecycle(&self) -> Lifecycle;

    fn is_resolved(&self) -> bool;

    /// Resolves the definition, returning the boxed `Svc<T>`.
    fn resolve_erased(&self, container: &Container) -> InjectResult<AnyValue>;
}

impl_downcast!(sync ErasedDefinition);

impl<T: ?Sized + Service> ErasedDefinition for Definition<T> {
    fn service_info(&self) -> ServiceInfo {
        ServiceInfo::of::<T>()
    }

    fn lifecycle(&self) -> Lifecycle {
        Definition::lifecycle(self)
    }

    fn is_resolved(&self) -> bool {
        Definition::is_resolved(self)
    }

    fn resolve_erased(&self, container: &Container) -> InjectResult<AnyValue> {
        self.resolve(container)
            .map(|service| Box::new(service) as AnyValue)
    }
}

impl Debug for dyn ErasedDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedDefinition")
            .field("service", &self.service_info().name())
            .field("lifecycle", &self.lifecycle())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
