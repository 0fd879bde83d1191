//! Object-safe views of a container's capabilities. A container registers
//! itself under each of these traits, so services can depend on exactly the
//! capability they need.

use crate::{
    AnyValue, Callable, Definition, Erased, ErasedDefinition, InjectError,
    InjectResult, Invoke, Resolve, Resolvers, Service, ServiceInfo,
    ServiceKey, Svc,
};

/// Looks services up by key.
pub trait Repository: Service {
    fn has(&self, key: &ServiceKey) -> bool;

    /// Resolves `key`, returning the boxed `Svc<T>`.
    fn resolve(
        &self,
        key: &ServiceKey,
        resolvers: &Resolvers,
    ) -> InjectResult<AnyValue>;
}

impl dyn Repository {
    /// Gets the service registered under `T`'s type identifier.
    pub fn get<T: ?Sized + Resolve>(&self) -> InjectResult<Svc<T>> {
        self.get_key(&ServiceKey::of::<T>())
    }

    pub fn get_key<T: ?Sized + Service>(
        &self,
        key: &ServiceKey,
    ) -> InjectResult<Svc<T>> {
        downcast_service(key, self.resolve(key, &Resolvers::new())?)
    }
}

/// Accepts definitions and aliases.
pub trait Registrar: Service {
    fn define_erased(
        &self,
        key: ServiceKey,
        definition: Svc<dyn ErasedDefinition>,
    ) -> InjectResult<()>;

    fn alias(&self, key: &ServiceKey, alias: ServiceKey) -> InjectResult<()>;
}

impl dyn Registrar {
    pub fn define<T: ?Sized + Service>(
        &self,
        key: ServiceKey,
        definition: Definition<T>,
    ) -> InjectResult<()> {
        self.define_erased(key, Svc::new(definition))
    }
}

/// Builds types directly, ignoring any definitions.
pub trait Instantiator: Service {
    /// Builds a new instance of the service identified by `key`, returning
    /// the boxed `Svc<T>`.
    fn instantiate(
        &self,
        key: &ServiceKey,
        resolvers: &Resolvers,
    ) -> InjectResult<AnyValue>;
}

impl dyn Instantiator {
    pub fn make<T: ?Sized + Resolve>(&self) -> InjectResult<Svc<T>> {
        let key = ServiceKey::of::<T>();
        downcast_service(&key, self.instantiate(&key, &Resolvers::new())?)
    }
}

/// Invokes callables with resolved parameters.
pub trait Dispatcher: Service {
    /// Invokes `callable`, returning its boxed output.
    fn dispatch(
        &self,
        callable: &dyn Callable,
        resolvers: &Resolvers,
    ) -> InjectResult<AnyValue>;
}

impl dyn Dispatcher {
    pub fn call<D, F>(&self, callable: F) -> InjectResult<F::Output>
    where
        F: Invoke<D>,
        F::Output: Send,
    {
        self.call_with(callable, &Resolvers::new())
    }

    pub fn call_with<D, F>(
        &self,
        callable: F,
        resolvers: &Resolvers,
    ) -> InjectResult<F::Output>
    where
        F: Invoke<D>,
        F::Output: Send,
    {
        let output = self.dispatch(&Erased::new(callable), resolvers)?;
        output.downcast::<F::Output>().map(|output| *output).map_err(|_| {
            InjectError::InternalError {
                message: format!(
                    "dispatcher returned a value other than {}",
                    std::any::type_name::<F::Output>()
                ),
            }
        })
    }
}

crate::interface!(Repository);
crate::interface!(Registrar);
crate::interface!(Instantiator);
crate::interface!(Dispatcher);

/// Unboxes a resolved `Svc<T>`.
pub(crate) fn downcast_service<T: ?Sized + Service>(
    key: &ServiceKey,
    value: AnyValue,
) -> InjectResult<Svc<T>> {
    let expected = ServiceInfo::of::<T>();
    if key.info() != expected {
        return Err(InjectError::InvalidDefinition {
            key: key.clone(),
            expected,
            actual: key.info(),
        });
    }

    value
        .downcast::<Svc<T>>()
        .map(|service| *service)
        .map_err(|_| InjectError::InvalidDefinition {
            key: key.clone(),
            expected,
            actual: key.info(),
        })
}
