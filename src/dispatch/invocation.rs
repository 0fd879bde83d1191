use crate::{
    guard, Container, Inject, InjectError, InjectResult, Invoke, Parameter,
    Resolve, Resolvers, Service, ServiceKey, Svc,
};
use std::error::Error;
use tracing::trace;

/// The context a callable is invoked in: the container supplying services
/// and the per-call resolvers consulted before the container's own chain.
#[derive(Clone, Copy, Debug)]
pub struct Invocation<'a> {
    container: &'a Container,
    resolvers: &'a Resolvers,
}

impl<'a> Invocation<'a> {
    #[must_use]
    pub fn new(container: &'a Container, resolvers: &'a Resolvers) -> Self {
        Invocation {
            container,
            resolvers,
        }
    }

    #[must_use]
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// The resolvers supplied for this call only.
    #[must_use]
    pub fn resolvers(&self) -> &'a Resolvers {
        self.resolvers
    }

    /// Resolves a single parameter.
    ///
    /// The per-call resolvers are asked first, then the container's chain.
    /// The first value supplied is used. If nothing supplies a value, the
    /// parameter's fallback is used if it has one.
    pub fn resolve<T: Inject>(&self, parameter: &Parameter) -> InjectResult<T> {
        let supplied = match self.resolvers.resolve(parameter, self.container)? {
            Some(value) => Some(value),
            None => self
                .container
                .default_resolvers()
                .resolve(parameter, self.container)?,
        };

        match supplied {
            Some(value) => T::from_value(value).map_err(|_| {
                InjectError::InvalidValue {
                    parameter: parameter.clone(),
                }
            }),
            None => {
                trace!(%parameter, "no resolver supplied a value");
                T::fallback().ok_or_else(|| InjectError::UnresolvableParameter {
                    parameter: parameter.clone(),
                    path: guard::current_path(),
                })
            }
        }
    }

    /// Invokes `callable` in this context.
    pub fn invoke<D, F: Invoke<D>>(&self, callable: &F) -> InjectResult<F::Output> {
        callable.invoke(self)
    }

    /// Invokes a constructor and wraps the result in a service pointer.
    pub fn construct<T, D, F>(&self, constructor: F) -> InjectResult<Svc<T>>
    where
        T: Service,
        F: Invoke<D, Output = T>,
    {
        constructor.invoke(self).map(Svc::new)
    }

    /// Invokes a fallible constructor. A returned error is reported as
    /// [`InjectError::ActivationFailed`] for `T`.
    pub fn try_construct<T, E, D, F>(&self, constructor: F) -> InjectResult<Svc<T>>
    where
        T: Resolve,
        E: Error + Send + Sync + 'static,
        F: Invoke<D, Output = Result<T, E>>,
    {
        match constructor.invoke(self)? {
            Ok(service) => Ok(Svc::new(service)),
            Err(error) => Err(InjectError::activation(ServiceKey::of::<T>(), error)),
        }
    }
}
