#![allow(clippy::used_underscore_binding)]

use crate::{Parameter, ServiceInfo, ServiceKey};
use derive_more::Display;
use std::error::Error;

/// A result from attempting to resolve, construct or register a service.
pub type InjectResult<T> = Result<T, InjectError>;

/// An error that has occurred while working with a container.
#[derive(Debug, Display)]
#[display(fmt = "an error occurred during injection: {}")]
#[non_exhaustive]
pub enum InjectError {
    /// Nothing is defined for the requested key and it cannot be built.
    #[display(fmt = "{} has no definition", key)]
    ServiceNotFound { key: ServiceKey },

    /// The requested type has no constructor the container can call.
    #[display(fmt = "{} cannot be instantiated", key)]
    NotInstantiable { key: ServiceKey },

    /// No resolver could supply a value for a parameter.
    #[display(
        fmt = "{} could not be resolved [{}]",
        parameter,
        "fmt_path(path)"
    )]
    UnresolvableParameter {
        parameter: Parameter,

        /// The services being resolved when the parameter was requested.
        path: Vec<ServiceKey>,
    },

    /// A resolver supplied a value of the wrong type for a parameter.
    #[display(fmt = "a resolver supplied a value of the wrong type for {}", parameter)]
    InvalidValue { parameter: Parameter },

    /// The requested alias is already defined as a service.
    #[display(
        fmt = "{} is already defined and cannot become an alias of {}",
        alias,
        key
    )]
    AliasConflict { key: ServiceKey, alias: ServiceKey },

    /// A cycle was detected during resolution of a service.
    #[display(
        fmt = "a cycle was detected while resolving {} [{}]",
        key,
        "fmt_path(cycle)"
    )]
    CircularDependency {
        key: ServiceKey,

        /// The chain of keys that led back to `key`, ending with `key`.
        cycle: Vec<ServiceKey>,
    },

    /// The container refused a registration.
    #[display(fmt = "{} cannot be registered: {}", key, reason)]
    RegistrationError { key: ServiceKey, reason: String },

    /// A definition was used as a different service type than it provides.
    #[display(
        fmt = "the definition for {} provides {} but {} was expected",
        key,
        "actual.name()",
        "expected.name()"
    )]
    InvalidDefinition {
        key: ServiceKey,
        expected: ServiceInfo,
        actual: ServiceInfo,
    },

    /// An error occurred during activation of a service.
    #[display(fmt = "an error occurred during activation of {}", key)]
    ActivationFailed {
        key: ServiceKey,
        inner: Box<dyn Error + Send + Sync + 'static>,
    },

    /// An unexpected error has occurred. This is usually caused by a bug in
    /// the library itself.
    #[display(fmt = "an unexpected error occurred (please report this): {}", message)]
    InternalError { message: String },
}

impl InjectError {
    /// Whether this error only says that `key` itself is unavailable, as
    /// opposed to something going wrong while building it.
    #[must_use]
    pub fn is_missing(&self, key: &ServiceKey) -> bool {
        match self {
            InjectError::ServiceNotFound { key: missing }
            | InjectError::NotInstantiable { key: missing } => missing == key,
            _ => false,
        }
    }

    /// Wraps a constructor's error for the service identified by `key`.
    pub fn activation<E>(key: ServiceKey, error: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        InjectError::ActivationFailed {
            key,
            inner: error.into(),
        }
    }
}

impl Error for InjectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InjectError::ActivationFailed { inner, .. } => Some(inner.as_ref()),
            _ => None,
        }
    }
}

fn fmt_path(path: &[ServiceKey]) -> String {
    let mut joined = String::new();
    for item in path {
        if !joined.is_empty() {
            joined.push_str(" -> ");
        }
        joined.push_str(&item.to_string());
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Display)]
    #[display(fmt = "disk on fire")]
    struct DiskError;
    impl Error for DiskError {}

    #[test]
    fn activation_failure_exposes_source() {
        let error =
            InjectError::activation(ServiceKey::of::<String>(), DiskError);
        let source = error.source().map(ToString::to_string);
        assert_eq!(Some("disk on fire".to_owned()), source);
    }

    #[test]
    fn cycle_is_rendered_in_order() {
        let error = InjectError::CircularDependency {
            key: ServiceKey::of::<u8>(),
            cycle: vec![
                ServiceKey::of::<u8>(),
                ServiceKey::of::<u16>(),
                ServiceKey::of::<u8>(),
            ],
        };
        assert!(error.to_string().contains("[u8 -> u16 -> u8]"));
    }

    #[test]
    fn missing_only_matches_same_key() {
        let key = ServiceKey::of::<u8>();
        let error = InjectError::NotInstantiable { key: key.clone() };
        assert!(error.is_missing(&key));
        assert!(!error.is_missing(&ServiceKey::of::<u16>()));
    }
}
