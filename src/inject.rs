use crate::{AnyValue, Container, Resolve, ServiceKey, Svc};

/// Implemented by types that can be passed as parameters to callables
/// dispatched by a container.
///
/// A parameter either asks for a service, in which case
/// [`service`](Inject::service) names it, or is a plain value that only the
/// resolver chain can supply.
pub trait Inject: Sized + Send + 'static {
    /// The service this parameter asks for.
    fn service() -> Option<ServiceKey> {
        None
    }

    /// The value used when no resolver supplies one. Parameters without a
    /// fallback fail to resolve instead.
    fn fallback() -> Option<Self> {
        None
    }

    /// Converts a value supplied by a resolver into the parameter. The value
    /// is handed back if it has the wrong type.
    fn from_value(value: AnyValue) -> Result<Self, AnyValue> {
        value.downcast::<Self>().map(|value| *value)
    }
}

/// Requests a service by its type identifier.
impl<T: ?Sized + Resolve> Inject for Svc<T> {
    fn service() -> Option<ServiceKey> {
        Some(ServiceKey::of::<T>())
    }
}

/// Makes a parameter optional. It falls back to `None` when nothing resolves
/// it.
impl<T: Inject> Inject for Option<T> {
    fn service() -> Option<ServiceKey> {
        T::service()
    }

    fn fallback() -> Option<Self> {
        Some(None)
    }

    fn from_value(value: AnyValue) -> Result<Self, AnyValue> {
        match value.downcast::<Option<T>>() {
            Ok(value) => Ok(*value),
            Err(value) => T::from_value(value).map(Some),
        }
    }
}

/// Requests a handle to the container itself.
impl Inject for Container {
    fn service() -> Option<ServiceKey> {
        Some(ServiceKey::of::<Container>())
    }

    fn from_value(value: AnyValue) -> Result<Self, AnyValue> {
        match value.downcast::<Container>() {
            Ok(container) => Ok(*container),
            Err(value) => value
                .downcast::<Svc<Container>>()
                .map(|container| Container::clone(&container)),
        }
    }
}

macro_rules! impl_inject_value {
    ($($type:ty),* $(,)?) => {
        $(impl Inject for $type {})*
    };
}

impl_inject_value!(
    String,
    &'static str,
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_parameters_accept_both_shapes() {
        let wrapped: AnyValue = Box::new(Some(3u8));
        let bare: AnyValue = Box::new(4u8);
        assert_eq!(Some(3), Option::<u8>::from_value(wrapped).unwrap());
        assert_eq!(Some(4), Option::<u8>::from_value(bare).unwrap());
        assert!(Option::<u8>::from_value(Box::new("no")).is_err());
        assert_eq!(Some(None), Option::<u8>::fallback());
    }

    #[test]
    fn services_request_their_type_identifier() {
        assert_eq!(Some(ServiceKey::of::<String>()), Svc::<String>::service());
        assert_eq!(None, String::service());
        assert_eq!(
            Some(ServiceKey::of::<String>()),
            Option::<Svc<String>>::service()
        );
    }
}
