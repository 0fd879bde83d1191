use crate::{
    instantiate_erased, AnyValue, InjectResult, Invocation, Resolve, Service,
    ServiceInfo,
};
use std::{
    borrow::Cow,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
};

pub(crate) type InstantiateFn =
    fn(&Invocation<'_>) -> InjectResult<AnyValue>;

/// Identifies a definition inside a container.
///
/// Every key carries the type of service it resolves to. Keys created with
/// [`ServiceKey::of`] are the "type identifiers" of their service and know how
/// to build it when nothing is defined for them. Keys created with
/// [`ServiceKey::named`] additionally carry a name, letting several
/// definitions of the same type live side by side. Named keys are never
/// auto-wired.
///
/// Two keys are equal when they share both the service type and the name.
#[derive(Clone)]
pub struct ServiceKey {
    info: ServiceInfo,
    name: Option<Cow<'static, str>>,
    instantiate: Option<InstantiateFn>,
}

impl ServiceKey {
    /// The type identifier of `T`.
    #[must_use]
    pub fn of<T: ?Sized + Resolve>() -> Self {
        ServiceKey {
            info: ServiceInfo::of::<T>(),
            name: None,
            instantiate: Some(instantiate_erased::<T>),
        }
    }

    /// The type identifier of `T`, for types the container should never
    /// construct on its own. Equal to [`ServiceKey::of`] for the same type.
    #[must_use]
    pub fn exact<T: ?Sized + Service>() -> Self {
        ServiceKey {
            info: ServiceInfo::of::<T>(),
            name: None,
            instantiate: None,
        }
    }

    /// A named identifier for a service of type `T`.
    #[must_use]
    pub fn named<T: ?Sized + Service>(
        name: impl Into<Cow<'static, str>>,
    ) -> Self {
        ServiceKey {
            info: ServiceInfo::of::<T>(),
            name: Some(name.into()),
            instantiate: None,
        }
    }

    /// The type of service this key resolves to.
    #[inline]
    #[must_use]
    pub fn info(&self) -> ServiceInfo {
        self.info
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    pub(crate) fn instantiator(&self) -> Option<InstantiateFn> {
        self.instantiate
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info && self.name == other.name
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.info.hash(state);
        self.name.hash(state);
    }
}

impl Display for ServiceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "\"{}\" ({})", name, self.info.name()),
            None => f.write_str(self.info.name()),
        }
    }
}

impl Debug for ServiceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceKey")
            .field("service", &self.info.name())
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Mailer;
    crate::injectable!(Mailer = || Mailer);

    #[test]
    fn equality_ignores_instantiator() {
        let mut keys = HashSet::new();
        keys.insert(ServiceKey::of::<Mailer>());
        assert!(keys.contains(&ServiceKey::of::<Mailer>()));
        assert!(!keys.contains(&ServiceKey::named::<Mailer>("smtp")));
        assert_eq!(
            ServiceKey::named::<Mailer>("smtp"),
            ServiceKey::named::<Mailer>(String::from("smtp"))
        );
    }

    #[test]
    fn only_type_identifiers_instantiate() {
        assert!(ServiceKey::of::<Mailer>().instantiator().is_some());
        assert!(ServiceKey::named::<Mailer>("smtp").instantiator().is_none());
        assert!(ServiceKey::exact::<Mailer>().instantiator().is_none());
        assert_eq!(ServiceKey::of::<Mailer>(), ServiceKey::exact::<Mailer>());
    }

    #[test]
    fn display_includes_name() {
        let key = ServiceKey::named::<u32>("port");
        assert_eq!("\"port\" (u32)", key.to_string());
        assert_eq!("u32", ServiceKey::of::<u32>().to_string());
    }
}
