use crate::{Inject, ServiceInfo, ServiceKey, Signature};
use std::fmt::{Display, Formatter};

/// Describes one parameter of a callable being dispatched or a constructor
/// being instantiated.
#[derive(Clone, Debug)]
pub struct Parameter {
    position: usize,
    name: Option<&'static str>,
    declared: ServiceInfo,
    owner: &'static str,
    service: Option<ServiceKey>,
    optional: bool,
}

impl Parameter {
    /// Describes the parameter at `position` of `signature`, declared as `T`.
    #[must_use]
    pub fn of<T: Inject>(position: usize, signature: &Signature) -> Self {
        Parameter {
            position,
            name: signature.name_of(position),
            declared: ServiceInfo::of::<T>(),
            owner: signature.owner(),
            service: T::service(),
            optional: T::fallback().is_some(),
        }
    }

    /// The zero-based position of the parameter.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The parameter's name, if the callable was given names.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// The declared type of the parameter.
    #[must_use]
    pub fn declared(&self) -> ServiceInfo {
        self.declared
    }

    /// The callable or type this parameter belongs to.
    #[must_use]
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// The service the parameter asks for, if it asks for a service at all.
    #[must_use]
    pub fn service(&self) -> Option<&ServiceKey> {
        self.service.as_ref()
    }

    /// Whether the parameter has a fallback value when nothing resolves it.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.name {
            Some(name) => write!(f, "parameter `{}`", name)?,
            None => write!(f, "parameter #{}", self.position)?,
        }
        write!(f, " ({}) of {}", self.declared, self.owner)
    }
}
