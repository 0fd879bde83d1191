use crate::{
    AnyValue, ByName, ByPosition, ByType, Container, InjectResult, Parameter,
    Svc,
};
use std::{
    borrow::Cow,
    fmt::{Debug, Formatter},
};

/// Supplies values for parameters.
///
/// Returning `Ok(None)` declines the parameter so the next resolver in the
/// chain gets a chance. Returning an error aborts the whole call.
pub trait ValueResolver: Send + Sync + 'static {
    fn resolve(
        &self,
        parameter: &Parameter,
        container: &Container,
    ) -> InjectResult<Option<AnyValue>>;
}

impl<F> ValueResolver for F
where
    F: Fn(&Parameter, &Container) -> InjectResult<Option<AnyValue>>
        + Send
        + Sync
        + 'static,
{
    fn resolve(
        &self,
        parameter: &Parameter,
        container: &Container,
    ) -> InjectResult<Option<AnyValue>> {
        self(parameter, container)
    }
}

/// An ordered chain of [`ValueResolver`]s. The first resolver to supply a
/// value wins.
///
/// A container holds one chain that applies to every call, and each call can
/// bring its own chain that is consulted first.
///
/// # Example
///
/// ```
/// use runtime_container::{Container, Named, Resolvers};
///
/// let container = Container::new();
/// let clamp = Named::new(|value: i32, max: i32| value.min(max), &["value", "max"]);
/// let resolvers = Resolvers::new().named("max", 10).positional(0, 25);
/// assert_eq!(10, container.call_with(clamp, &resolvers).unwrap());
/// ```
#[derive(Clone, Default)]
pub struct Resolvers {
    chain: Vec<Svc<dyn ValueResolver>>,
}

impl Resolvers {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Resolvers::default()
    }

    /// Appends a resolver to the end of the chain.
    pub fn push<R: ValueResolver>(&mut self, resolver: R) {
        self.chain.push(Svc::new(resolver));
    }

    /// Appends a resolver to the end of the chain.
    #[must_use]
    pub fn with<R: ValueResolver>(mut self, resolver: R) -> Self {
        self.push(resolver);
        self
    }

    /// Supplies `value` to parameters named `name`.
    #[must_use]
    pub fn named<V>(self, name: impl Into<Cow<'static, str>>, value: V) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        self.with(ByName::new(name, value))
    }

    /// Supplies `value` to the parameter at `position`.
    #[must_use]
    pub fn positional<V>(self, position: usize, value: V) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        self.with(ByPosition::new(position, value))
    }

    /// Supplies `value` to parameters declared as `V`.
    #[must_use]
    pub fn typed<V>(self, value: V) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        self.with(ByType::new(value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Asks each resolver in order, returning the first value supplied.
    pub fn resolve(
        &self,
        parameter: &Parameter,
        container: &Container,
    ) -> InjectResult<Option<AnyValue>> {
        for resolver in &self.chain {
            if let Some(value) = resolver.resolve(parameter, container)? {
                return Ok(Some(value));
            }
        }

        Ok(None)
    }
}

impl Extend<Svc<dyn ValueResolver>> for Resolvers {
    fn extend<I: IntoIterator<Item = Svc<dyn ValueResolver>>>(
        &mut self,
        iter: I,
    ) {
        self.chain.extend(iter);
    }
}

impl FromIterator<Svc<dyn ValueResolver>> for Resolvers {
    fn from_iter<I: IntoIterator<Item = Svc<dyn ValueResolver>>>(
        iter: I,
    ) -> Self {
        Resolvers {
            chain: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Resolvers {
    type Item = Svc<dyn ValueResolver>;
    type IntoIter = std::vec::IntoIter<Svc<dyn ValueResolver>>;

    fn into_iter(self) -> Self::IntoIter {
        self.chain.into_iter()
    }
}

impl Debug for Resolvers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolvers")
            .field("len", &self.chain.len())
            .finish()
    }
}
