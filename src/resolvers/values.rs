use crate::{AnyValue, Container, InjectResult, Parameter, ServiceInfo, ValueResolver};
use std::borrow::Cow;

/// Supplies a value to every parameter with a given name.
#[derive(Clone, Debug)]
pub struct ByName<V> {
    name: Cow<'static, str>,
    value: V,
}

impl<V> ByName<V> {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, value: V) -> Self {
        ByName {
            name: name.into(),
            value,
        }
    }
}

impl<V: Clone + Send + Sync + 'static> ValueResolver for ByName<V> {
    fn resolve(
        &self,
        parameter: &Parameter,
        _container: &Container,
    ) -> InjectResult<Option<AnyValue>> {
        let matches = parameter.name() == Some(self.name.as_ref());
        Ok(matches.then(|| Box::new(self.value.clone()) as AnyValue))
    }
}

/// Supplies a value to the parameter at a given position.
#[derive(Clone, Debug)]
pub struct ByPosition<V> {
    position: usize,
    value: V,
}

impl<V> ByPosition<V> {
    #[must_use]
    pub fn new(position: usize, value: V) -> Self {
        ByPosition { position, value }
    }
}

impl<V: Clone + Send + Sync + 'static> ValueResolver for ByPosition<V> {
    fn resolve(
        &self,
        parameter: &Parameter,
        _container: &Container,
    ) -> InjectResult<Option<AnyValue>> {
        let matches = parameter.position() == self.position;
        Ok(matches.then(|| Box::new(self.value.clone()) as AnyValue))
    }
}

/// Supplies a value to every parameter declared with the value's type.
#[derive(Clone, Debug)]
pub struct ByType<V> {
    value: V,
}

impl<V> ByType<V> {
    #[must_use]
    pub fn new(value: V) -> Self {
        ByType { value }
    }
}

impl<V: Clone + Send + Sync + 'static> ValueResolver for ByType<V> {
    fn resolve(
        &self,
        parameter: &Parameter,
        _container: &Container,
    ) -> InjectResult<Option<AnyValue>> {
        let matches = parameter.declared() == ServiceInfo::of::<V>();
        Ok(matches.then(|| Box::new(self.value.clone()) as AnyValue))
    }
}
