use crate::{
    ErasedDefinition, InjectError, InjectResult, RebindPolicy, ServiceKey, Svc,
};
use std::{
    collections::{HashMap, HashSet},
    fmt::{Debug, Formatter},
};
use tracing::{debug, warn};

pub(crate) type Entry = (ServiceKey, Svc<dyn ErasedDefinition>);

/// Stores the definitions and aliases of a single container.
///
/// Definitions keep the order in which their keys were first defined.
/// Replacing a definition keeps its original position.
#[derive(Default)]
pub(crate) struct Registry {
    definitions: Vec<Entry>,
    index: HashMap<ServiceKey, usize>,
    aliases: HashMap<ServiceKey, ServiceKey>,
    locked: HashSet<ServiceKey>,
}

impl Registry {
    pub fn define(
        &mut self,
        key: ServiceKey,
        definition: Svc<dyn ErasedDefinition>,
        policy: RebindPolicy,
    ) -> InjectResult<()> {
        let provided = definition.service_info();
        if provided != key.info() {
            return Err(InjectError::InvalidDefinition {
                expected: key.info(),
                actual: provided,
                key,
            });
        }

        if self.locked.contains(&key) {
            return Err(InjectError::RegistrationError {
                key,
                reason: "the key is reserved by the container".to_owned(),
            });
        }

        if let Some(&slot) = self.index.get(&key) {
            let previous = &self.definitions[slot].1;
            if previous.is_resolved() {
                if policy == RebindPolicy::RejectResolved {
                    return Err(InjectError::RegistrationError {
                        key,
                        reason: "the existing definition has already been resolved"
                            .to_owned(),
                    });
                }

                warn!(
                    key = %key,
                    lifecycle = %previous.lifecycle(),
                    "replacing a definition that has already been resolved"
                );
            }
        }

        if let Some(target) = self.aliases.remove(&key) {
            debug!(key = %key, alias_of = %target, "definition replaces alias");
        }

        debug!(key = %key, lifecycle = %definition.lifecycle(), "service defined");
        match self.index.get(&key) {
            Some(&slot) => self.definitions[slot].1 = definition,
            None => {
                self.index.insert(key.clone(), self.definitions.len());
                self.definitions.push((key, definition));
            }
        }

        Ok(())
    }

    /// Defines a key that can never be redefined or aliased over. The key
    /// must not be defined yet.
    pub fn reserve(
        &mut self,
        key: ServiceKey,
        definition: Svc<dyn ErasedDefinition>,
    ) {
        self.index.insert(key.clone(), self.definitions.len());
        self.definitions.push((key.clone(), definition));
        self.locked.insert(key);
    }

    /// Makes `alias` resolve to whatever `key` resolves to.
    pub fn alias(
        &mut self,
        key: ServiceKey,
        alias: ServiceKey,
    ) -> InjectResult<()> {
        if key.info() != alias.info() {
            return Err(InjectError::RegistrationError {
                reason: format!(
                    "an alias of {} must identify the same service type",
                    key
                ),
                key: alias,
            });
        }

        if self.index.contains_key(&alias) {
            return Err(InjectError::AliasConflict { key, alias });
        }

        if self.chain(&key).any(|link| *link == alias) {
            return Err(InjectError::RegistrationError {
                reason: format!("aliasing {} would create a cycle", key),
                key: alias,
            });
        }

        debug!(alias = %alias, key = %key, "alias defined");
        self.aliases.insert(alias, key);
        Ok(())
    }

    /// Follows aliases starting at `key`, yielding `key` itself first.
    fn chain<'a>(
        &'a self,
        key: &'a ServiceKey,
    ) -> impl Iterator<Item = &'a ServiceKey> + 'a {
        // Aliases never form a cycle, so the chain always ends.
        std::iter::successors(Some(key), move |link| self.aliases.get(*link))
    }

    /// The key that `key` ultimately refers to.
    pub fn canonical(&self, key: &ServiceKey) -> ServiceKey {
        self.chain(key).last().unwrap_or(key).clone()
    }

    /// Finds the definition for `key`, following aliases. Returns the
    /// canonical key alongside it.
    pub fn get(&self, key: &ServiceKey) -> Option<Entry> {
        let canonical = self.canonical(key);
        let &slot = self.index.get(&canonical)?;
        Some(self.definitions[slot].clone())
    }

    /// Whether `key` refers to one of the keys the container reserved for
    /// itself.
    pub fn is_reserved(&self, key: &ServiceKey) -> bool {
        self.locked.contains(&self.canonical(key))
    }

    pub fn has(&self, key: &ServiceKey) -> bool {
        self.index.contains_key(&self.canonical(key))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.definitions
                    .iter()
                    .map(|(key, definition)| (key.to_string(), definition.lifecycle())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Container, Definition};

    fn instance(value: u32) -> Svc<dyn ErasedDefinition> {
        Svc::new(Definition::instance(Svc::new(value)))
    }

    fn resolved_singleton(container: &Container) -> Svc<dyn ErasedDefinition> {
        let definition = Definition::<u32>::singleton(|_| Ok(Svc::new(1)));
        definition.resolve(container).unwrap();
        Svc::new(definition)
    }

    #[test]
    fn aliases_are_transitive() {
        let mut registry = Registry::default();
        let a = ServiceKey::named::<u32>("a");
        let b = ServiceKey::named::<u32>("b");
        let c = ServiceKey::named::<u32>("c");

        registry.define(a.clone(), instance(1), RebindPolicy::Replace).unwrap();
        registry.alias(a.clone(), b.clone()).unwrap();
        registry.alias(b.clone(), c.clone()).unwrap();

        assert_eq!(a, registry.canonical(&c));
        assert!(registry.has(&c));
        assert_eq!(a, registry.get(&c).unwrap().0);
    }

    #[test]
    fn alias_cannot_shadow_definition() {
        let mut registry = Registry::default();
        let a = ServiceKey::named::<u32>("a");
        let b = ServiceKey::named::<u32>("b");
        registry.define(a.clone(), instance(1), RebindPolicy::Replace).unwrap();
        registry.define(b.clone(), instance(2), RebindPolicy::Replace).unwrap();

        assert!(matches!(
            registry.alias(a, b),
            Err(InjectError::AliasConflict { .. })
        ));
    }

    #[test]
    fn alias_cycles_are_rejected() {
        let mut registry = Registry::default();
        let a = ServiceKey::named::<u32>("a");
        let b = ServiceKey::named::<u32>("b");
        let c = ServiceKey::named::<u32>("c");

        assert!(matches!(
            registry.alias(a.clone(), a.clone()),
            Err(InjectError::RegistrationError { .. })
        ));

        registry.alias(a.clone(), b.clone()).unwrap();
        registry.alias(b.clone(), c.clone()).unwrap();
        assert!(matches!(
            registry.alias(c, a),
            Err(InjectError::RegistrationError { .. })
        ));
    }

    #[test]
    fn alias_requires_same_service_type() {
        let mut registry = Registry::default();
        assert!(matches!(
            registry.alias(
                ServiceKey::named::<u32>("a"),
                ServiceKey::named::<u64>("b")
            ),
            Err(InjectError::RegistrationError { .. })
        ));
    }

    #[test]
    fn defining_alias_key_drops_alias() {
        let mut registry = Registry::default();
        let a = ServiceKey::named::<u32>("a");
        let b = ServiceKey::named::<u32>("b");
        registry.define(a.clone(), instance(1), RebindPolicy::Replace).unwrap();
        registry.alias(a.clone(), b.clone()).unwrap();

        registry.define(b.clone(), instance(2), RebindPolicy::Replace).unwrap();
        assert_eq!(b, registry.canonical(&b));
        assert_eq!(2, registry.len());
    }

    #[test]
    fn redefinition_keeps_position() {
        let mut registry = Registry::default();
        let a = ServiceKey::named::<u32>("a");
        let b = ServiceKey::named::<u32>("b");
        registry.define(a.clone(), instance(1), RebindPolicy::Replace).unwrap();
        registry.define(b.clone(), instance(2), RebindPolicy::Replace).unwrap();
        registry.define(a.clone(), instance(3), RebindPolicy::Replace).unwrap();

        let keys: Vec<_> =
            registry.entries().iter().map(|(key, _)| key.clone()).collect();
        assert_eq!(vec![a, b], keys);
    }

    #[test]
    fn rejects_rebinding_resolved_singleton_when_asked() {
        let container = Container::new();
        let mut registry = Registry::default();
        let key = ServiceKey::named::<u32>("answer");
        registry
            .define(key.clone(), resolved_singleton(&container), RebindPolicy::Replace)
            .unwrap();

        assert!(matches!(
            registry.define(key.clone(), instance(2), RebindPolicy::RejectResolved),
            Err(InjectError::RegistrationError { .. })
        ));
        assert!(registry
            .define(key, instance(2), RebindPolicy::Replace)
            .is_ok());
    }

    #[test]
    fn locked_keys_cannot_be_redefined() {
        let mut registry = Registry::default();
        let key = ServiceKey::named::<u32>("reserved");
        registry.reserve(key.clone(), instance(1));
        assert!(matches!(
            registry.define(key.clone(), instance(2), RebindPolicy::Replace),
            Err(InjectError::RegistrationError { .. })
        ));
        assert!(registry.is_reserved(&key));
        assert!(matches!(
            registry.alias(ServiceKey::named::<u32>("other"), key),
            Err(InjectError::AliasConflict { .. })
        ));
    }

    #[test]
    fn rejects_mismatched_definition() {
        let mut registry = Registry::default();
        assert!(matches!(
            registry.define(
                ServiceKey::named::<u64>("wrong"),
                instance(1),
                RebindPolicy::Replace
            ),
            Err(InjectError::InvalidDefinition { .. })
        ));
    }
}
