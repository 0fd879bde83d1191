use crate::{
    downcast_service,
    guard::{Phase, ResolutionGuard},
    registry::Registry,
    AnyValue, Callable, ContainerBuilder, ContainerOptions, Definition,
    Definitions, Dispatcher, ErasedDefinition, InjectError, InjectResult,
    Instantiator, InterfaceFor, Invocation, Invoke, Module, Registrar,
    Repository, Resolve, Resolvers, Service, ServiceInfo, ServiceKey, Svc,
    ValueResolver, WeakSvc,
};
use parking_lot::RwLock;
use std::{
    fmt::{Debug, Formatter},
    marker::PhantomData,
};
use tracing::{debug, trace, warn};

struct Shared {
    registry: RwLock<Registry>,
    parent: Option<WeakContainer>,
    options: ContainerOptions,
}

/// A service container.
///
/// A container holds [`Definition`]s under [`ServiceKey`]s, resolves them on
/// request, builds types that have no definition by injecting their
/// dependencies, and invokes callables with resolved parameters.
///
/// Cloning a container is cheap. Clones share their definitions, but each
/// clone has its own resolver chain, so resolvers pushed onto one handle
/// don't affect the others.
///
/// A container registers itself under [`Container`], [`dyn Repository`],
/// [`dyn Registrar`], [`dyn Instantiator`] and [`dyn Dispatcher`]. These keys
/// are reserved and cannot be redefined or aliased over.
///
/// [`dyn Repository`]: Repository
/// [`dyn Registrar`]: Registrar
/// [`dyn Instantiator`]: Instantiator
/// [`dyn Dispatcher`]: Dispatcher
#[derive(Clone)]
pub struct Container {
    shared: Svc<Shared>,
    resolvers: Resolvers,
}

/// A handle to a container that doesn't keep it alive.
#[derive(Clone)]
pub struct WeakContainer {
    shared: WeakSvc<Shared>,
    resolvers: Resolvers,
}

impl WeakContainer {
    /// Gets the container back if it still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<Container> {
        self.shared.upgrade().map(|shared| Container {
            shared,
            resolvers: self.resolvers.clone(),
        })
    }
}

impl Container {
    /// Creates an empty container with default options.
    #[must_use]
    pub fn new() -> Self {
        Container::builder().build()
    }

    #[must_use]
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::default()
    }

    pub(crate) fn from_parts(
        options: ContainerOptions,
        parent: Option<WeakContainer>,
        resolvers: Resolvers,
    ) -> Self {
        let container = Container {
            shared: Svc::new(Shared {
                registry: RwLock::new(Registry::default()),
                parent,
                options,
            }),
            resolvers,
        };

        container.register_self();
        debug!(
            has_parent = container.shared.parent.is_some(),
            resolvers = container.resolvers.len(),
            "container created"
        );
        container
    }

    fn register_self(&self) {
        fn project<I: ?Sized + Service>(
            into: fn(Container) -> Svc<I>,
        ) -> Svc<dyn ErasedDefinition> {
            Svc::new(Definition::<I>::factory(move |container| {
                Ok(into(container.clone()))
            }))
        }

        let mut registry = self.shared.registry.write();
        registry.reserve(ServiceKey::of::<Container>(), project::<Container>(Svc::new));
        registry.reserve(
            ServiceKey::of::<dyn Repository>(),
            project::<dyn Repository>(|container| Svc::new(container)),
        );
        registry.reserve(
            ServiceKey::of::<dyn Registrar>(),
            project::<dyn Registrar>(|container| Svc::new(container)),
        );
        registry.reserve(
            ServiceKey::of::<dyn Instantiator>(),
            project::<dyn Instantiator>(|container| Svc::new(container)),
        );
        registry.reserve(
            ServiceKey::of::<dyn Dispatcher>(),
            project::<dyn Dispatcher>(|container| Svc::new(container)),
        );
    }

    /// Creates a container that delegates to this one for everything this
    /// one has.
    #[must_use]
    pub fn child(&self) -> Self {
        let mut builder = Container::builder();
        builder.parent(self);
        builder.build()
    }

    /// The parent container, if there is one and it still exists.
    #[must_use]
    pub fn parent(&self) -> Option<Container> {
        let parent = self.shared.parent.as_ref()?;
        let upgraded = parent.upgrade();
        if upgraded.is_none() {
            warn!("parent container has been dropped");
        }
        upgraded
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakContainer {
        WeakContainer {
            shared: Svc::downgrade(&self.shared),
            resolvers: self.resolvers.clone(),
        }
    }

    /// Whether two handles refer to the same container.
    #[must_use]
    pub fn ptr_eq(a: &Container, b: &Container) -> bool {
        Svc::ptr_eq(&a.shared, &b.shared)
    }

    #[must_use]
    pub fn options(&self) -> &ContainerOptions {
        &self.shared.options
    }

    /// The resolver chain this handle consults for every parameter.
    #[must_use]
    pub fn default_resolvers(&self) -> &Resolvers {
        &self.resolvers
    }

    /// Appends a resolver to this handle's chain. Other handles to the same
    /// container are unaffected.
    pub fn push_resolver<R: ValueResolver>(&mut self, resolver: R) {
        self.resolvers.push(resolver);
    }

    fn id(&self) -> usize {
        Svc::as_ptr(&self.shared) as usize
    }

    /// Defines `key`.
    ///
    /// Defining a key that is currently an alias replaces the alias.
    /// Redefining a key follows the container's [`RebindPolicy`].
    ///
    /// [`RebindPolicy`]: crate::RebindPolicy
    pub fn define<T: ?Sized + Service>(
        &self,
        key: ServiceKey,
        definition: Definition<T>,
    ) -> InjectResult<Registered<'_, T>> {
        self.define_erased(key.clone(), Svc::new(definition))?;
        Ok(Registered {
            container: self,
            key,
            marker: PhantomData,
        })
    }

    fn define_erased(
        &self,
        key: ServiceKey,
        definition: Svc<dyn ErasedDefinition>,
    ) -> InjectResult<()> {
        self.shared
            .registry
            .write()
            .define(key, definition, self.shared.options.rebind)
    }

    /// Defines `T` as a singleton built by instantiating `T`.
    pub fn singleton<T: ?Sized + Resolve>(
        &self,
    ) -> InjectResult<Registered<'_, T>> {
        self.define(
            ServiceKey::of::<T>(),
            Definition::singleton(Container::make::<T>),
        )
    }

    /// Defines `T` as a weak singleton built by instantiating `T`.
    pub fn weak<T: ?Sized + Resolve>(&self) -> InjectResult<Registered<'_, T>> {
        self.define(ServiceKey::of::<T>(), Definition::weak(Container::make::<T>))
    }

    /// Defines `T` as a factory built by instantiating `T`.
    pub fn factory<T: ?Sized + Resolve>(
        &self,
    ) -> InjectResult<Registered<'_, T>> {
        self.define(
            ServiceKey::of::<T>(),
            Definition::factory(Container::make::<T>),
        )
    }

    /// Defines `T` as a singleton built by `builder`, whose parameters are
    /// resolved when it runs.
    pub fn singleton_with<T, D, F>(
        &self,
        builder: F,
    ) -> InjectResult<Registered<'_, T>>
    where
        T: Resolve,
        D: 'static,
        F: Invoke<D, Output = T>,
    {
        self.define(ServiceKey::of::<T>(), Definition::singleton(detached(builder)))
    }

    /// Defines `T` as a weak singleton built by `builder`.
    pub fn weak_with<T, D, F>(&self, builder: F) -> InjectResult<Registered<'_, T>>
    where
        T: Resolve,
        D: 'static,
        F: Invoke<D, Output = T>,
    {
        self.define(ServiceKey::of::<T>(), Definition::weak(detached(builder)))
    }

    /// Defines `T` as a factory built by `builder`.
    pub fn factory_with<T, D, F>(
        &self,
        builder: F,
    ) -> InjectResult<Registered<'_, T>>
    where
        T: Resolve,
        D: 'static,
        F: Invoke<D, Output = T>,
    {
        self.define(ServiceKey::of::<T>(), Definition::factory(detached(builder)))
    }

    /// Defines an existing value under its own type.
    pub fn instance<T: Service>(&self, value: T) -> InjectResult<Registered<'_, T>> {
        self.instance_shared(Svc::new(value))
    }

    /// Defines an existing service pointer under its own type.
    pub fn instance_shared<T: ?Sized + Service>(
        &self,
        service: Svc<T>,
    ) -> InjectResult<Registered<'_, T>> {
        self.define(ServiceKey::exact::<T>(), Definition::instance(service))
    }

    /// Makes `alias` resolve to whatever `key` resolves to. Aliases can point
    /// at other aliases.
    pub fn alias(&self, key: &ServiceKey, alias: ServiceKey) -> InjectResult<()> {
        self.shared.registry.write().alias(key.clone(), alias)
    }

    /// Applies a module to this container.
    pub fn register<M: Module>(&self, module: M) -> InjectResult<()> {
        module.register(self)
    }

    /// Gets the service identified by `T`'s type identifier, instantiating
    /// `T` if nothing defines it.
    ///
    /// If a live parent has the key, the parent resolves it instead.
    pub fn get<T: ?Sized + Resolve>(&self) -> InjectResult<Svc<T>> {
        self.get_key(&ServiceKey::of::<T>())
    }

    /// Like [`get`](Container::get), with extra resolvers for `T`'s
    /// constructor if `T` ends up being instantiated.
    pub fn get_with<T: ?Sized + Resolve>(
        &self,
        resolvers: &Resolvers,
    ) -> InjectResult<Svc<T>> {
        let key = ServiceKey::of::<T>();
        downcast_service(&key, self.resolve_key(&key, resolvers)?)
    }

    /// Gets the service identified by `key`.
    pub fn get_key<T: ?Sized + Service>(
        &self,
        key: &ServiceKey,
    ) -> InjectResult<Svc<T>> {
        downcast_service(key, self.resolve_key(key, &Resolvers::new())?)
    }

    /// Resolves `key`, returning the boxed `Svc<T>`.
    ///
    /// The keys a container reserves for itself always resolve to this
    /// container, even when a parent has them too.
    pub fn resolve_key(
        &self,
        key: &ServiceKey,
        resolvers: &Resolvers,
    ) -> InjectResult<AnyValue> {
        let reserved = self.shared.registry.read().is_reserved(key);
        if !reserved {
            if let Some(parent) = self.parent() {
                if parent.has(key) {
                    trace!(key = %key, "delegating to parent container");
                    return parent.resolve_key(key, &Resolvers::new());
                }
            }
        }

        let entry = self.shared.registry.read().get(key);
        match entry {
            Some((canonical, definition)) => {
                let _guard =
                    ResolutionGuard::enter(self.id(), Phase::Resolve, &canonical)?;
                trace!(
                    key = %canonical,
                    lifecycle = %definition.lifecycle(),
                    "resolving definition"
                );
                definition.resolve_erased(self)
            }
            None => self.make_key(key, resolvers),
        }
    }

    /// Whether this container or a live parent can resolve `key` without
    /// instantiating anything.
    #[must_use]
    pub fn has(&self, key: &ServiceKey) -> bool {
        self.parent().map_or(false, |parent| parent.has(key))
            || self.shared.registry.read().has(key)
    }

    /// Builds a new `T`, ignoring any definition for it and any parent.
    pub fn make<T: ?Sized + Resolve>(&self) -> InjectResult<Svc<T>> {
        self.make_with(&Resolvers::new())
    }

    /// Like [`make`](Container::make), with extra resolvers for `T`'s
    /// constructor.
    pub fn make_with<T: ?Sized + Resolve>(
        &self,
        resolvers: &Resolvers,
    ) -> InjectResult<Svc<T>> {
        let key = ServiceKey::of::<T>();
        let _guard = ResolutionGuard::enter(self.id(), Phase::Construct, &key)?;
        trace!(key = %key, "instantiating");
        T::instantiate(&Invocation::new(self, resolvers))
    }

    /// Builds the service identified by `key`, returning the boxed `Svc<T>`.
    pub fn make_key(
        &self,
        key: &ServiceKey,
        resolvers: &Resolvers,
    ) -> InjectResult<AnyValue> {
        let instantiate = match key.instantiator() {
            Some(instantiate) => instantiate,
            None if key.is_named() => {
                return Err(InjectError::ServiceNotFound { key: key.clone() })
            }
            None => {
                return Err(InjectError::NotInstantiable { key: key.clone() })
            }
        };

        let _guard = ResolutionGuard::enter(self.id(), Phase::Construct, key)?;
        trace!(key = %key, "instantiating");
        instantiate(&Invocation::new(self, resolvers))
    }

    /// Invokes `callable`, resolving each of its parameters.
    pub fn call<D, F: Invoke<D>>(&self, callable: F) -> InjectResult<F::Output> {
        self.call_with(callable, &Resolvers::new())
    }

    /// Invokes `callable` with extra resolvers that are consulted before the
    /// container's own chain.
    pub fn call_with<D, F: Invoke<D>>(
        &self,
        callable: F,
        resolvers: &Resolvers,
    ) -> InjectResult<F::Output> {
        trace!(callable = callable.signature().owner(), "dispatching");
        callable.invoke(&Invocation::new(self, resolvers))
    }

    /// Binds `callable` to this container and `resolvers`. Each call of the
    /// returned closure resolves the parameters again.
    pub fn detach<D, F>(
        &self,
        callable: F,
        resolvers: Resolvers,
    ) -> impl Fn() -> InjectResult<F::Output> + Send + Sync + 'static
    where
        D: 'static,
        F: Invoke<D>,
    {
        let container = self.clone();
        move || callable.invoke(&Invocation::new(&container, &resolvers))
    }

    /// Gets the definition registered for `key`, following aliases.
    pub fn definition<T: ?Sized + Service>(
        &self,
        key: &ServiceKey,
    ) -> InjectResult<Svc<Definition<T>>> {
        let (canonical, definition) = self
            .shared
            .registry
            .read()
            .get(key)
            .ok_or_else(|| InjectError::ServiceNotFound { key: key.clone() })?;

        definition
            .downcast_arc::<Definition<T>>()
            .map_err(|definition| InjectError::InvalidDefinition {
                key: canonical,
                expected: ServiceInfo::of::<T>(),
                actual: definition.service_info(),
            })
    }

    /// A snapshot of this container's own definitions in the order they
    /// were first defined. Parents are not included.
    ///
    /// The snapshot starts with the five keys the container reserves for
    /// itself: [`Container`], then `dyn Repository`, `dyn Registrar`,
    /// `dyn Instantiator` and `dyn Dispatcher`. Each is a separate entry, but
    /// all of them resolve to the same container.
    #[must_use]
    pub fn definitions(&self) -> Definitions {
        Definitions::new(self.shared.registry.read().entries().to_vec())
    }

    /// The number of definitions in this container, not counting parents.
    /// The five reserved keys are counted, so a new container has a length
    /// of five.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.registry.read().len()
    }

    /// Always `false`, since a container defines itself.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn detached<T, D, F>(
    builder: F,
) -> impl Fn(&Container) -> InjectResult<Svc<T>> + Send + Sync + 'static
where
    T: Service,
    D: 'static,
    F: Invoke<D, Output = T>,
{
    move |container: &Container| {
        builder
            .invoke(&Invocation::new(container, &Resolvers::new()))
            .map(Svc::new)
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::new()
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("definitions", &*self.shared.registry.read())
            .field("has_parent", &self.shared.parent.is_some())
            .field("resolvers", &self.resolvers)
            .finish()
    }
}

impl Resolve for Container {}

impl Repository for Container {
    fn has(&self, key: &ServiceKey) -> bool {
        Container::has(self, key)
    }

    fn resolve(
        &self,
        key: &ServiceKey,
        resolvers: &Resolvers,
    ) -> InjectResult<AnyValue> {
        self.resolve_key(key, resolvers)
    }
}

impl Registrar for Container {
    fn define_erased(
        &self,
        key: ServiceKey,
        definition: Svc<dyn ErasedDefinition>,
    ) -> InjectResult<()> {
        Container::define_erased(self, key, definition)
    }

    fn alias(&self, key: &ServiceKey, alias: ServiceKey) -> InjectResult<()> {
        Container::alias(self, key, alias)
    }
}

impl Instantiator for Container {
    fn instantiate(
        &self,
        key: &ServiceKey,
        resolvers: &Resolvers,
    ) -> InjectResult<AnyValue> {
        self.make_key(key, resolvers)
    }
}

impl Dispatcher for Container {
    fn dispatch(
        &self,
        callable: &dyn Callable,
        resolvers: &Resolvers,
    ) -> InjectResult<AnyValue> {
        trace!(callable = callable.signature().owner(), "dispatching");
        callable.call(&Invocation::new(self, resolvers))
    }
}

/// A definition that was just added to a container. Use it to add aliases
/// for the definition or bind it to interfaces.
pub struct Registered<'c, T: ?Sized + Service> {
    container: &'c Container,
    key: ServiceKey,
    marker: PhantomData<fn() -> Svc<T>>,
}

impl<'c, T: ?Sized + Service> Registered<'c, T> {
    /// The key the definition was added under.
    #[must_use]
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// Makes `alias` resolve to this definition.
    pub fn alias(self, alias: ServiceKey) -> InjectResult<Self> {
        self.container.alias(&self.key, alias)?;
        Ok(self)
    }

    /// Makes requests for the interface `I` resolve to this definition. The
    /// definition's lifecycle applies to the interface as well.
    pub fn bind<I>(self) -> InjectResult<Self>
    where
        I: ?Sized + InterfaceFor<T>,
    {
        let source = self.key.clone();
        let projection = Definition::<I>::factory(move |container: &Container| {
            container
                .get_key::<T>(&source)
                .map(<I as InterfaceFor<T>>::from_svc)
        });

        self.container
            .define_erased(ServiceKey::of::<I>(), Svc::new(projection))?;
        Ok(self)
    }

    /// Gets the definition that was added.
    pub fn definition(&self) -> InjectResult<Svc<Definition<T>>> {
        self.container.definition(&self.key)
    }
}

impl<'c, T: ?Sized + Service> Debug for Registered<'c, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registered").field("key", &self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{injectable, interface};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Database;
    injectable!(Database);

    struct Repo {
        database: Svc<Database>,
    }
    injectable!(Repo = |database: Svc<Database>| Repo { database });

    trait Store: Send + Sync {
        fn name(&self) -> &'static str;
    }

    struct MemoryStore;
    impl Store for MemoryStore {
        fn name(&self) -> &'static str {
            "memory"
        }
    }
    injectable!(MemoryStore = || MemoryStore);
    interface!(Store = [MemoryStore]);

    #[test]
    fn singletons_are_shared() {
        let container = Container::new();
        container.singleton::<Database>().unwrap();

        let first: Svc<Database> = container.get().unwrap();
        let second: Svc<Database> = container.get().unwrap();
        assert!(Svc::ptr_eq(&first, &second));
    }

    #[test]
    fn factories_are_not_shared() {
        let container = Container::new();
        container.factory::<Database>().unwrap();

        let first: Svc<Database> = container.get().unwrap();
        let second: Svc<Database> = container.get().unwrap();
        assert!(!Svc::ptr_eq(&first, &second));
    }

    #[test]
    fn undefined_types_are_instantiated() {
        let container = Container::new();
        container.singleton::<Database>().unwrap();

        let repo: Svc<Repo> = container.get().unwrap();
        let database: Svc<Database> = container.get().unwrap();
        assert!(Svc::ptr_eq(&repo.database, &database));
        assert!(!container.has(&ServiceKey::of::<Repo>()));
    }

    #[test]
    fn named_keys_are_not_instantiated() {
        let container = Container::new();
        match container.get_key::<Database>(&ServiceKey::named::<Database>("main")) {
            Err(InjectError::ServiceNotFound { key }) => {
                assert_eq!(Some("main"), key.name());
            }
            Err(error) => panic!("unexpected error: {error}"),
            Ok(_) => panic!("named key should not be instantiated"),
        }
    }

    #[test]
    fn bound_interfaces_share_lifecycle() {
        let container = Container::new();
        container
            .singleton::<MemoryStore>()
            .unwrap()
            .bind::<dyn Store>()
            .unwrap();

        let store: Svc<dyn Store> = container.get().unwrap();
        let concrete: Svc<MemoryStore> = container.get().unwrap();
        assert_eq!("memory", store.name());
        assert_eq!(
            Svc::as_ptr(&concrete) as *const (),
            Svc::as_ptr(&store) as *const ()
        );
    }

    #[test]
    fn unbound_interfaces_are_not_instantiable() {
        let container = Container::new();
        assert!(matches!(
            container.get::<dyn Store>(),
            Err(InjectError::NotInstantiable { .. })
        ));
    }

    #[test]
    fn definition_is_typed() {
        let container = Container::new();
        let key = ServiceKey::named::<u32>("port");
        container
            .define(key.clone(), Definition::instance(Svc::new(8080u32)))
            .unwrap();

        let definition = container.definition::<u32>(&key).unwrap();
        assert_eq!(8080, *definition.resolve(&container).unwrap());
        assert!(matches!(
            container.definition::<u32>(&ServiceKey::named::<u32>("missing")),
            Err(InjectError::ServiceNotFound { .. })
        ));
    }

    #[test]
    fn get_key_checks_requested_type() {
        let container = Container::new();
        let key = ServiceKey::named::<u32>("port");
        container
            .define(key.clone(), Definition::instance(Svc::new(8080u32)))
            .unwrap();
        assert!(matches!(
            container.get_key::<u64>(&key),
            Err(InjectError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn clones_have_independent_resolvers() {
        let original = Container::new();
        let mut clone = original.clone();
        clone.push_resolver(crate::ByName::new("limit", 3u32));

        let limit = crate::Named::new(|limit: u32| limit, &["limit"]);
        assert_eq!(3, clone.call(limit).unwrap());

        let limit = crate::Named::new(|limit: u32| limit, &["limit"]);
        assert!(matches!(
            original.call(limit),
            Err(InjectError::UnresolvableParameter { .. })
        ));
        assert!(Container::ptr_eq(&original, &clone));
    }

    #[test]
    fn detached_callables_resolve_each_call() {
        let container = Container::new();
        container.factory::<Database>().unwrap();
        let calls = Svc::new(AtomicUsize::new(0));

        let detached = container.detach(
            {
                let calls = calls.clone();
                move |_database: Svc<Database>| calls.fetch_add(1, Ordering::SeqCst)
            },
            Resolvers::new(),
        );
        drop(container);

        assert_eq!(0, detached().unwrap());
        assert_eq!(1, detached().unwrap());
        assert_eq!(2, calls.load(Ordering::SeqCst));
    }

    #[test]
    fn definitions_are_listed_in_order() {
        let container = Container::new();
        container.singleton::<Database>().unwrap();
        container.instance(5u32).unwrap();
        container.singleton::<Database>().unwrap();

        let keys: Vec<ServiceKey> = container.definitions().map(|(key, _)| key).collect();
        let own = &keys[keys.len() - 2..];
        assert_eq!(
            &[ServiceKey::of::<Database>(), ServiceKey::of::<u32>()],
            own
        );
    }

    #[test]
    fn reserved_keys_lead_definitions() {
        let container = Container::new();
        let keys: Vec<ServiceKey> = container.definitions().map(|(key, _)| key).collect();
        assert_eq!(
            vec![
                ServiceKey::of::<Container>(),
                ServiceKey::of::<dyn Repository>(),
                ServiceKey::of::<dyn Registrar>(),
                ServiceKey::of::<dyn Instantiator>(),
                ServiceKey::of::<dyn Dispatcher>(),
            ],
            keys
        );
        assert_eq!(5, container.len());
        assert!(!container.is_empty());
    }

    #[test]
    fn child_resolves_reserved_keys_to_itself() {
        let parent = Container::new();
        let child = parent.child();

        let injected = child.call(|injected: Container| injected).unwrap();
        assert!(Container::ptr_eq(&child, &injected));

        let resolved: Svc<Container> = child.get().unwrap();
        assert!(Container::ptr_eq(&child, &resolved));

        let registrar: Svc<dyn Registrar> = child.get().unwrap();
        registrar
            .define(ServiceKey::of::<Database>(), Definition::instance(Svc::new(Database)))
            .unwrap();
        assert!(child.has(&ServiceKey::of::<Database>()));
        assert!(!parent.has(&ServiceKey::of::<Database>()));
    }

    #[test]
    fn child_singletons_are_shared_through_injected_container() {
        let parent = Container::new();
        let child = parent.child();
        child.singleton::<Database>().unwrap();

        let first = child
            .call(|injected: Container| injected.get::<Database>())
            .unwrap()
            .unwrap();
        let second = child
            .call(|injected: Container| injected.get::<Database>())
            .unwrap()
            .unwrap();
        assert!(Svc::ptr_eq(&first, &second));
    }

    #[traced_test]
    #[test]
    fn rebinding_resolved_singleton_warns() {
        let container = Container::new();
        container.singleton::<Database>().unwrap();
        let _database: Svc<Database> = container.get().unwrap();

        container.singleton::<Database>().unwrap();
        assert!(logs_contain("replacing a definition that has already been resolved"));
    }

    #[test]
    fn reject_resolved_policy_keeps_existing_singleton() {
        let mut builder = Container::builder();
        builder.rebind(crate::RebindPolicy::RejectResolved);
        let container = builder.build();

        container.singleton::<Database>().unwrap();
        container.singleton::<Database>().unwrap();
        let first: Svc<Database> = container.get().unwrap();

        assert!(matches!(
            container.singleton::<Database>(),
            Err(InjectError::RegistrationError { .. })
        ));
        let second: Svc<Database> = container.get().unwrap();
        assert!(Svc::ptr_eq(&first, &second));
    }
}
