use crate::{Container, InjectResult};

/// A group of related definitions that can be added to a container all at
/// once. Closures taking the container are modules too.
///
/// # Example
///
/// ```
/// use runtime_container::{injectable, Container, InjectResult, Module, Svc};
///
/// #[derive(Default)]
/// struct Cache;
/// injectable!(Cache);
///
/// struct CacheModule;
///
/// impl Module for CacheModule {
///     fn register(self, container: &Container) -> InjectResult<()> {
///         container.singleton::<Cache>()?;
///         Ok(())
///     }
/// }
///
/// let container = Container::new();
/// container.register(CacheModule).unwrap();
/// container
///     .register(|container: &Container| -> InjectResult<()> {
///         container.instance(3u32)?;
///         Ok(())
///     })
///     .unwrap();
///
/// let first: Svc<Cache> = container.get().unwrap();
/// let second: Svc<Cache> = container.get().unwrap();
/// assert!(Svc::ptr_eq(&first, &second));
/// ```
pub trait Module {
    /// Adds this module's definitions to `container`.
    fn register(self, container: &Container) -> InjectResult<()>;
}

impl<F> Module for F
where
    F: FnOnce(&Container) -> InjectResult<()>,
{
    fn register(self, container: &Container) -> InjectResult<()> {
        self(container)
    }
}
