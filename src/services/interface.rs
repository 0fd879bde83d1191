use crate::{Resolve, Service, Svc};

/// Marker trait that indicates that a type is an interface for another type.
/// Each type is an interface for itself, and each `dyn Trait` is an interface
/// for the types listed for it in the [`interface!`](crate::interface) macro.
///
/// This is what lets [`Registered::bind`](crate::Registered::bind) expose a
/// concrete definition under a trait object key.
pub trait InterfaceFor<T: ?Sized + Service>: Resolve {
    /// Converts a pointer to the implementation into a pointer to the
    /// interface.
    fn from_svc(service: Svc<T>) -> Svc<Self>;
}

impl<T: ?Sized + Resolve> InterfaceFor<T> for T {
    fn from_svc(service: Svc<T>) -> Svc<Self> {
        service
    }
}

/// Marks a trait as an interface that services can be requested by. The
/// trait must have `Send + Sync` as supertraits.
///
/// Listing implementations after the trait allows definitions of those types
/// to be bound to the trait.
///
/// # Example
/// ```
/// use runtime_container::{interface, Container, Svc};
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 {
///         42
///     }
/// }
///
/// interface!(Clock = [FixedClock]);
///
/// let container = Container::new();
/// container
///     .instance(FixedClock)
///     .unwrap()
///     .bind::<dyn Clock>()
///     .unwrap();
///
/// let clock: Svc<dyn Clock> = container.get().unwrap();
/// assert_eq!(42, clock.now());
/// ```
#[macro_export]
macro_rules! interface {
    ($trait:tt $(= [$($(#[$attr:meta])* $impl:ty),* $(,)?])?) => {
        impl $crate::Resolve for dyn $trait {}

        $($(
            $(#[$attr])*
            impl $crate::InterfaceFor<$impl> for dyn $trait {
                fn from_svc(service: $crate::Svc<$impl>) -> $crate::Svc<Self> {
                    service
                }
            }
        )*)?
    };
}
