use crate::{AnyValue, InjectError, InjectResult, Invocation, Service, ServiceKey, Svc};

/// Implemented by services that can be requested by type.
///
/// The container calls [`instantiate`](Resolve::instantiate) when a type is
/// requested but nothing is defined for it. The default implementation
/// reports the type as not instantiable, which is what trait objects and
/// value types use. Constructible types usually implement this through the
/// [`injectable!`](crate::injectable) macro.
///
/// # Example
///
/// ```
/// use runtime_container::{Container, InjectResult, Invocation, Resolve, Svc};
///
/// struct Config {
///     retries: u32,
/// }
///
/// impl Resolve for Config {
///     fn instantiate(invocation: &Invocation<'_>) -> InjectResult<Svc<Self>> {
///         invocation.construct(|| Config { retries: 3 })
///     }
/// }
///
/// let container = Container::new();
/// let config: Svc<Config> = container.get().unwrap();
/// assert_eq!(3, config.retries);
/// ```
pub trait Resolve: Service {
    /// Builds a new instance of the service, resolving its dependencies from
    /// the invocation.
    fn instantiate(_invocation: &Invocation<'_>) -> InjectResult<Svc<Self>> {
        Err(InjectError::NotInstantiable {
            key: ServiceKey::of::<Self>(),
        })
    }
}

pub(crate) fn instantiate_erased<T: ?Sized + Resolve>(
    invocation: &Invocation<'_>,
) -> InjectResult<AnyValue> {
    T::instantiate(invocation).map(|service| Box::new(service) as AnyValue)
}

/// Implements [`Resolve`] for a type using a constructor.
///
/// The constructor can be any invokable, such as a function, a closure or a
/// [`Named`](crate::Named) wrapper. Leaving the constructor out uses the
/// type's [`Default`] implementation.
///
/// # Example
///
/// ```
/// use runtime_container::{injectable, Container, Svc};
///
/// #[derive(Default)]
/// struct Database;
///
/// struct UserService {
///     database: Svc<Database>,
/// }
///
/// impl UserService {
///     fn new(database: Svc<Database>) -> Self {
///         UserService { database }
///     }
/// }
///
/// injectable!(Database);
/// injectable!(UserService = UserService::new);
///
/// let container = Container::new();
/// container.singleton::<Database>().unwrap();
///
/// let users: Svc<UserService> = container.get().unwrap();
/// let database: Svc<Database> = container.get().unwrap();
/// assert!(Svc::ptr_eq(&users.database, &database));
/// ```
#[macro_export]
macro_rules! injectable {
    ($service:ty = $constructor:expr) => {
        impl $crate::Resolve for $service {
            fn instantiate(
                invocation: &$crate::Invocation<'_>,
            ) -> $crate::InjectResult<$crate::Svc<Self>> {
                invocation.construct($constructor)
            }
        }
    };
    ($service:ty) => {
        $crate::injectable!(
            $service = <$service as ::std::default::Default>::default
        );
    };
}

macro_rules! impl_resolve_value {
    ($($type:ty),* $(,)?) => {
        $(impl Resolve for $type {})*
    };
}

impl_resolve_value!(
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
