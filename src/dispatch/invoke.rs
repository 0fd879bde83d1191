use crate::{AnyValue, InjectResult, Inject, Invocation, Parameter};
use std::marker::PhantomData;

/// Names a callable and its parameters for diagnostics and name-based
/// resolution.
#[derive(Clone, Copy, Debug)]
pub struct Signature {
    owner: &'static str,
    names: &'static [&'static str],
}

impl Signature {
    /// A signature for `owner` whose parameters are named `names`, in order.
    #[must_use]
    pub fn new(owner: &'static str, names: &'static [&'static str]) -> Self {
        Signature { owner, names }
    }

    /// An anonymous signature named after the type of the callable.
    #[must_use]
    pub fn of<F: ?Sized>() -> Self {
        Signature::new(std::any::type_name::<F>(), &[])
    }

    #[must_use]
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// The name of the parameter at `position`, if it has one.
    #[must_use]
    pub fn name_of(&self, position: usize) -> Option<&'static str> {
        self.names.get(position).copied()
    }
}

/// A callable whose parameters a container can supply. All functions of
/// arity 12 or less are automatically invokable if each of their parameters
/// implements [`Inject`].
///
/// ## Type parameters
/// * `D` - Tuple of the callable's parameter types.
///
/// ## Example
///
/// ```
/// use runtime_container::{Container, Svc};
///
/// fn greet(name: Option<String>) -> String {
///     format!("hello, {}", name.as_deref().unwrap_or("world"))
/// }
///
/// let container = Container::new();
/// assert_eq!("hello, world", container.call(greet).unwrap());
/// ```
pub trait Invoke<D>: Send + Sync + 'static {
    /// The value produced by invoking the callable.
    type Output: 'static;

    /// Describes the callable. By default, parameters are anonymous and can
    /// only be resolved by position, type or service.
    fn signature(&self) -> Signature {
        Signature::of::<Self>()
    }

    /// Resolves each parameter in declaration order, then calls the callable.
    /// Resolution stops at the first parameter that fails.
    fn invoke_as(
        &self,
        invocation: &Invocation<'_>,
        signature: &Signature,
    ) -> InjectResult<Self::Output>;

    fn invoke(&self, invocation: &Invocation<'_>) -> InjectResult<Self::Output> {
        self.invoke_as(invocation, &self.signature())
    }
}

macro_rules! impl_invoke {
    () => {
        impl_invoke!(@impl ());
    };
    ($first:ident $(, $rest:ident)*) => {
        impl_invoke!(@impl ($first $(, $rest)*));
        impl_invoke!($($rest),*);
    };
    (@impl ($($type_name:ident),*)) => {
        impl<F, R $(, $type_name)*> Invoke<($($type_name,)*)> for F
        where
            F: Fn($($type_name),*) -> R + Send + Sync + 'static,
            R: 'static,
            $($type_name: Inject,)*
        {
            type Output = R;

            #[allow(unused_variables, unused_mut, unused_assignments, non_snake_case)]
            fn invoke_as(
                &self,
                invocation: &Invocation<'_>,
                signature: &Signature,
            ) -> InjectResult<R> {
                let mut position = 0;
                $(
                    let $type_name: $type_name = invocation
                        .resolve(&Parameter::of::<$type_name>(position, signature))?;
                    position += 1;
                )*
                Ok(self($($type_name),*))
            }
        }
    };
}

impl_invoke!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);

/// Attaches parameter names to a callable so resolvers can match on them.
///
/// ## Example
///
/// ```
/// use runtime_container::{Container, Named, Resolvers};
///
/// let container = Container::new();
/// let area = Named::new(|width: u32, height: u32| width * height, &["width", "height"])
///     .owner("area");
/// let resolvers = Resolvers::new().named("width", 3u32).named("height", 4u32);
/// assert_eq!(12, container.call_with(area, &resolvers).unwrap());
/// ```
pub struct Named<F> {
    inner: F,
    signature: Signature,
}

impl<F> Named<F> {
    #[must_use]
    pub fn new(inner: F, names: &'static [&'static str]) -> Self {
        Named {
            inner,
            signature: Signature::new(std::any::type_name::<F>(), names),
        }
    }

    /// Sets the name reported for the callable in errors.
    #[must_use]
    pub fn owner(mut self, owner: &'static str) -> Self {
        self.signature = Signature::new(owner, self.signature.names);
        self
    }
}

impl<D, F: Invoke<D>> Invoke<D> for Named<F> {
    type Output = F::Output;

    fn signature(&self) -> Signature {
        self.signature
    }

    fn invoke_as(
        &self,
        invocation: &Invocation<'_>,
        signature: &Signature,
    ) -> InjectResult<Self::Output> {
        self.inner.invoke_as(invocation, signature)
    }
}

/// A type-erased invokable, used where callables cross object-safe
/// boundaries such as [`Dispatcher`](crate::Dispatcher).
pub trait Callable: Send + Sync {
    fn signature(&self) -> Signature;

    /// Invokes the callable, returning its boxed output.
    fn call(&self, invocation: &Invocation<'_>) -> InjectResult<AnyValue>;
}

/// Adapts any [`Invoke`] into a [`Callable`].
pub struct Erased<D, F> {
    inner: F,
    marker: PhantomData<fn() -> D>,
}

impl<D, F: Invoke<D>> Erased<D, F> {
    #[must_use]
    pub fn new(inner: F) -> Self {
        Erased {
            inner,
            marker: PhantomData,
        }
    }
}

impl<D, F> Callable for Erased<D, F>
where
    F: Invoke<D>,
    F::Output: Send,
{
    fn signature(&self) -> Signature {
        self.inner.signature()
    }

    fn call(&self, invocation: &Invocation<'_>) -> InjectResult<AnyValue> {
        self.inner
            .invoke(invocation)
            .map(|output| Box::new(output) as AnyValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_names_by_position() {
        let signature = Signature::new("connect", &["host", "port"]);
        assert_eq!(Some("port"), signature.name_of(1));
        assert_eq!(None, signature.name_of(2));
        assert_eq!(None, Signature::of::<fn()>().name_of(0));
    }

    #[test]
    fn named_keeps_names_when_renamed() {
        let named = Named::new(|port: u16| port, &["port"]).owner("listen");
        let signature = Invoke::signature(&named);
        assert_eq!("listen", signature.owner());
        assert_eq!(Some("port"), signature.name_of(0));
    }
}
