use crate::{
    Container, ContainerServiceResolver, Resolvers, ValueResolver, WeakContainer,
};

/// What happens when a key that already has a definition is defined again.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RebindPolicy {
    /// The new definition always replaces the old one. Replacing a singleton
    /// that has already produced its service logs a warning, since holders
    /// of the old service keep it.
    #[default]
    Replace,

    /// Replacing a definition that has already produced a cached service is
    /// an error.
    RejectResolved,
}

/// Settings shared by every handle to a container.
#[derive(Clone, Debug)]
pub struct ContainerOptions {
    pub rebind: RebindPolicy,

    /// Whether the container's resolver chain starts with a
    /// [`ContainerServiceResolver`].
    pub default_resolvers: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        ContainerOptions {
            rebind: RebindPolicy::default(),
            default_resolvers: true,
        }
    }
}

/// A builder for a [`Container`].
///
/// # Example
///
/// ```
/// use runtime_container::{Container, RebindPolicy};
///
/// let parent = Container::new();
///
/// let mut builder = Container::builder();
/// builder.parent(&parent);
/// builder.rebind(RebindPolicy::RejectResolved);
///
/// let child = builder.build();
/// assert!(child.parent().is_some());
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    options: ContainerOptions,
    parent: Option<WeakContainer>,
    resolvers: Resolvers,
}

impl ContainerBuilder {
    /// Makes the container delegate to `parent` for everything the parent
    /// has. Only a weak reference to the parent is kept.
    pub fn parent(&mut self, parent: &Container) {
        self.parent = Some(parent.downgrade());
    }

    /// Sets how redefinitions are handled.
    pub fn rebind(&mut self, policy: RebindPolicy) {
        self.options.rebind = policy;
    }

    /// Appends a resolver to the container's resolver chain.
    pub fn resolver<R: ValueResolver>(&mut self, resolver: R) {
        self.resolvers.push(resolver);
    }

    /// Leaves [`ContainerServiceResolver`] out of the resolver chain, so
    /// services are only injected by resolvers added explicitly.
    pub fn without_default_resolvers(&mut self) {
        self.options.default_resolvers = false;
    }

    #[must_use]
    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// Builds the container.
    #[must_use]
    pub fn build(self) -> Container {
        let mut resolvers = Resolvers::new();
        if self.options.default_resolvers {
            resolvers.push(ContainerServiceResolver);
        }
        resolvers.extend(self.resolvers);

        Container::from_parts(self.options, self.parent, resolvers)
    }
}
