use crate::{ErasedDefinition, ServiceKey, Svc};
use std::vec::IntoIter;

/// An iterator over a snapshot of a container's definitions, in the order
/// their keys were first defined.
///
/// Definitions added to the container after the snapshot was taken are not
/// included.
pub struct Definitions {
    inner: IntoIter<(ServiceKey, Svc<dyn ErasedDefinition>)>,
}

impl Definitions {
    pub(crate) fn new(
        entries: Vec<(ServiceKey, Svc<dyn ErasedDefinition>)>,
    ) -> Self {
        Definitions {
            inner: entries.into_iter(),
        }
    }
}

impl Iterator for Definitions {
    type Item = (ServiceKey, Svc<dyn ErasedDefinition>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Definitions {}

#[cfg(test)]
mod tests {
    use crate::{Container, Lifecycle, ServiceKey};

    #[test]
    fn snapshot_ignores_later_definitions() {
        let container = Container::new();
        let definitions = container.definitions();
        let before = definitions.len();

        container.instance(1u8).unwrap();
        assert_eq!(before, definitions.count());
        assert_eq!(before + 1, container.definitions().len());
    }

    #[test]
    fn entries_expose_lifecycle() {
        let container = Container::new();
        container.instance(1u8).unwrap();

        let (key, definition) = container.definitions().last().unwrap();
        assert_eq!(ServiceKey::of::<u8>(), key);
        assert_eq!(Lifecycle::Instance, definition.lifecycle());
    }
}
