use crate::{AnyValue, Container, InjectResult, Parameter, Resolvers, ValueResolver};
use tracing::trace;

/// Resolves parameters that ask for a service by fetching that service from
/// the container.
///
/// Parameters whose service the container doesn't have and cannot build are
/// declined so later resolvers or the parameter's fallback can take over.
/// Any other failure, such as one of the service's own dependencies being
/// unresolvable, is returned as-is.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContainerServiceResolver;

impl ValueResolver for ContainerServiceResolver {
    fn resolve(
        &self,
        parameter: &Parameter,
        container: &Container,
    ) -> InjectResult<Option<AnyValue>> {
        let key = match parameter.service() {
            Some(key) => key,
            None => return Ok(None),
        };

        match container.resolve_key(key, &Resolvers::new()) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_missing(key) => {
                trace!(key = %key, %parameter, "service unavailable for parameter");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}
