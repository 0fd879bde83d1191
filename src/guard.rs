//! Thread-local bookkeeping of the services currently being resolved.

use crate::{InjectError, InjectResult, ServiceKey};
use std::{cell::RefCell, marker::PhantomData};

thread_local! {
    // Services currently being resolved on this thread, outermost first.
    static RESOLVING: RefCell<Vec<Frame>> = RefCell::new(Vec::new());
}

/// What a container is doing with a key.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Phase {
    /// Resolving a registered definition.
    Resolve,

    /// Constructing a type directly.
    Construct,

    /// Running the builder of one particular definition.
    Build,
}

#[derive(Clone, Debug)]
struct Frame {
    owner: usize,
    phase: Phase,
    key: ServiceKey,
}

/// An RAII guard that marks a key as being resolved by a container.
///
/// Entering a frame that is already on this thread's stack means the key
/// transitively depends on itself, and is reported as
/// [`InjectError::CircularDependency`] instead of recursing. The frame is
/// popped again when the guard is dropped, including during unwinding.
pub(crate) struct ResolutionGuard {
    // Frames belong to the thread that pushed them.
    _not_send: PhantomData<*const ()>,
}

impl ResolutionGuard {
    pub(crate) fn enter(
        owner: usize,
        phase: Phase,
        key: &ServiceKey,
    ) -> InjectResult<Self> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            let repeated = stack.iter().position(|frame| {
                frame.owner == owner && frame.phase == phase && frame.key == *key
            });

            if let Some(start) = repeated {
                let mut cycle: Vec<ServiceKey> =
                    stack[start..].iter().map(|frame| frame.key.clone()).collect();
                cycle.dedup();
                cycle.push(key.clone());
                return Err(InjectError::CircularDependency {
                    key: key.clone(),
                    cycle,
                });
            }

            stack.push(Frame {
                owner,
                phase,
                key: key.clone(),
            });
            Ok(ResolutionGuard {
                _not_send: PhantomData,
            })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// The keys being resolved on this thread, outermost first.
pub(crate) fn current_path() -> Vec<ServiceKey> {
    RESOLVING.with(|stack| {
        let mut path: Vec<ServiceKey> =
            stack.borrow().iter().map(|frame| frame.key.clone()).collect();
        path.dedup();
        path
    })
}
