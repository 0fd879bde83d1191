mod invocation;
mod invoke;

pub use invocation::*;
pub use invoke::*;
