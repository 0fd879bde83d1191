mod chain;
mod container;
mod parameter;
mod values;

pub use chain::*;
pub use container::*;
pub use parameter::*;
pub use values::*;
