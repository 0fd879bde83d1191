mod error;
mod interface;
mod key;
mod service;

pub use error::*;
pub use interface::*;
pub use key::*;
pub use service::*;
