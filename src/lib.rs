//! Runtime service container.
//!
//! A [`Container`] maps [`ServiceKey`]s to [`Definition`]s. Each definition
//! has a [`Lifecycle`] that decides how long the services it produces live:
//!
//! - Instance: A pre-built value is returned as-is.
//! - Singleton: The service is built the first time it is requested and that
//!   single instance is reused for each future request.
//! - Weak singleton: The service is shared for as long as something else
//!   holds on to it, and rebuilt on the next request once it has been
//!   dropped.
//! - Factory: A new service is built each time it is requested.
//!
//! # Auto-wiring
//!
//! Requesting a type that nothing defines makes the container build it
//! directly. Types opt into this by implementing [`Resolve`], usually through
//! the [`injectable!`] macro. Each parameter of a constructor, factory or
//! any other callable the container invokes is resolved by a chain of
//! [`ValueResolver`]s. By default the chain asks the container for
//! parameters that are services, and callers can supply extra resolvers to
//! fill in plain values by name, position or type.
//!
//! # Interfaces
//!
//! Services can be requested through trait objects. The [`interface!`]
//! macro declares which types implement a trait, and
//! [`Registered::bind`] makes the trait resolve to a particular definition.
//!
//! # Hierarchies
//!
//! A container can have a parent. Anything the parent has is resolved by the
//! parent, so a child can add definitions but never shadow its parent's.
//!
//! # Example
//!
//! ```
//! use runtime_container::{injectable, interface, Container, Svc};
//! use std::error::Error;
//!
//! // Some type that represents a user
//! struct User;
//!
//! // This is our interface. The services depending on it don't care what the
//! // concrete type is.
//! trait DataService: Send + Sync {
//!     fn get_user(&self, user_id: &str) -> Option<User>;
//! }
//!
//! #[derive(Default)]
//! struct SqlDataService;
//! impl DataService for SqlDataService {
//!     fn get_user(&self, _user_id: &str) -> Option<User> { todo!() }
//! }
//!
//! // ... Or we can mock out the data service entirely!
//! #[derive(Default)]
//! struct MockDataService;
//! impl DataService for MockDataService {
//!     fn get_user(&self, _user_id: &str) -> Option<User> { Some(User) }
//! }
//!
//! // Declare which types may be bound to the DataService interface.
//! interface!(DataService = [SqlDataService, MockDataService]);
//! injectable!(SqlDataService);
//! injectable!(MockDataService);
//!
//! struct UserService {
//!     data_service: Svc<dyn DataService>,
//! }
//!
//! impl UserService {
//!     // This is just a normal constructor. Each parameter is resolved by
//!     // the container when the service is built.
//!     pub fn new(data_service: Svc<dyn DataService>) -> Self {
//!         UserService { data_service }
//!     }
//!
//!     pub fn get_user(&self, user_id: &str) -> Option<User> {
//!         self.data_service.get_user(user_id)
//!     }
//! }
//!
//! injectable!(UserService = UserService::new);
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let container = Container::new();
//!
//!     // Let's choose to use the MockDataService as our data service
//!     container.singleton::<MockDataService>()?.bind::<dyn DataService>()?;
//!     container.singleton::<UserService>()?;
//!
//!     let user_service: Svc<UserService> = container.get()?;
//!     assert!(user_service.get_user("john").is_some());
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value
)]

mod builder;
mod container;
mod contracts;
mod definition;
mod dispatch;
mod guard;
mod inject;
mod instantiator;
mod iter;
mod module;
mod registry;
mod resolvers;
mod services;

pub use builder::*;
pub use container::*;
pub use contracts::*;
pub use definition::*;
pub use dispatch::*;
pub use inject::*;
pub use instantiator::*;
pub use iter::*;
pub use module::*;
pub use resolvers::*;
pub use services::*;
