//! Dependency Injection
//!
//! Builds the application's use cases from a loaded [`Config`](crate::config::Config).

mod container;

pub use container::Container;
