pub mod nav_errors;
pub mod nav_model;
pub mod nav_resolver;
pub mod nav_traits;

pub use nav_errors::NavError;
pub use nav_model::NavEntry;
pub use nav_resolver::{NavResolver, RetryPolicy};
pub use nav_traits::{NavResolverTrait, NavStoreTrait};
