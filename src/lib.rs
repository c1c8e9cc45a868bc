//! Resolve a runnable `protoc` from a literal path, the system `PATH`, a URL,
//! or a Maven repository coordinate.
//!
//! Each source is a [`resolver::Resolver`]. Absence is `Ok(None)` so a
//! [`resolver::ResolverChain`] can move on to the next source; any
//! [`error::ResolutionError`] stops the chain.

pub mod cache;
pub mod error;
pub mod platform;
pub mod reference;
pub mod repository;
pub mod resolver;
pub mod url_fetch;

pub use error::{ErrorKind, ResolutionError};
pub use reference::{ArtifactCoordinate, ResourceReference};
pub use resolver::{Resolver, ResolverChain};
