//! resproxy SDK - the repository contract
//!
//! This crate holds the types a content store has to speak to be usable as
//! a proxy backend, without depending on the dispatch engine:
//!
//! - **Values**: [`Scalar`], [`PropertyValue`] and [`ValueMap`]
//! - **Resources**: the [`Resource`] and [`ResourceResolver`] traits
//! - **Conversion**: [`FromScalar`] typed extraction
//! - **Paths**: absolute/relative path helpers ([`path`])
//! - **Memory store**: [`MemoryRepository`], an in-memory resolver
//!
//! # Example
//!
//! ```ignore
//! use resproxy_sdk::{MemoryRepository, PropertyValue, ValueMap};
//!
//! let repo = MemoryRepository::new();
//! let page = repo.add("/content/test", ValueMap::new().with("title", "Hello"))?;
//! assert_eq!(page.value_map().get("title"), Some(&PropertyValue::from("Hello")));
//! ```

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod memory;
pub mod path;
pub mod resource;
pub mod value;

pub use convert::FromScalar;
pub use error::{RepoResult, RepositoryError};
pub use memory::MemoryRepository;
pub use resource::{Resource, ResourceRef, ResourceResolver};
pub use value::{PropertyValue, Scalar, ScalarKind, ValueMap};
