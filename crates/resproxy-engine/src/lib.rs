//! resproxy engine - typed proxies over repository resources
//!
//! Interfaces whose methods carry property, reference or children
//! annotations are bound at runtime to a repository node. Each call on the
//! resulting [`ResourceProxy`] is classified, routed and answered from the
//! node's data:
//!
//! - **Interfaces**: [`InterfaceDef`] definitions in an [`InterfaceRegistry`]
//! - **Classification**: [`classify`] turns methods into [`MethodDescriptor`]s
//! - **Paths**: [`path`] resolves absolute, relative and empty paths
//! - **Coercion**: [`coerce`] converts stored values to declared return types
//! - **Identity**: [`identity`] provides `equals`, `hashCode` and `toString`
//! - **Deny lists**: [`DenyList`] blocks methods by declaring interface
//! - **Dispatch**: [`InvocationHandler`] with its per-proxy value cache
//! - **Factory**: [`ProxyFactory`] creates proxies and typed façades
//!
//! # Example
//!
//! ```ignore
//! use resproxy_engine::{InterfaceDef, InterfaceRegistry, ProxyFactory, ReturnType};
//! use resproxy_sdk::{MemoryRepository, ValueMap};
//!
//! let repo = MemoryRepository::new();
//! let page = repo.add("/content/test", ValueMap::new().with("title", "Hello"))?;
//!
//! let registry = InterfaceRegistry::new().with(
//!     InterfaceDef::builder("Page")
//!         .getter("getTitle", ReturnType::STRING)
//!         .build(),
//! );
//! let proxy = ProxyFactory::new(registry).new_instance(page, "Page")?;
//! assert_eq!(proxy.call::<String>("getTitle")?, "Hello");
//! assert_eq!(proxy.to_string(), "Page[/content/test]");
//! ```

#![warn(missing_docs)]

pub mod annotations;
pub mod classify;
pub mod coerce;
pub mod config;
pub mod deny;
pub mod error;
pub mod factory;
pub mod handler;
pub mod identity;
pub mod interface;
pub mod path;
pub mod types;
pub mod value;

pub use annotations::{Annotation, ChildrenAnnotation, PropertyAnnotation, ReferenceAnnotation};
pub use classify::{DescriptorTable, IdentityMethod, MethodDescriptor, MethodKind};
pub use coerce::MultiValuePolicy;
pub use config::ProxyConfig;
pub use deny::DenyList;
pub use error::{ConfigError, ProxyError, ProxyResult};
pub use factory::{ProxyFactory, ProxyInterface};
pub use handler::{InvocationHandler, ResourceProxy};
pub use interface::{
    DeclaredMethod, InterfaceDef, InterfaceRegistry, MethodDef, BACKING_RESOURCE_METHOD,
    OBJECT_INTERFACE, RESOURCE_BACKED_INTERFACE,
};
pub use types::{ElementType, ReturnType};
pub use value::{FromProxyValue, InvokeArg, ProxyValue};
