//! Proxy factory
//!
//! Binds a backing resource to an interface. Descriptor tables are compiled
//! once per interface and shared by every proxy the factory hands out, so
//! configuration errors surface at the first `new_instance` for an
//! interface.
//!
//! # Example
//!
//! ```ignore
//! let registry = InterfaceRegistry::new().with(
//!     InterfaceDef::builder("Page")
//!         .getter("getTitle", ReturnType::STRING)
//!         .build(),
//! );
//! let factory = ProxyFactory::new(registry);
//! let page = factory.new_instance(resource, "Page")?;
//! let title: Option<String> = page.call("getTitle")?;
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use resproxy_sdk::ResourceRef;

use crate::classify::DescriptorTable;
use crate::config::ProxyConfig;
use crate::deny::DenyList;
use crate::error::ProxyResult;
use crate::handler::{InvocationHandler, ResourceProxy};
use crate::interface::{InterfaceDef, InterfaceRegistry};

/// A Rust type standing for one proxy interface
pub trait ProxyInterface: Sized {
    /// Interface name
    const NAME: &'static str;

    /// Interface definition, registered on first use
    fn definition() -> InterfaceDef;

    /// Wrap a proxy of this interface
    fn from_proxy(proxy: ResourceProxy) -> Self;
}

struct FactoryInner {
    registry: RwLock<InterfaceRegistry>,
    tables: RwLock<FxHashMap<String, Arc<DescriptorTable>>>,
    config: ProxyConfig,
    deny: DenyList,
}

/// Creates [`ResourceProxy`] instances. Cloning shares registry, compiled
/// tables and configuration.
#[derive(Clone)]
pub struct ProxyFactory {
    inner: Arc<FactoryInner>,
}

impl ProxyFactory {
    /// Factory with the default configuration
    pub fn new(registry: InterfaceRegistry) -> Self {
        Self::with_config(registry, ProxyConfig::default())
    }

    /// Factory with an explicit configuration
    pub fn with_config(registry: InterfaceRegistry, config: ProxyConfig) -> Self {
        let deny = config.deny_list();
        Self {
            inner: Arc::new(FactoryInner {
                registry: RwLock::new(registry),
                tables: RwLock::new(FxHashMap::default()),
                config,
                deny,
            }),
        }
    }

    /// Factory configuration
    pub fn config(&self) -> &ProxyConfig {
        &self.inner.config
    }

    /// Register (or replace) an interface. Compiled tables are dropped
    /// since any of them may inherit from it.
    pub fn register(&self, def: InterfaceDef) {
        let mut registry = self.inner.registry.write();
        registry.register(def);
        self.inner.tables.write().clear();
    }

    /// Check if an interface is registered
    pub fn is_registered(&self, interface: &str) -> bool {
        self.inner.registry.read().contains(interface)
    }

    /// Proxy over `resource` implementing `interface`
    pub fn new_instance(&self, resource: ResourceRef, interface: &str) -> ProxyResult<ResourceProxy> {
        self.instance(resource, interface, self.inner.deny.clone())
    }

    /// Proxy whose methods declared on a denied interface always fail
    pub fn new_instance_with_deny(
        &self,
        resource: ResourceRef,
        interface: &str,
        deny: &DenyList,
    ) -> ProxyResult<ResourceProxy> {
        self.instance(resource, interface, self.inner.deny.merge(deny))
    }

    /// Typed façade over `resource`
    pub fn proxy<T: ProxyInterface>(&self, resource: ResourceRef) -> ProxyResult<T> {
        if !self.is_registered(T::NAME) {
            self.register(T::definition());
        }
        self.new_instance(resource, T::NAME).map(T::from_proxy)
    }

    /// Compiled descriptor table of an interface. The registry read lock is
    /// held until the table is stored.
    pub fn table(&self, interface: &str) -> ProxyResult<Arc<DescriptorTable>> {
        if let Some(table) = self.inner.tables.read().get(interface) {
            return Ok(table.clone());
        }

        let registry = self.inner.registry.read();
        let compiled = Arc::new(DescriptorTable::compile(&registry, interface)?);
        let mut tables = self.inner.tables.write();
        let table = tables
            .entry(interface.to_string())
            .or_insert_with(|| {
                debug!(interface, methods = compiled.len(), "compiled descriptor table");
                compiled
            })
            .clone();
        Ok(table)
    }

    pub(crate) fn instance(
        &self,
        resource: ResourceRef,
        interface: &str,
        deny: DenyList,
    ) -> ProxyResult<ResourceProxy> {
        let table = self.table(interface)?;
        Ok(ResourceProxy::new(InvocationHandler::new(
            resource,
            table,
            deny,
            self.clone(),
        )))
    }
}
