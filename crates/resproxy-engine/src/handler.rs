//! Invocation handler
//!
//! Every call on a [`ResourceProxy`] goes through [`InvocationHandler`]:
//!
//! ```text
//! Idle -> Classified -> Denied           -> DeniedInvocation
//!                    -> IdentityDispatch -> equals / hashCode / toString
//!                    -> DataDispatch     -> cache hit, or resolve + coerce + store
//! ```
//!
//! Resolved values are cached per proxy under the descriptor's cache key.
//! Clones of a proxy share one handler and therefore one cache. The cache
//! lock is never held across repository reads.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use resproxy_sdk::ResourceRef;

use crate::classify::{
    route, DescriptorTable, Dispatch, IdentityMethod, MethodDescriptor, MethodKind,
};
use crate::coerce::{self, MultiValuePolicy};
use crate::deny::DenyList;
use crate::error::{ProxyError, ProxyResult};
use crate::factory::ProxyFactory;
use crate::identity;
use crate::path;
use crate::value::{FromProxyValue, InvokeArg, ProxyValue};

/// Dispatch state of one proxy
pub struct InvocationHandler {
    /// Backing resource
    resource: ResourceRef,
    /// Descriptors of the proxy interface
    table: Arc<DescriptorTable>,
    /// Denied declaring interfaces
    deny: DenyList,
    /// Whether resolved values are cached
    cache_enabled: bool,
    /// Multi-valued property through a scalar getter
    policy: MultiValuePolicy,
    /// Factory used for reference and child proxies
    factory: ProxyFactory,
    /// Resolved values by cache key
    cache: Mutex<FxHashMap<String, ProxyValue>>,
}

impl InvocationHandler {
    pub(crate) fn new(
        resource: ResourceRef,
        table: Arc<DescriptorTable>,
        deny: DenyList,
        factory: ProxyFactory,
    ) -> Self {
        let cache_enabled = factory.config().cache;
        let policy = factory.config().multi_value_policy;
        Self {
            cache_enabled,
            policy,
            resource,
            table,
            deny,
            factory,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// Dispatch one call
    pub fn invoke(&self, method: &str, args: &[InvokeArg]) -> ProxyResult<ProxyValue> {
        trace!(
            interface = self.table.interface(),
            method,
            path = self.resource.path(),
            "invoke"
        );

        let descriptor = self
            .table
            .lookup(method)
            .ok_or_else(|| self.unsupported(method))?;

        let dispatch = route(descriptor, &self.deny).inspect_err(|_| {
            debug!(
                interface = %descriptor.declaring,
                method,
                path = self.resource.path(),
                "invocation denied"
            );
        })?;

        match dispatch {
            Dispatch::Unsupported => Err(self.unsupported(method)),
            Dispatch::Identity(id) => self.invoke_identity(id, args),
            Dispatch::Data(descriptor) => {
                if !args.is_empty() {
                    return Err(ProxyError::Argument(format!(
                        "Method '{}' takes no arguments, got {}",
                        method,
                        args.len()
                    )));
                }
                self.invoke_data(descriptor)
            }
        }
    }

    fn unsupported(&self, method: &str) -> ProxyError {
        ProxyError::UnsupportedMethod {
            method: method.to_string(),
            interface: self.table.interface().to_string(),
        }
    }

    fn invoke_identity(&self, id: IdentityMethod, args: &[InvokeArg]) -> ProxyResult<ProxyValue> {
        match id {
            IdentityMethod::Equals => {
                let [other] = args else {
                    return Err(ProxyError::Argument(format!(
                        "Method 'equals' requires exactly 1 argument, got {}",
                        args.len()
                    )));
                };
                let equal = match other {
                    InvokeArg::Proxy(other) => self.same_identity(&other.handler),
                    _ => false,
                };
                Ok(ProxyValue::Bool(equal))
            }
            IdentityMethod::HashCode | IdentityMethod::ToString if !args.is_empty() => {
                Err(ProxyError::Argument(format!(
                    "Method '{}' takes no arguments, got {}",
                    id.name(),
                    args.len()
                )))
            }
            IdentityMethod::HashCode => Ok(ProxyValue::Int(self.hash_code())),
            IdentityMethod::ToString => Ok(ProxyValue::Str(self.display_name())),
        }
    }

    fn invoke_data(&self, descriptor: &MethodDescriptor) -> ProxyResult<ProxyValue> {
        if descriptor.kind == MethodKind::BackingResource {
            return Ok(ProxyValue::Resource(self.resource.clone()));
        }

        if self.cache_enabled {
            let cached = self.cache.lock().get(&descriptor.cache_key).cloned();
            if let Some(value) = cached {
                trace!(method = %descriptor.method, key = %descriptor.cache_key, "cache hit");
                return Ok(value);
            }
        }

        let value = self.resolve(descriptor).inspect_err(|e| {
            debug!(
                interface = self.table.interface(),
                method = %descriptor.method,
                path = self.resource.path(),
                error = %e,
                "dispatch failed"
            );
        })?;

        if self.cache_enabled {
            self.cache
                .lock()
                .insert(descriptor.cache_key.clone(), value.clone());
        }
        Ok(value)
    }

    fn resolve(&self, descriptor: &MethodDescriptor) -> ProxyResult<ProxyValue> {
        let target = path::locate(&self.resource, descriptor.path.as_deref());

        match &descriptor.kind {
            MethodKind::Property => coerce::coerce_property(
                &descriptor.method,
                target
                    .as_ref()
                    .and_then(|node| node.value_map().get(&descriptor.name)),
                &descriptor.return_type,
                self.policy,
            ),
            MethodKind::Reference => coerce::coerce_reference(
                &descriptor.method,
                target,
                &descriptor.return_type,
                |resource, interface| self.child_proxy(resource, interface),
            ),
            MethodKind::Children(element) => {
                let children = match target {
                    Some(parent) => parent.resolver().list_children(parent.path()),
                    None => Vec::new(),
                };
                coerce::coerce_children(children, element, |resource, interface| {
                    self.child_proxy(resource, interface)
                })
            }
            MethodKind::BackingResource => Ok(ProxyValue::Resource(self.resource.clone())),
            MethodKind::Identity(_) | MethodKind::Unsupported => {
                Err(self.unsupported(&descriptor.method))
            }
        }
    }

    fn child_proxy(&self, resource: ResourceRef, interface: &str) -> ProxyResult<ResourceProxy> {
        self.factory.instance(resource, interface, self.deny.clone())
    }

    fn same_identity(&self, other: &InvocationHandler) -> bool {
        identity::proxy_equals(
            self.table.interfaces(),
            self.resource.path(),
            other.table.interfaces(),
            other.resource.path(),
        )
    }

    fn hash_code(&self) -> i32 {
        identity::proxy_hash(self.table.interfaces(), self.resource.path())
    }

    fn display_name(&self) -> String {
        identity::proxy_to_string(self.table.interface(), self.resource.path())
    }

    /// Number of cached values
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

/// A resource seen through an interface.
///
/// Cheap to clone; clones share one handler and one value cache. The Rust
/// `PartialEq`, `Hash` and `Display` impls follow `equals`, `hashCode` and
/// `toString` but are not subject to the deny list.
#[derive(Clone)]
pub struct ResourceProxy {
    handler: Arc<InvocationHandler>,
}

impl ResourceProxy {
    pub(crate) fn new(handler: InvocationHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Invoke a method by name
    pub fn invoke(&self, method: &str, args: &[InvokeArg]) -> ProxyResult<ProxyValue> {
        self.handler.invoke(method, args)
    }

    /// Invoke a no-argument method and extract the result as `T`
    pub fn call<T: FromProxyValue>(&self, method: &str) -> ProxyResult<T> {
        let value = self.invoke(method, &[])?;
        let kind = value.kind_name();
        T::from_proxy_value(value).ok_or_else(|| ProxyError::Coercion {
            method: method.to_string(),
            reason: format!("cannot return {} as {}", kind, std::any::type_name::<T>()),
        })
    }

    /// Proxy interface name
    pub fn interface_name(&self) -> &str {
        self.handler.table.interface()
    }

    /// Implemented interfaces, sorted by name
    pub fn interfaces(&self) -> &[String] {
        self.handler.table.interfaces()
    }

    /// Backing resource path
    pub fn path(&self) -> &str {
        self.handler.resource.path()
    }

    /// Backing resource
    pub fn backing_resource(&self) -> &ResourceRef {
        &self.handler.resource
    }

    /// Deny list attached at creation
    pub fn deny_list(&self) -> &DenyList {
        &self.handler.deny
    }

    /// `hashCode()` without the deny gate
    pub fn hash_code(&self) -> i32 {
        self.handler.hash_code()
    }

    /// Number of cached values
    pub fn cached_len(&self) -> usize {
        self.handler.cached_len()
    }
}

impl PartialEq for ResourceProxy {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler) || self.handler.same_identity(&other.handler)
    }
}

impl Eq for ResourceProxy {}

impl Hash for ResourceProxy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for ResourceProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.handler.display_name())
    }
}

impl fmt::Debug for ResourceProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceProxy")
            .field("interface", &self.interface_name())
            .field("path", &self.path())
            .field("deny", &self.handler.deny)
            .finish()
    }
}
