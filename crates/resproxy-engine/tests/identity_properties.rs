//! Property-based tests for proxy identity and dispatch
//!
//! 1. **Independent proxies agree**: same resource and interface give equal
//!    `hashCode()` and mutual `equals()`
//! 2. **Interfaces separate**: distinct interfaces over one resource give
//!    different hashes
//! 3. **Reads are cached**: repeated property reads hit the repository once
//! 4. **Deny wins**: a denied declaring interface always fails
//! 5. **Policy**: multi-valued through a scalar getter rejects or takes the
//!    first element

use proptest::prelude::*;

use resproxy_engine::identity::string_hash;
use resproxy_engine::{
    DenyList, InterfaceDef, InterfaceRegistry, MultiValuePolicy, ProxyConfig, ProxyError,
    ProxyFactory, ProxyValue, ReturnType, OBJECT_INTERFACE,
};
use resproxy_sdk::{MemoryRepository, PropertyValue, ValueMap};

// ============================================================================
// Generators
// ============================================================================

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_:]{0,8}"
}

fn resource_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|segments| format!("/{}", segments.join("/")))
}

fn interface_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z]{0,10}"
}

const METHODS: &[&str] = &["getTitle", "hashCode", "toString", "getBackingResource", "setTitle"];

fn registry_for(names: &[&str]) -> InterfaceRegistry {
    names.iter().fold(InterfaceRegistry::new(), |registry, name| {
        registry.with(
            InterfaceDef::builder(*name)
                .getter("getTitle", ReturnType::STRING)
                .getter("setTitle", ReturnType::Void)
                .build(),
        )
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn independent_proxies_agree(path in resource_path(), iface in interface_name()) {
        let repo = MemoryRepository::new();
        let resource = repo.add(&path, ValueMap::new()).unwrap();

        let a = ProxyFactory::new(registry_for(&[iface.as_str()]))
            .new_instance(resource.clone(), &iface)
            .unwrap();
        let b = ProxyFactory::new(registry_for(&[iface.as_str()]))
            .new_instance(resource, &iface)
            .unwrap();

        prop_assert_eq!(a.call::<i32>("hashCode").unwrap(), b.call::<i32>("hashCode").unwrap());
        prop_assert_eq!(a.invoke("equals", &[(&b).into()]).unwrap(), ProxyValue::Bool(true));
        prop_assert_eq!(b.invoke("equals", &[(&a).into()]).unwrap(), ProxyValue::Bool(true));
    }

    #[test]
    fn distinct_interfaces_hash_differently(
        path in resource_path(),
        first in interface_name(),
        second in interface_name(),
    ) {
        prop_assume!(string_hash(&first) != string_hash(&second));
        let repo = MemoryRepository::new();
        let resource = repo.add(&path, ValueMap::new()).unwrap();
        let factory = ProxyFactory::new(registry_for(&[first.as_str(), second.as_str()]));

        let a = factory.new_instance(resource.clone(), &first).unwrap();
        let b = factory.new_instance(resource, &second).unwrap();
        prop_assert_ne!(a.hash_code(), b.hash_code());
        prop_assert_ne!(a, b);
    }

    #[test]
    fn property_read_once(path in resource_path(), title in "[ -~]{0,20}", calls in 2usize..6) {
        let repo = MemoryRepository::new();
        let resource = repo.add(&path, ValueMap::new().with("title", title.as_str())).unwrap();
        let proxy = ProxyFactory::new(registry_for(&["Page"]))
            .new_instance(resource, "Page")
            .unwrap();

        repo.reset_reads();
        prop_assert_eq!(proxy.call::<String>("getTitle").unwrap(), title.clone());
        let reads = repo.read_count();
        for _ in 1..calls {
            prop_assert_eq!(proxy.call::<String>("getTitle").unwrap(), title.clone());
        }
        prop_assert_eq!(repo.read_count(), reads);
    }

    #[test]
    fn denied_interface_always_fails(
        method in prop::sample::select(METHODS),
        deny_object in any::<bool>(),
    ) {
        let repo = MemoryRepository::new();
        let resource = repo.add("/content/test", ValueMap::new().with("title", "Hello")).unwrap();
        let denied = if deny_object { OBJECT_INTERFACE } else { "Page" };
        let proxy = ProxyFactory::new(registry_for(&["Page"]))
            .new_instance_with_deny(resource, "Page", &DenyList::from_patterns([denied]))
            .unwrap();

        let declaring = match method {
            "hashCode" | "toString" => OBJECT_INTERFACE,
            "getBackingResource" => "ResourceBacked",
            _ => "Page",
        };
        let result = proxy.invoke(method, &[]);
        if declaring == denied {
            prop_assert_eq!(
                result.unwrap_err(),
                ProxyError::DeniedInvocation {
                    method: method.to_string(),
                    interface: denied.to_string(),
                }
            );
        } else {
            let denied_err = matches!(result, Err(ProxyError::DeniedInvocation { .. }));
            prop_assert!(!denied_err);
        }
    }

    #[test]
    fn multi_value_policy(values in prop::collection::vec("[a-z]{1,6}", 1..5), first in any::<bool>()) {
        let repo = MemoryRepository::new();
        let resource = repo
            .add("/content/test", ValueMap::new().with("title", PropertyValue::multi(values.clone())))
            .unwrap();
        let policy = if first { MultiValuePolicy::First } else { MultiValuePolicy::Reject };
        let config = ProxyConfig { multi_value_policy: policy, ..ProxyConfig::default() };
        let proxy = ProxyFactory::with_config(registry_for(&["Page"]), config)
            .new_instance(resource, "Page")
            .unwrap();

        let result = proxy.call::<String>("getTitle");
        match policy {
            MultiValuePolicy::First => prop_assert_eq!(result.unwrap(), values[0].clone()),
            MultiValuePolicy::Reject => {
                let is_coercion = matches!(result, Err(ProxyError::Coercion { .. }));
                prop_assert!(is_coercion);
            }
        }
    }
}
