//! Interface definitions and registry
//!
//! An [`InterfaceDef`] is the runtime description of a proxy-facing
//! interface: its name, the interfaces it extends, and its methods with
//! their annotations. The [`InterfaceRegistry`] resolves inheritance into
//! the flat method set a proxy answers to.
//!
//! Two interfaces are always present:
//! - [`OBJECT_INTERFACE`] implicitly declares `equals`, `hashCode` and
//!   `toString` for every interface.
//! - [`RESOURCE_BACKED_INTERFACE`] declares `getBackingResource`; extend it
//!   to expose the backing resource.

use std::collections::BTreeSet;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::annotations::{
    Annotation, ChildrenAnnotation, PropertyAnnotation, ReferenceAnnotation,
};
use crate::error::{ProxyError, ProxyResult};
use crate::types::{ElementType, ReturnType};

/// Root interface declaring the identity methods
pub const OBJECT_INTERFACE: &str = "Object";

/// Built-in interface declaring `getBackingResource`
pub const RESOURCE_BACKED_INTERFACE: &str = "ResourceBacked";

/// Name of the backing-resource accessor
pub const BACKING_RESOURCE_METHOD: &str = "getBackingResource";

/// One interface method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Number of parameters
    pub arity: usize,
    /// Declared return type
    pub return_type: ReturnType,
    /// Data annotation, if any
    pub annotation: Option<Annotation>,
}

impl MethodDef {
    /// Create a method without annotation
    pub fn new(name: impl Into<String>, arity: usize, return_type: ReturnType) -> Self {
        Self {
            name: name.into(),
            arity,
            return_type,
            annotation: None,
        }
    }

    /// Attach an annotation
    pub fn with_annotation(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }
}

/// A method together with the interface that declares it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredMethod {
    /// Declaring interface name
    pub declaring: String,
    /// The method
    pub method: MethodDef,
}

/// Runtime description of a proxy interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDef {
    /// Interface name
    pub name: String,
    /// Directly extended interfaces
    pub extends: Vec<String>,
    /// Methods declared on this interface
    pub methods: Vec<MethodDef>,
}

impl InterfaceDef {
    /// Start building an interface
    pub fn builder(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder {
            def: InterfaceDef {
                name: name.into(),
                extends: Vec::new(),
                methods: Vec::new(),
            },
        }
    }

    /// Find a method declared directly on this interface
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Builder for [`InterfaceDef`]
#[derive(Debug, Clone)]
pub struct InterfaceBuilder {
    def: InterfaceDef,
}

impl InterfaceBuilder {
    /// Extend another interface
    pub fn extends(mut self, name: impl Into<String>) -> Self {
        self.def.extends.push(name.into());
        self
    }

    /// Getter mapped to a property of the backing resource
    pub fn property(self, method: &str, return_type: ReturnType, name: &str) -> Self {
        self.method(
            MethodDef::new(method, 0, return_type).with_annotation(PropertyAnnotation::named(name)),
        )
    }

    /// Getter mapped to a property of another node
    pub fn property_at(
        self,
        method: &str,
        return_type: ReturnType,
        path: &str,
        name: &str,
    ) -> Self {
        self.method(
            MethodDef::new(method, 0, return_type).with_annotation(PropertyAnnotation::at(path, name)),
        )
    }

    /// Unannotated getter; the property name comes from the method name
    pub fn getter(self, method: &str, return_type: ReturnType) -> Self {
        self.method(MethodDef::new(method, 0, return_type))
    }

    /// Getter returning the resource at `path`
    pub fn reference(self, method: &str, return_type: ReturnType, path: &str) -> Self {
        self.method(MethodDef::new(method, 0, return_type).with_annotation(ReferenceAnnotation {
            path: path.to_string(),
        }))
    }

    /// Getter returning the children of the resource at `path`
    pub fn children(self, method: &str, path: &str, element: ElementType) -> Self {
        self.method(
            MethodDef::new(method, 0, ReturnType::Children).with_annotation(ChildrenAnnotation {
                path: path.to_string(),
                element,
            }),
        )
    }

    /// Add an arbitrary method
    pub fn method(mut self, method: MethodDef) -> Self {
        self.def.methods.push(method);
        self
    }

    /// Finish the definition
    pub fn build(self) -> InterfaceDef {
        self.def
    }
}

/// Identity methods every proxy answers to
pub fn identity_methods() -> [MethodDef; 3] {
    [
        MethodDef::new("equals", 1, ReturnType::BOOLEAN),
        MethodDef::new("hashCode", 0, ReturnType::INT),
        MethodDef::new("toString", 0, ReturnType::STRING),
    ]
}

/// Registry of interface definitions
#[derive(Debug, Clone)]
pub struct InterfaceRegistry {
    /// Definitions indexed by interface name
    interfaces: FxHashMap<String, Arc<InterfaceDef>>,
}

impl InterfaceRegistry {
    /// Create a registry holding the built-in interfaces
    pub fn new() -> Self {
        let mut registry = Self {
            interfaces: FxHashMap::default(),
        };
        registry.register(
            InterfaceDef::builder(RESOURCE_BACKED_INTERFACE)
                .method(MethodDef::new(BACKING_RESOURCE_METHOD, 0, ReturnType::Resource))
                .build(),
        );
        registry
    }

    /// Register (or replace) an interface
    pub fn register(&mut self, def: InterfaceDef) {
        self.interfaces.insert(def.name.clone(), Arc::new(def));
    }

    /// Builder-style register
    pub fn with(mut self, def: InterfaceDef) -> Self {
        self.register(def);
        self
    }

    /// Get an interface by name
    pub fn get(&self, name: &str) -> Option<&Arc<InterfaceDef>> {
        self.interfaces.get(name)
    }

    /// Check if an interface is registered
    pub fn contains(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    /// Number of registered interfaces, built-ins included
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Flattened method set of an interface.
    ///
    /// Methods of the interface itself come first, then inherited ones in
    /// declaration order of `extends` (depth-first). A method name declared
    /// closer to the interface hides the same name further up. Identity
    /// methods declared on [`OBJECT_INTERFACE`] come last unless redeclared.
    pub fn methods(&self, name: &str) -> ProxyResult<Vec<DeclaredMethod>> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut stack = Vec::new();
        self.collect_methods(name, &mut seen, &mut out, &mut stack)?;

        for method in identity_methods() {
            if seen.insert(method.name.clone()) {
                out.push(DeclaredMethod {
                    declaring: OBJECT_INTERFACE.to_string(),
                    method,
                });
            }
        }
        Ok(out)
    }

    fn collect_methods(
        &self,
        name: &str,
        seen: &mut FxHashSet<String>,
        out: &mut Vec<DeclaredMethod>,
        stack: &mut Vec<String>,
    ) -> ProxyResult<()> {
        if stack.iter().any(|s| s == name) {
            stack.push(name.to_string());
            return Err(ProxyError::Configuration(format!(
                "Cyclic interface inheritance: {}",
                stack.join(" -> ")
            )));
        }
        let def = self
            .get(name)
            .ok_or_else(|| ProxyError::UnknownInterface(name.to_string()))?;

        stack.push(name.to_string());
        for method in &def.methods {
            if seen.insert(method.name.clone()) {
                out.push(DeclaredMethod {
                    declaring: def.name.clone(),
                    method: method.clone(),
                });
            }
        }
        for parent in &def.extends {
            self.collect_methods(parent, seen, out, stack)?;
        }
        stack.pop();
        Ok(())
    }

    /// The interface and all its ancestors, sorted by name.
    /// [`OBJECT_INTERFACE`] is not included.
    pub fn implemented_interfaces(&self, name: &str) -> ProxyResult<Vec<String>> {
        let mut found = BTreeSet::new();
        let mut pending = vec![name.to_string()];
        while let Some(current) = pending.pop() {
            if !found.insert(current.clone()) {
                continue;
            }
            let def = self
                .get(&current)
                .ok_or_else(|| ProxyError::UnknownInterface(current.clone()))?;
            pending.extend(def.extends.iter().cloned());
        }
        Ok(found.into_iter().collect())
    }
}

impl Default for InterfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
