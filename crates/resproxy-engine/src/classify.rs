//! Method classification
//!
//! Every interface method is classified exactly once, when the interface's
//! [`DescriptorTable`] is compiled. Invocations then only look up a
//! descriptor and `match` on its [`MethodKind`].
//!
//! ## Precedence
//!
//! 1. `equals`, `hashCode`, `toString` are identity methods
//! 2. `getBackingResource()` returns the backing resource
//! 3. reference annotation
//! 4. children annotation
//! 5. property annotation, or an unannotated getter-shaped method
//! 6. anything else is unsupported
//!
//! The deny list is not part of classification: deny lists belong to a
//! proxy while descriptor tables are shared per interface. [`route`] applies
//! it ahead of every kind at call time.
//!
//! ## Property names
//!
//! Unannotated getters (and property annotations with an empty name) use
//! the JavaBean name of the method:
//!
//! | Method          | Property    |
//! |-----------------|-------------|
//! | `getTitle`      | `title`     |
//! | `isHidden`      | `hidden`    |
//! | `getURL`        | `URL`       |
//! | `getJcr_title`  | `jcr:title` |

use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::annotations::Annotation;
use crate::deny::DenyList;
use crate::error::{ProxyError, ProxyResult};
use crate::interface::{DeclaredMethod, InterfaceRegistry, BACKING_RESOURCE_METHOD};
use crate::path::{compound_key, split_property};
use crate::types::{ElementType, ReturnType};

/// The three identity methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityMethod {
    /// `equals(other)`
    Equals,
    /// `hashCode()`
    HashCode,
    /// `toString()`
    ToString,
}

impl IdentityMethod {
    /// Identity method with this name, if any
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "equals" => Some(IdentityMethod::Equals),
            "hashCode" => Some(IdentityMethod::HashCode),
            "toString" => Some(IdentityMethod::ToString),
            _ => None,
        }
    }

    /// Method name
    pub fn name(&self) -> &'static str {
        match self {
            IdentityMethod::Equals => "equals",
            IdentityMethod::HashCode => "hashCode",
            IdentityMethod::ToString => "toString",
        }
    }
}

/// Classification of one method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodKind {
    /// Reads a stored property
    Property,
    /// Lists the children of a resource
    Children(ElementType),
    /// Returns another resource
    Reference,
    /// Returns the backing resource
    BackingResource,
    /// `equals` / `hashCode` / `toString`
    Identity(IdentityMethod),
    /// Not dispatchable
    Unsupported,
}

impl MethodKind {
    /// Check if the kind reads repository data
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            MethodKind::Property
                | MethodKind::Children(_)
                | MethodKind::Reference
                | MethodKind::BackingResource
        )
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodKind::Property => write!(f, "property"),
            MethodKind::Children(element) => write!(f, "children<{}>", element),
            MethodKind::Reference => write!(f, "reference"),
            MethodKind::BackingResource => write!(f, "backing-resource"),
            MethodKind::Identity(id) => write!(f, "identity({})", id.name()),
            MethodKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Resolved, classified form of one interface method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Method name
    pub method: String,
    /// Declaring interface
    pub declaring: String,
    /// Classification
    pub kind: MethodKind,
    /// Node path; `None` means the backing resource
    pub path: Option<String>,
    /// Property name (empty for non-property kinds)
    pub name: String,
    /// Declared return type
    pub return_type: ReturnType,
    /// Declared parameter count
    pub arity: usize,
    /// Value cache key
    pub cache_key: String,
}

/// Check if a method looks like a JavaBean getter: no parameters and
/// `getXxx` / `isXxx` where the character after the prefix is uppercase or
/// `_`.
pub fn is_getter_shaped(name: &str, arity: usize) -> bool {
    arity == 0 && bean_suffix(name).is_some()
}

fn bean_suffix(name: &str) -> Option<&str> {
    let rest = name
        .strip_prefix("get")
        .or_else(|| name.strip_prefix("is"))?;
    match rest.chars().next() {
        Some(c) if c.is_uppercase() || c == '_' => Some(rest),
        _ => None,
    }
}

/// JavaBean property name of a getter-shaped method name, with `_` mapped
/// to `:`
pub fn bean_property_name(name: &str) -> Option<String> {
    let rest = bean_suffix(name)?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    let second_upper = chars.next().is_some_and(char::is_uppercase);

    let decapitalized = if first.is_uppercase() && second_upper {
        rest.to_string()
    } else {
        let mut s: String = first.to_lowercase().collect();
        s.push_str(&rest[first.len_utf8()..]);
        s
    };
    Some(decapitalized.replace('_', ":"))
}

fn non_empty(path: &str) -> Option<String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Classify one declared method.
///
/// Annotated methods must take no parameters; an annotation on a method
/// with parameters is a [`ProxyError::Configuration`].
pub fn classify(declared: &DeclaredMethod) -> ProxyResult<MethodDescriptor> {
    let method = &declared.method;
    let mut descriptor = MethodDescriptor {
        method: method.name.clone(),
        declaring: declared.declaring.clone(),
        kind: MethodKind::Unsupported,
        path: None,
        name: String::new(),
        return_type: method.return_type.clone(),
        arity: method.arity,
        cache_key: String::new(),
    };

    if let Some(identity) = IdentityMethod::from_name(&method.name) {
        descriptor.kind = MethodKind::Identity(identity);
        return Ok(descriptor);
    }

    if method.name == BACKING_RESOURCE_METHOD && method.arity == 0 {
        descriptor.kind = MethodKind::BackingResource;
        return Ok(descriptor);
    }

    if let Some(annotation) = &method.annotation {
        if method.arity > 0 {
            return Err(ProxyError::Configuration(format!(
                "{} annotation on {}.{} requires a method without parameters, found {}",
                annotation.kind_name(),
                declared.declaring,
                method.name,
                method.arity
            )));
        }
    }

    match &method.annotation {
        Some(Annotation::Reference(reference)) => {
            descriptor.kind = MethodKind::Reference;
            descriptor.path = non_empty(&reference.path);
            descriptor.cache_key = format!("{}()", method.name);
        }
        Some(Annotation::Children(children)) => {
            descriptor.kind = MethodKind::Children(children.element.clone());
            descriptor.path = non_empty(&children.path);
            descriptor.cache_key = format!("{}()", method.name);
        }
        Some(Annotation::Property(property)) => {
            let name = match property.name.trim() {
                "" => bean_property_name(&method.name)
                    .ok_or_else(|| no_property_name(declared))?,
                name => name.to_string(),
            };
            set_property(&mut descriptor, non_empty(&property.path), &name, declared)?;
        }
        None if is_getter_shaped(&method.name, method.arity) => {
            let name =
                bean_property_name(&method.name).ok_or_else(|| no_property_name(declared))?;
            set_property(&mut descriptor, None, &name, declared)?;
        }
        None => {}
    }

    Ok(descriptor)
}

fn set_property(
    descriptor: &mut MethodDescriptor,
    path: Option<String>,
    name: &str,
    declared: &DeclaredMethod,
) -> ProxyResult<()> {
    let (path, name) = split_property(path, name);
    if name.is_empty() {
        return Err(no_property_name(declared));
    }
    descriptor.kind = MethodKind::Property;
    descriptor.cache_key = compound_key(path.as_deref(), &name);
    descriptor.path = path;
    descriptor.name = name;
    Ok(())
}

fn no_property_name(declared: &DeclaredMethod) -> ProxyError {
    ProxyError::Configuration(format!(
        "Could not determine property name of {}.{} from its annotation or JavaBean name",
        declared.declaring, declared.method.name
    ))
}

/// Descriptors of every method an interface answers to
#[derive(Debug, Clone)]
pub struct DescriptorTable {
    /// Interface the table was compiled for
    interface: String,
    /// The interface and its ancestors, sorted by name
    interfaces: Vec<String>,
    /// Descriptors indexed by method name
    descriptors: FxHashMap<String, Arc<MethodDescriptor>>,
}

impl DescriptorTable {
    /// Classify every method of `interface`.
    ///
    /// Fails if the interface is unknown, its inheritance is cyclic or a
    /// method cannot be classified. Property getters reading the same
    /// compound key with different return types get their return type
    /// appended to the cache key.
    pub fn compile(registry: &InterfaceRegistry, interface: &str) -> ProxyResult<Self> {
        let methods = registry.methods(interface)?;
        let interfaces = registry.implemented_interfaces(interface)?;

        let mut classified = methods
            .iter()
            .map(classify)
            .collect::<ProxyResult<Vec<_>>>()?;

        let mut return_types: FxHashMap<&str, FxHashSet<&ReturnType>> = FxHashMap::default();
        for descriptor in &classified {
            if descriptor.kind == MethodKind::Property {
                return_types
                    .entry(descriptor.cache_key.as_str())
                    .or_default()
                    .insert(&descriptor.return_type);
            }
        }
        let shared: FxHashSet<String> = return_types
            .into_iter()
            .filter(|(_, types)| types.len() > 1)
            .map(|(key, _)| key.to_string())
            .collect();

        for descriptor in &mut classified {
            if descriptor.kind == MethodKind::Property && shared.contains(&descriptor.cache_key) {
                descriptor.cache_key =
                    format!("{}#{}", descriptor.cache_key, descriptor.return_type);
            }
        }

        let descriptors = classified
            .into_iter()
            .map(|d| (d.method.clone(), Arc::new(d)))
            .collect();

        Ok(Self {
            interface: interface.to_string(),
            interfaces,
            descriptors,
        })
    }

    /// Interface name
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Implemented interfaces, sorted by name
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Descriptor for a method name
    pub fn lookup(&self, method: &str) -> Option<&MethodDescriptor> {
        self.descriptors.get(method).map(Arc::as_ref)
    }

    /// Iterate over all descriptors (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.descriptors.values().map(Arc::as_ref)
    }

    /// Number of methods
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Call-time route of one descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// Identity method
    Identity(IdentityMethod),
    /// Repository read (or backing resource)
    Data(&'a MethodDescriptor),
    /// Not dispatchable
    Unsupported,
}

/// Route a call. The deny list wins over every classification and fails
/// with [`ProxyError::DeniedInvocation`].
pub fn route<'a>(descriptor: &'a MethodDescriptor, deny: &DenyList) -> ProxyResult<Dispatch<'a>> {
    deny.check(&descriptor.method, &descriptor.declaring)?;
    Ok(match &descriptor.kind {
        MethodKind::Identity(id) => Dispatch::Identity(*id),
        MethodKind::Unsupported => Dispatch::Unsupported,
        _ => Dispatch::Data(descriptor),
    })
}
