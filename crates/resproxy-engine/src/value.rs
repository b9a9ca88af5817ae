//! Invocation arguments and results
//!
//! [`ProxyValue`] is what a dispatched call returns. [`FromProxyValue`]
//! turns it into a Rust value for typed façades:
//!
//! | Rust type                   | Accepted values                          |
//! |-----------------------------|------------------------------------------|
//! | `String`                    | string scalar, `toString()` result       |
//! | `i64` / `i32` / `f64`       | matching scalar, `hashCode()` as `i32`   |
//! | `bool`                      | boolean scalar, `equals()` result        |
//! | `Vec<String>`, `Vec<i64>`.. | array or list                            |
//! | `ResourceRef`               | resource                                 |
//! | `ResourceProxy`             | proxy                                    |
//! | `Vec<ResourceRef>` ..       | children                                 |
//! | `Option<T>`                 | `Null` as `None`, anything else as `T`   |

use std::fmt;
use std::sync::Arc;

use resproxy_sdk::{FromScalar, PropertyValue, ResourceRef, Scalar, ScalarKind};

use crate::handler::ResourceProxy;

/// Result of a proxy invocation
#[derive(Clone)]
pub enum ProxyValue {
    /// Missing resource or property
    Null,
    /// One converted value
    Scalar(Scalar),
    /// Array of converted values
    Array(Vec<Scalar>),
    /// List of converted values
    List(Vec<Scalar>),
    /// Stored value, unconverted
    Raw(PropertyValue),
    /// Repository resource
    Resource(ResourceRef),
    /// Proxy over another resource
    Proxy(ResourceProxy),
    /// Children, each a `Resource` or a `Proxy`
    Children(Vec<ProxyValue>),
    /// `equals()` result
    Bool(bool),
    /// `hashCode()` result
    Int(i32),
    /// `toString()` result
    Str(String),
}

impl ProxyValue {
    /// Short name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            ProxyValue::Null => "null",
            ProxyValue::Scalar(_) => "scalar",
            ProxyValue::Array(_) => "array",
            ProxyValue::List(_) => "list",
            ProxyValue::Raw(_) => "raw value",
            ProxyValue::Resource(_) => "resource",
            ProxyValue::Proxy(_) => "proxy",
            ProxyValue::Children(_) => "children",
            ProxyValue::Bool(_) => "bool",
            ProxyValue::Int(_) => "int",
            ProxyValue::Str(_) => "string",
        }
    }

    /// Check for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, ProxyValue::Null)
    }

    /// Scalar payload, if any
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ProxyValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Array or list payload, if any
    pub fn as_sequence(&self) -> Option<&[Scalar]> {
        match self {
            ProxyValue::Array(items) | ProxyValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Resource payload, if any
    pub fn as_resource(&self) -> Option<&ResourceRef> {
        match self {
            ProxyValue::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Proxy payload, if any
    pub fn as_proxy(&self) -> Option<&ResourceProxy> {
        match self {
            ProxyValue::Proxy(p) => Some(p),
            _ => None,
        }
    }

    /// Children payload, if any
    pub fn as_children(&self) -> Option<&[ProxyValue]> {
        match self {
            ProxyValue::Children(items) => Some(items),
            _ => None,
        }
    }
}

impl PartialEq for ProxyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ProxyValue::Null, ProxyValue::Null) => true,
            (ProxyValue::Scalar(a), ProxyValue::Scalar(b)) => a == b,
            (ProxyValue::Array(a), ProxyValue::Array(b)) => a == b,
            (ProxyValue::List(a), ProxyValue::List(b)) => a == b,
            (ProxyValue::Raw(a), ProxyValue::Raw(b)) => a == b,
            (ProxyValue::Resource(a), ProxyValue::Resource(b)) => {
                Arc::ptr_eq(a, b) || a.path() == b.path()
            }
            (ProxyValue::Proxy(a), ProxyValue::Proxy(b)) => a == b,
            (ProxyValue::Children(a), ProxyValue::Children(b)) => a == b,
            (ProxyValue::Bool(a), ProxyValue::Bool(b)) => a == b,
            (ProxyValue::Int(a), ProxyValue::Int(b)) => a == b,
            (ProxyValue::Str(a), ProxyValue::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for ProxyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyValue::Null => write!(f, "Null"),
            ProxyValue::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            ProxyValue::Array(items) => f.debug_tuple("Array").field(items).finish(),
            ProxyValue::List(items) => f.debug_tuple("List").field(items).finish(),
            ProxyValue::Raw(v) => f.debug_tuple("Raw").field(v).finish(),
            ProxyValue::Resource(r) => f.debug_tuple("Resource").field(&r.path()).finish(),
            ProxyValue::Proxy(p) => f.debug_tuple("Proxy").field(&p.to_string()).finish(),
            ProxyValue::Children(items) => f.debug_tuple("Children").field(items).finish(),
            ProxyValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            ProxyValue::Int(i) => f.debug_tuple("Int").field(i).finish(),
            ProxyValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
        }
    }
}

impl From<Scalar> for ProxyValue {
    fn from(s: Scalar) -> Self {
        ProxyValue::Scalar(s)
    }
}

impl From<ResourceRef> for ProxyValue {
    fn from(r: ResourceRef) -> Self {
        ProxyValue::Resource(r)
    }
}

impl From<ResourceProxy> for ProxyValue {
    fn from(p: ResourceProxy) -> Self {
        ProxyValue::Proxy(p)
    }
}

/// Argument passed to [`ResourceProxy::invoke`]
#[derive(Debug, Clone)]
pub enum InvokeArg {
    /// Null argument
    Null,
    /// Plain value
    Value(Scalar),
    /// Another proxy
    Proxy(ResourceProxy),
}

impl From<Scalar> for InvokeArg {
    fn from(s: Scalar) -> Self {
        InvokeArg::Value(s)
    }
}

impl From<ResourceProxy> for InvokeArg {
    fn from(p: ResourceProxy) -> Self {
        InvokeArg::Proxy(p)
    }
}

impl From<&ResourceProxy> for InvokeArg {
    fn from(p: &ResourceProxy) -> Self {
        InvokeArg::Proxy(p.clone())
    }
}

/// Extract a Rust value from a [`ProxyValue`]
pub trait FromProxyValue: Sized {
    /// `None` if the value has the wrong shape
    fn from_proxy_value(value: ProxyValue) -> Option<Self>;
}

impl FromProxyValue for ProxyValue {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        Some(value)
    }
}

impl<T: FromProxyValue> FromProxyValue for Option<T> {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        match value {
            ProxyValue::Null => Some(None),
            other => T::from_proxy_value(other).map(Some),
        }
    }
}

// Values arrive already converted to the declared kind; ints are stored as longs.
fn scalar_as<T: FromScalar>(value: &Scalar) -> Option<T> {
    let expected = match T::KIND {
        ScalarKind::Int => ScalarKind::Long,
        kind => kind,
    };
    if value.kind() != expected {
        return None;
    }
    T::from_scalar(value).ok()
}

fn sequence_as<T: FromScalar>(value: ProxyValue) -> Option<Vec<T>> {
    match value {
        ProxyValue::Array(items) | ProxyValue::List(items) => {
            items.iter().map(scalar_as).collect()
        }
        _ => None,
    }
}

impl FromProxyValue for String {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        match value {
            ProxyValue::Scalar(s) => scalar_as(&s),
            ProxyValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl FromProxyValue for i64 {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        match value {
            ProxyValue::Scalar(s) => scalar_as(&s),
            ProxyValue::Int(i) => Some(i64::from(i)),
            _ => None,
        }
    }
}

impl FromProxyValue for i32 {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        match value {
            ProxyValue::Scalar(s) => scalar_as(&s),
            ProxyValue::Int(i) => Some(i),
            _ => None,
        }
    }
}

impl FromProxyValue for f64 {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        match value {
            ProxyValue::Scalar(s) => scalar_as(&s),
            _ => None,
        }
    }
}

impl FromProxyValue for bool {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        match value {
            ProxyValue::Scalar(s) => scalar_as(&s),
            ProxyValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

macro_rules! impl_sequence {
    ($($ty:ty),*) => {
        $(
            impl FromProxyValue for Vec<$ty> {
                fn from_proxy_value(value: ProxyValue) -> Option<Self> {
                    sequence_as(value)
                }
            }
        )*
    };
}

impl_sequence!(String, i64, i32, f64, bool);

impl FromProxyValue for ResourceRef {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        match value {
            ProxyValue::Resource(r) => Some(r),
            _ => None,
        }
    }
}

impl FromProxyValue for ResourceProxy {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        match value {
            ProxyValue::Proxy(p) => Some(p),
            _ => None,
        }
    }
}

impl FromProxyValue for Vec<ResourceRef> {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        match value {
            ProxyValue::Children(items) => {
                items.into_iter().map(ResourceRef::from_proxy_value).collect()
            }
            _ => None,
        }
    }
}

impl FromProxyValue for Vec<ResourceProxy> {
    fn from_proxy_value(value: ProxyValue) -> Option<Self> {
        match value {
            ProxyValue::Children(items) => {
                items.into_iter().map(ResourceProxy::from_proxy_value).collect()
            }
            _ => None,
        }
    }
}
