//! Value coercion
//!
//! Converts what the repository holds into the declared return type of a
//! method. A missing resource or property is `Null`, never an error.
//!
//! ## Properties
//!
//! | Stored       | Declared            | Result                                |
//! |--------------|---------------------|---------------------------------------|
//! | single       | scalar              | converted value                       |
//! | single       | array / list        | one-element sequence                  |
//! | multi        | array / list        | element-wise conversion               |
//! | multi        | scalar              | per [`MultiValuePolicy`]              |
//! | any          | `Any`               | stored value untouched                |
//! | any          | anything else       | [`ProxyError::Coercion`]              |
//!
//! ## References and children
//!
//! References return the resource handle (`Resource`, `Any`) or a proxy
//! over it (`Proxy`). Children return each child as a resource or a proxy,
//! depending on the annotation's element type; a missing parent yields an
//! empty collection.

use serde::Deserialize;

use resproxy_sdk::{PropertyValue, ResourceRef, Scalar, ScalarKind};

use crate::error::{ProxyError, ProxyResult};
use crate::handler::ResourceProxy;
use crate::types::{ElementType, ReturnType};
use crate::value::ProxyValue;

/// What a scalar getter does with a multi-valued property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiValuePolicy {
    /// Fail with a coercion error
    #[default]
    Reject,
    /// Return the first element (`Null` if there is none)
    First,
}

fn coercion(method: &str, reason: impl Into<String>) -> ProxyError {
    ProxyError::Coercion {
        method: method.to_string(),
        reason: reason.into(),
    }
}

fn convert(method: &str, value: &Scalar, kind: ScalarKind) -> ProxyResult<Scalar> {
    value
        .convert(kind)
        .map_err(|e| coercion(method, e.to_string()))
}

fn convert_all(method: &str, values: &[Scalar], kind: ScalarKind) -> ProxyResult<Vec<Scalar>> {
    values.iter().map(|v| convert(method, v, kind)).collect()
}

/// Coerce a stored property to the declared return type.
///
/// The return type is checked before the value, so an unsupported type
/// fails the same way whether or not the property exists.
pub fn coerce_property(
    method: &str,
    value: Option<&PropertyValue>,
    return_type: &ReturnType,
    policy: MultiValuePolicy,
) -> ProxyResult<ProxyValue> {
    if !return_type.is_property_type() {
        return Err(coercion(
            method,
            format!("{} is not a supported property return type", return_type),
        ));
    }

    let Some(value) = value else {
        return Ok(ProxyValue::Null);
    };
    let Some(kind) = return_type.scalar_kind() else {
        return Ok(ProxyValue::Raw(value.clone()));
    };

    match return_type {
        ReturnType::Array(_) => Ok(ProxyValue::Array(convert_all(method, value.values(), kind)?)),
        ReturnType::List(_) => Ok(ProxyValue::List(convert_all(method, value.values(), kind)?)),
        _ => {
            let single = if value.is_multiple() {
                match policy {
                    MultiValuePolicy::Reject => {
                        return Err(coercion(
                            method,
                            format!(
                                "multi-valued property cannot be returned as {}",
                                return_type
                            ),
                        ))
                    }
                    MultiValuePolicy::First => match value.values().first() {
                        Some(first) => first,
                        None => return Ok(ProxyValue::Null),
                    },
                }
            } else {
                match value.values().first() {
                    Some(v) => v,
                    None => return Ok(ProxyValue::Null),
                }
            };
            Ok(ProxyValue::Scalar(convert(method, single, kind)?))
        }
    }
}

/// Coerce a referenced resource to the declared return type
pub fn coerce_reference<F>(
    method: &str,
    resource: Option<ResourceRef>,
    return_type: &ReturnType,
    make_proxy: F,
) -> ProxyResult<ProxyValue>
where
    F: FnOnce(ResourceRef, &str) -> ProxyResult<ResourceProxy>,
{
    if !return_type.is_reference_type() {
        return Err(coercion(
            method,
            format!("{} is not a supported reference return type", return_type),
        ));
    }

    let Some(resource) = resource else {
        return Ok(ProxyValue::Null);
    };

    match return_type {
        ReturnType::Proxy(interface) => Ok(ProxyValue::Proxy(make_proxy(resource, interface)?)),
        _ => Ok(ProxyValue::Resource(resource)),
    }
}

/// Wrap each child as the annotation's element type
pub fn coerce_children<F>(
    children: Vec<ResourceRef>,
    element: &ElementType,
    mut make_proxy: F,
) -> ProxyResult<ProxyValue>
where
    F: FnMut(ResourceRef, &str) -> ProxyResult<ResourceProxy>,
{
    let items = match element {
        ElementType::Resource => children.into_iter().map(ProxyValue::Resource).collect(),
        ElementType::Proxy(interface) => children
            .into_iter()
            .map(|child| make_proxy(child, interface).map(ProxyValue::Proxy))
            .collect::<ProxyResult<Vec<_>>>()?,
    };
    Ok(ProxyValue::Children(items))
}
