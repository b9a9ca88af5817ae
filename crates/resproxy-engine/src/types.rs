//! Declared return types of proxy methods

use std::fmt;

use resproxy_sdk::ScalarKind;

/// Element type of a children collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Raw repository resources
    Resource,
    /// Proxies of the named interface, one per child
    Proxy(String),
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Resource => write!(f, "Resource"),
            ElementType::Proxy(name) => write!(f, "{}", name),
        }
    }
}

/// Return type declared by an interface method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    /// No return value
    Void,

    /// One converted value: `string`, `long`, ...
    Scalar(ScalarKind),

    /// Array of converted values: `string[]`
    Array(ScalarKind),

    /// List of converted values: `List<string>`
    List(ScalarKind),

    /// Stored value as-is, no conversion
    Any,

    /// Repository resource handle
    Resource,

    /// Proxy of the named interface
    Proxy(String),

    /// Iterator over child nodes; the element type comes from the children
    /// annotation
    Children,
}

impl ReturnType {
    /// Shorthand for `Scalar(ScalarKind::String)`
    pub const STRING: ReturnType = ReturnType::Scalar(ScalarKind::String);
    /// Shorthand for `Scalar(ScalarKind::Long)`
    pub const LONG: ReturnType = ReturnType::Scalar(ScalarKind::Long);
    /// Shorthand for `Scalar(ScalarKind::Int)`
    pub const INT: ReturnType = ReturnType::Scalar(ScalarKind::Int);
    /// Shorthand for `Scalar(ScalarKind::Double)`
    pub const DOUBLE: ReturnType = ReturnType::Scalar(ScalarKind::Double);
    /// Shorthand for `Scalar(ScalarKind::Boolean)`
    pub const BOOLEAN: ReturnType = ReturnType::Scalar(ScalarKind::Boolean);

    /// Proxy return type for an interface name
    pub fn proxy(interface: impl Into<String>) -> Self {
        ReturnType::Proxy(interface.into())
    }

    /// Scalar kind for scalar, array and list types
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            ReturnType::Scalar(k) | ReturnType::Array(k) | ReturnType::List(k) => Some(*k),
            _ => None,
        }
    }

    /// Check if a stored property can be returned as this type
    pub fn is_property_type(&self) -> bool {
        *self == ReturnType::Any || self.scalar_kind().is_some()
    }

    /// Check if a referenced resource can be returned as this type
    pub fn is_reference_type(&self) -> bool {
        matches!(
            self,
            ReturnType::Resource | ReturnType::Any | ReturnType::Proxy(_)
        )
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => write!(f, "void"),
            ReturnType::Scalar(k) => write!(f, "{}", k),
            ReturnType::Array(k) => write!(f, "{}[]", k),
            ReturnType::List(k) => write!(f, "List<{}>", k),
            ReturnType::Any => write!(f, "any"),
            ReturnType::Resource => write!(f, "Resource"),
            ReturnType::Proxy(name) => write!(f, "{}", name),
            ReturnType::Children => write!(f, "Iterator"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_type_display() {
        assert_eq!(ReturnType::STRING.to_string(), "string");
        assert_eq!(ReturnType::Array(ScalarKind::Long).to_string(), "long[]");
        assert_eq!(ReturnType::List(ScalarKind::Boolean).to_string(), "List<boolean>");
        assert_eq!(ReturnType::proxy("Page").to_string(), "Page");
        assert_eq!(ReturnType::Void.to_string(), "void");
    }

    #[test]
    fn test_return_type_queries() {
        assert!(ReturnType::List(ScalarKind::String).is_property_type());
        assert!(ReturnType::Any.is_property_type());
        assert!(!ReturnType::Resource.is_property_type());
        assert!(!ReturnType::Children.is_property_type());
        assert!(ReturnType::proxy("Page").is_reference_type());
        assert!(!ReturnType::STRING.is_reference_type());
        assert_eq!(ReturnType::Array(ScalarKind::Double).scalar_kind(), Some(ScalarKind::Double));
        assert_eq!(ReturnType::Resource.scalar_kind(), None);
    }
}
