//! Method annotations
//!
//! Each interface method carries at most one annotation telling the engine
//! where its data lives:
//!
//! | Annotation  | Fields               | Result                                |
//! |-------------|----------------------|---------------------------------------|
//! | `Property`  | `name`, `path`       | value of one property                 |
//! | `Reference` | `path`               | the resource at `path`                |
//! | `Children`  | `path`, `element`    | children of the resource at `path`    |
//!
//! Paths starting with `/` are absolute, other non-empty paths are relative
//! to the backing resource, and an empty path means the backing resource
//! itself. Surrounding whitespace is ignored.

use crate::types::ElementType;

/// Maps a method to a stored property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyAnnotation {
    /// Property name; empty means "derive from the method name"
    pub name: String,
    /// Node holding the property; empty means the backing resource
    pub path: String,
}

impl PropertyAnnotation {
    /// Property on the backing resource
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: String::new(),
        }
    }

    /// Property on another node
    pub fn at(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Maps a method to another resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceAnnotation {
    /// Path of the referenced resource
    pub path: String,
}

/// Maps a method to the children of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildrenAnnotation {
    /// Parent path; empty means the backing resource
    pub path: String,
    /// What each child is returned as
    pub element: ElementType,
}

/// The annotation carried by one method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Stored property
    Property(PropertyAnnotation),
    /// Referenced resource
    Reference(ReferenceAnnotation),
    /// Child collection
    Children(ChildrenAnnotation),
}

impl Annotation {
    /// Short name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Annotation::Property(_) => "property",
            Annotation::Reference(_) => "reference",
            Annotation::Children(_) => "children",
        }
    }
}

impl From<PropertyAnnotation> for Annotation {
    fn from(a: PropertyAnnotation) -> Self {
        Annotation::Property(a)
    }
}

impl From<ReferenceAnnotation> for Annotation {
    fn from(a: ReferenceAnnotation) -> Self {
        Annotation::Reference(a)
    }
}

impl From<ChildrenAnnotation> for Annotation {
    fn from(a: ChildrenAnnotation) -> Self {
        Annotation::Children(a)
    }
}
