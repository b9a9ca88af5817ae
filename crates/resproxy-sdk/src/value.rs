//! Stored property values
//!
//! A repository property holds either one [`Scalar`] or an ordered sequence
//! of scalars (a multi-valued property). Properties of one node are grouped
//! in a [`ValueMap`].
//!
//! # Conversions
//!
//! ```text
//!            | String | Long        | Int          | Double | Boolean
//! -----------+--------+-------------+--------------+--------+-----------------
//! String     | as-is  | parse       | parse, range | parse  | "true"/"false"
//! Long       | render | as-is       | range check  | widen  | -
//! Double     | render | truncate    | truncate     | as-is  | -
//! Boolean    | render | -           | -            | -      | as-is
//! ```
//!
//! `-` is a [`RepositoryError::Conversion`].

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{RepoResult, RepositoryError};

/// Kind of a scalar value, used as a conversion target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Long,
    /// 32-bit signed integer (stored as `Long`)
    Int,
    /// IEEE 754 double
    Double,
    /// Boolean
    Boolean,
}

impl ScalarKind {
    /// Lowercase type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Long => "long",
            ScalarKind::Int => "int",
            ScalarKind::Double => "double",
            ScalarKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single stored value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// String value
    String(String),
    /// Integer value
    Long(i64),
    /// Floating point value
    Double(f64),
    /// Boolean value
    Boolean(bool),
}

impl Scalar {
    /// Kind of this value as stored
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::String(_) => ScalarKind::String,
            Scalar::Long(_) => ScalarKind::Long,
            Scalar::Double(_) => ScalarKind::Double,
            Scalar::Boolean(_) => ScalarKind::Boolean,
        }
    }

    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to the requested kind
    pub fn convert(&self, target: ScalarKind) -> RepoResult<Scalar> {
        let converted = match (self, target) {
            (_, ScalarKind::String) => Some(Scalar::String(self.to_string())),

            (Scalar::Long(v), ScalarKind::Long) => Some(Scalar::Long(*v)),
            (Scalar::Double(v), ScalarKind::Long) => truncate(*v).map(Scalar::Long),
            (Scalar::String(s), ScalarKind::Long) => s.trim().parse::<i64>().ok().map(Scalar::Long),

            (_, ScalarKind::Int) => match self.convert(ScalarKind::Long) {
                Ok(Scalar::Long(v)) if i32::try_from(v).is_ok() => Some(Scalar::Long(v)),
                _ => None,
            },

            (Scalar::Double(v), ScalarKind::Double) => Some(Scalar::Double(*v)),
            (Scalar::Long(v), ScalarKind::Double) => Some(Scalar::Double(*v as f64)),
            (Scalar::String(s), ScalarKind::Double) => {
                s.trim().parse::<f64>().ok().map(Scalar::Double)
            }

            (Scalar::Boolean(b), ScalarKind::Boolean) => Some(Scalar::Boolean(*b)),
            (Scalar::String(s), ScalarKind::Boolean) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(Scalar::Boolean(true))
                } else if s.eq_ignore_ascii_case("false") {
                    Some(Scalar::Boolean(false))
                } else {
                    None
                }
            }

            _ => None,
        };

        converted.ok_or_else(|| RepositoryError::Conversion {
            value: self.to_string(),
            target,
        })
    }
}

// `i64::MAX as f64` rounds up to 2^63, which is out of range.
fn truncate(v: f64) -> Option<i64> {
    if v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Long(v) => write!(f, "{}", v),
            Scalar::Double(v) => write!(f, "{}", v),
            Scalar::Boolean(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Long(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Long(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Double(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Boolean(v)
    }
}

// ============================================================================
// Property values
// ============================================================================

/// A stored property: single-valued or multi-valued
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Exactly one value
    Single(Scalar),
    /// Ordered sequence of values (possibly empty)
    Multi(Vec<Scalar>),
}

impl PropertyValue {
    /// Build a multi-valued property
    pub fn multi<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        PropertyValue::Multi(items.into_iter().map(Into::into).collect())
    }

    /// Whether the property is stored as a sequence
    pub fn is_multiple(&self) -> bool {
        matches!(self, PropertyValue::Multi(_))
    }

    /// All stored values; a single value is a one-element slice
    pub fn values(&self) -> &[Scalar] {
        match self {
            PropertyValue::Single(s) => std::slice::from_ref(s),
            PropertyValue::Multi(items) => items,
        }
    }
}

impl From<Scalar> for PropertyValue {
    fn from(s: Scalar) -> Self {
        PropertyValue::Single(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Single(s.into())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Single(s.into())
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Single(v.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Single(v.into())
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Single(v.into())
    }
}

impl From<Vec<Scalar>> for PropertyValue {
    fn from(items: Vec<Scalar>) -> Self {
        PropertyValue::Multi(items)
    }
}

// ============================================================================
// Value map
// ============================================================================

/// Named properties of one repository node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: BTreeMap<String, PropertyValue>,
}

impl ValueMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Raw property lookup
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.get(name)
    }

    /// Check if a property exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Property names in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ValueMap
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_to_string() {
        assert_eq!(
            Scalar::Long(42).convert(ScalarKind::String),
            Ok(Scalar::String("42".to_string()))
        );
        assert_eq!(
            Scalar::Boolean(true).convert(ScalarKind::String),
            Ok(Scalar::String("true".to_string()))
        );
    }

    #[test]
    fn test_convert_numeric() {
        assert_eq!(Scalar::from(" 17 ").convert(ScalarKind::Long), Ok(Scalar::Long(17)));
        assert_eq!(Scalar::Double(3.9).convert(ScalarKind::Long), Ok(Scalar::Long(3)));
        assert_eq!(Scalar::Long(2).convert(ScalarKind::Double), Ok(Scalar::Double(2.0)));
        assert!(Scalar::from("abc").convert(ScalarKind::Long).is_err());
        assert!(Scalar::Double(f64::NAN).convert(ScalarKind::Long).is_err());
    }

    #[test]
    fn test_convert_long_bounds() {
        let two_pow_63 = 9_223_372_036_854_775_808.0_f64;
        assert_eq!(
            Scalar::Double(two_pow_63).convert(ScalarKind::Long),
            Err(RepositoryError::Conversion {
                value: two_pow_63.to_string(),
                target: ScalarKind::Long,
            })
        );
        assert_eq!(
            Scalar::Double(-two_pow_63).convert(ScalarKind::Long),
            Ok(Scalar::Long(i64::MIN))
        );
        assert_eq!(
            Scalar::Double(9_223_372_036_854_774_784.0).convert(ScalarKind::Long),
            Ok(Scalar::Long(9_223_372_036_854_774_784))
        );
    }

    #[test]
    fn test_convert_int_range() {
        assert_eq!(Scalar::Long(7).convert(ScalarKind::Int), Ok(Scalar::Long(7)));
        let err = Scalar::Long(i64::MAX).convert(ScalarKind::Int).unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Conversion {
                value: i64::MAX.to_string(),
                target: ScalarKind::Int,
            }
        );
    }

    #[test]
    fn test_convert_boolean() {
        assert_eq!(Scalar::from("TRUE").convert(ScalarKind::Boolean), Ok(Scalar::Boolean(true)));
        assert_eq!(Scalar::from("false").convert(ScalarKind::Boolean), Ok(Scalar::Boolean(false)));
        assert!(Scalar::from("yes").convert(ScalarKind::Boolean).is_err());
        assert!(Scalar::Long(1).convert(ScalarKind::Boolean).is_err());
    }

    #[test]
    fn test_property_value_shape() {
        let single = PropertyValue::from("a");
        assert!(!single.is_multiple());
        assert_eq!(single.values(), &[Scalar::from("a")]);

        let multi = PropertyValue::multi(["a", "b"]);
        assert!(multi.is_multiple());
        assert_eq!(multi.values().len(), 2);

        assert!(PropertyValue::multi(Vec::<i64>::new()).is_multiple());
    }

    #[test]
    fn test_value_map_read() {
        let map = ValueMap::new()
            .with("title", "Hello")
            .with("tags", PropertyValue::multi(["a", "b"]));

        assert_eq!(map.get("title"), Some(&PropertyValue::from("Hello")));
        assert!(map.get("tags").is_some_and(PropertyValue::is_multiple));
        assert_eq!(map.get("missing"), None);
        assert!(map.contains("tags"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["tags", "title"]);
    }
}
