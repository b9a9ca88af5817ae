//! Typed extraction of stored values.
//!
//! Implement [`FromScalar`] to read a Rust type out of a [`Scalar`]. The
//! target [`ScalarKind`] drives conversion, so `i32` gets range checking and
//! `String` renders numbers and booleans.
//!
//! # Example
//!
//! ```ignore
//! use resproxy_sdk::{FromScalar, Scalar};
//!
//! let count = i64::from_scalar(&Scalar::from("12"))?;
//! assert_eq!(count, 12);
//! ```

use crate::error::{RepoResult, RepositoryError};
use crate::value::{Scalar, ScalarKind};

/// Convert a stored scalar into a Rust value.
pub trait FromScalar: Sized {
    /// Kind the scalar is converted to before extraction
    const KIND: ScalarKind;

    /// Extract from a scalar already converted to [`Self::KIND`]
    fn from_converted(value: Scalar) -> Option<Self>;

    /// Convert and extract
    fn from_scalar(value: &Scalar) -> RepoResult<Self> {
        let converted = value.convert(Self::KIND)?;
        Self::from_converted(converted).ok_or_else(|| RepositoryError::Conversion {
            value: value.to_string(),
            target: Self::KIND,
        })
    }
}

impl FromScalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn from_converted(value: Scalar) -> Option<Self> {
        match value {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromScalar for i64 {
    const KIND: ScalarKind = ScalarKind::Long;

    fn from_converted(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Long(v) => Some(v),
            _ => None,
        }
    }
}

impl FromScalar for i32 {
    const KIND: ScalarKind = ScalarKind::Int;

    fn from_converted(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Long(v) => i32::try_from(v).ok(),
            _ => None,
        }
    }
}

impl FromScalar for f64 {
    const KIND: ScalarKind = ScalarKind::Double;

    fn from_converted(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl FromScalar for bool {
    const KIND: ScalarKind = ScalarKind::Boolean;

    fn from_converted(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Boolean(v) => Some(v),
            _ => None,
        }
    }
}
