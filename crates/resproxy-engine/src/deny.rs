//! Deny lists
//!
//! A [`DenyList`] names declaring interfaces whose methods a proxy must
//! refuse to dispatch. It is attached once at proxy creation and never
//! changes afterwards.
//!
//! ## Patterns
//!
//! | Pattern          | Matches                                      |
//! |------------------|----------------------------------------------|
//! | `Auditable`      | exactly `Auditable`                          |
//! | `com.acme.*`     | any name starting with `com.acme.`           |
//! | `*`              | every interface, `Object` included           |
//!
//! ## TOML Configuration
//!
//! ```toml
//! [proxy]
//! deny = ["Auditable", "com.acme.internal.*"]
//! ```

use std::fmt;

use rustc_hash::FxHashSet;

use crate::error::{ProxyError, ProxyResult};

/// One deny pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DenyRule {
    /// Interface name, optionally ending in `*`
    pub pattern: String,
}

impl DenyRule {
    /// Create a rule from a pattern; surrounding whitespace is ignored
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into().trim().to_string(),
        }
    }

    /// Check if the rule matches an interface name
    pub fn matches(&self, interface: &str) -> bool {
        if self.pattern == "*" {
            return true;
        }

        if let Some(prefix) = self.pattern.strip_suffix('*') {
            interface.starts_with(prefix) && interface.len() > prefix.len()
        } else {
            self.pattern == interface
        }
    }

    fn is_wildcard(&self) -> bool {
        self.pattern.ends_with('*')
    }
}

/// Immutable set of denied declaring interfaces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenyList {
    /// Exact interface names
    exact: FxHashSet<String>,
    /// Wildcard rules, in insertion order
    wildcards: Vec<DenyRule>,
}

impl DenyList {
    /// An empty deny list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from patterns; empty patterns are skipped
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for pattern in patterns {
            list.add(DenyRule::new(pattern));
        }
        list
    }

    fn add(&mut self, rule: DenyRule) {
        if rule.pattern.is_empty() {
            return;
        }
        if rule.is_wildcard() {
            if !self.wildcards.contains(&rule) {
                self.wildcards.push(rule);
            }
        } else {
            self.exact.insert(rule.pattern);
        }
    }

    /// Check if methods declared on `interface` are denied
    pub fn denies(&self, interface: &str) -> bool {
        self.exact.contains(interface) || self.wildcards.iter().any(|r| r.matches(interface))
    }

    /// Fail with [`ProxyError::DeniedInvocation`] if `interface` is denied
    pub fn check(&self, method: &str, interface: &str) -> ProxyResult<()> {
        if self.denies(interface) {
            return Err(ProxyError::DeniedInvocation {
                method: method.to_string(),
                interface: interface.to_string(),
            });
        }
        Ok(())
    }

    /// Union of two deny lists
    pub fn merge(&self, other: &DenyList) -> DenyList {
        let mut merged = self.clone();
        merged.exact.extend(other.exact.iter().cloned());
        for rule in &other.wildcards {
            merged.add(rule.clone());
        }
        merged
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.exact.len() + self.wildcards.len()
    }

    /// Check if nothing is denied
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.wildcards.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DenyList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_patterns(iter)
    }
}

impl fmt::Display for DenyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut patterns: Vec<&str> = self.exact.iter().map(String::as_str).collect();
        patterns.sort_unstable();
        patterns.extend(self.wildcards.iter().map(|r| r.pattern.as_str()));
        write!(f, "[{}]", patterns.join(", "))
    }
}
