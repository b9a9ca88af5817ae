//! Proxy identity: `hashCode`, `equals`, `toString`
//!
//! Identity depends only on the proxy type, the set of implemented
//! interfaces and the backing path, so independently created proxies over
//! the same resource and interface agree.
//!
//! ## Hash layout
//!
//! ```text
//! hash = h(PROXY_TYPE)
//! for iface in interfaces (sorted by name):
//!     hash = hash * PRIME + h(iface)
//! hash = hash * PRIME + (h(HANDLER_TYPE) * PRIME + h(path))
//! ```
//!
//! `h` is the 31-polynomial string hash over UTF-16 code units, all
//! arithmetic wraps at 32 bits.

/// Type name folded into every proxy hash
pub const PROXY_TYPE_NAME: &str = "ResourceProxy";

/// Type name folded into the handler part of the hash
pub const HANDLER_TYPE_NAME: &str = "InvocationHandler";

/// Multiplier between hash components
pub const HASH_PRIME: i32 = 31;

/// 31-polynomial hash of a string's UTF-16 code units
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(i32::from(c)))
}

/// Hash of the handler behind a proxy
pub fn handler_hash(path: &str) -> i32 {
    string_hash(HANDLER_TYPE_NAME)
        .wrapping_mul(HASH_PRIME)
        .wrapping_add(string_hash(path))
}

/// `hashCode()` of a proxy. `interfaces` must be sorted by name.
pub fn proxy_hash<S: AsRef<str>>(interfaces: &[S], path: &str) -> i32 {
    interfaces
        .iter()
        .map(|iface| string_hash(iface.as_ref()))
        .chain(std::iter::once(handler_hash(path)))
        .fold(string_hash(PROXY_TYPE_NAME), |hash, part| {
            hash.wrapping_mul(HASH_PRIME).wrapping_add(part)
        })
}

/// `equals()` of two proxies: same interface set and same backing path
pub fn proxy_equals<S: AsRef<str>>(
    interfaces: &[S],
    path: &str,
    other_interfaces: &[S],
    other_path: &str,
) -> bool {
    path == other_path
        && interfaces.len() == other_interfaces.len()
        && interfaces
            .iter()
            .zip(other_interfaces)
            .all(|(a, b)| a.as_ref() == b.as_ref())
}

/// `toString()` of a proxy: `Interface[/backing/path]`
pub fn proxy_to_string(interface: &str, path: &str) -> String {
    format!("{}[{}]", interface, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_hash_matches_known_values() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("hello"), 99162322);
        // wraps instead of overflowing
        assert_eq!(string_hash("polygenelubricants"), i32::MIN);
    }

    #[test]
    fn test_proxy_hash_deterministic() {
        let ifaces = ["Page", "ResourceBacked"];
        assert_eq!(proxy_hash(&ifaces, "/content/test"), proxy_hash(&ifaces, "/content/test"));
        assert_ne!(proxy_hash(&ifaces, "/content/test"), proxy_hash(&ifaces, "/content/other"));
        assert_ne!(proxy_hash(&["Page"], "/content/test"), proxy_hash(&["Teaser"], "/content/test"));
    }

    #[test]
    fn test_proxy_equals() {
        assert!(proxy_equals(&["A", "B"], "/x", &["A", "B"], "/x"));
        assert!(!proxy_equals(&["A"], "/x", &["A", "B"], "/x"));
        assert!(!proxy_equals(&["A"], "/x", &["A"], "/y"));
    }

    #[test]
    fn test_to_string() {
        assert_eq!(proxy_to_string("Page", "/content/test"), "Page[/content/test]");
    }
}
