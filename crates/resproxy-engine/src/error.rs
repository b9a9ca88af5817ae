//! Proxy errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or invoking a proxy
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProxyError {
    /// Interface metadata cannot be turned into a descriptor
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Declaring interface of the method is on the deny list
    #[error("Invocation of method {method} has been denied by this proxy (declared on {interface})")]
    DeniedInvocation {
        /// Invoked method
        method: String,
        /// Declaring interface
        interface: String,
    },

    /// No descriptor matches the invoked method
    #[error("No such method: {method} on {interface}")]
    UnsupportedMethod {
        /// Invoked method
        method: String,
        /// Proxy interface
        interface: String,
    },

    /// Stored value cannot be produced as the declared return type
    #[error("Cannot coerce result of {method}: {reason}")]
    Coercion {
        /// Invoked method
        method: String,
        /// What went wrong
        reason: String,
    },

    /// Wrong number or kind of arguments
    #[error("Argument error: {0}")]
    Argument(String),

    /// Interface name is not registered
    #[error("Unknown interface: {0}")]
    UnknownInterface(String),
}

/// Proxy operation result
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Errors raised while loading a [`crate::ProxyConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("Invalid proxy configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid value
    #[error("Invalid proxy configuration: {0}")]
    Invalid(String),
}
