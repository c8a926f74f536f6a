//! Error types for remap-core

use thiserror::Error;

/// Result type alias for remap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a mapping
#[derive(Error, Debug)]
pub enum Error {
    /// An absent value was passed where a source instance is required
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the offending argument
        message: String,
    },

    /// No instance of the destination type could be constructed
    #[error("cannot construct '{type_name}': {message}")]
    ConstructionError {
        /// Destination type name
        type_name: &'static str,
        /// Why construction failed
        message: String,
    },

    /// A constructor parameter could not be bound to any value
    #[error("constructor parameter '{parameter}' of '{type_name}' could not be resolved")]
    UnresolvedParameter {
        /// Type whose constructor was being invoked
        type_name: &'static str,
        /// Name of the unbound parameter
        parameter: String,
    },

    /// A value cannot be turned into the requested type
    #[error("cannot convert '{from}' into '{to}'")]
    UnsupportedConversion {
        /// Runtime type of the value
        from: &'static str,
        /// Requested type
        to: &'static str,
    },

    /// Recursion went deeper than the configured limit
    #[error("mapping depth limit of {limit} exceeded while mapping into '{type_name}'")]
    DepthLimitExceeded {
        /// Configured limit
        limit: usize,
        /// Destination type at the point the limit was hit
        type_name: &'static str,
    },

    /// A type pair was registered twice under the `reject` policy
    #[error("duplicate type map '{source_type}' -> '{destination_type}'")]
    DuplicateTypeMap {
        /// Source type name
        source_type: &'static str,
        /// Destination type name
        destination_type: &'static str,
    },

    /// Failure raised by a user-supplied custom type mapper
    #[error("custom mapper '{strategy}' failed: {message}")]
    Custom {
        /// Name of the strategy
        strategy: String,
        /// Description of the error
        message: String,
    },

    /// Options file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML options
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid option value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::UnsupportedConversion`]
    pub fn unsupported(from: &'static str, to: &'static str) -> Self {
        Self::UnsupportedConversion { from, to }
    }
}
