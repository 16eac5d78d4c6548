//! Error types for type resolution and field modelling.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The caller broke a contract of the type model (incomplete load,
    /// malformed oneof grouping, unknown field kind).
    #[error("internal consistency error: {0}")]
    Consistency(#[from] ConsistencyError),

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Returns true if this error reports a broken caller contract.
    #[must_use]
    pub const fn is_consistency(&self) -> bool {
        matches!(self, Self::Consistency(_))
    }
}

/// Contract violations detected while resolving types.
///
/// None of these arise from valid input; the generator driver is expected to
/// abort and report the offending schema element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// A message, enum or enum value was resolved before the file defining
    /// it was added to the cache.
    #[error("unknown {kind} type: '{name}'")]
    UnregisteredType {
        /// Kind of element (message, enum, enum value).
        kind: &'static str,
        /// Fully-qualified name, or `<none>` if the reference was absent.
        name: String,
    },

    /// A field was resolved that no added file owns.
    #[error("field '{field}' does not belong to any added file")]
    UnregisteredField {
        /// Fully-qualified field name.
        field: String,
    },

    /// A field carries a kind outside the mapping table.
    #[error("unknown kind {kind} for field '{field}'")]
    UnknownFieldKind {
        /// Fully-qualified field name.
        field: String,
        /// Kind as printed by the schema model.
        kind: String,
    },

    /// Two raw fields with the same logical name disagree on their oneof.
    #[error("field '{field}' maps to logical field '{name}' with a different oneof")]
    InconsistentOneof {
        /// Fully-qualified field name.
        field: String,
        /// Logical field name.
        name: String,
    },

    /// Two plain fields of one message share a logical name.
    #[error("field '{field}' duplicates logical field '{name}'")]
    DuplicateField {
        /// Fully-qualified field name.
        field: String,
        /// Logical field name.
        name: String,
    },

    /// A lookup was attempted before the cache was finalized.
    #[error("type cache read before finalize")]
    CacheNotSealed,

    /// A file was added after the cache was finalized.
    #[error("file '{file}' added to a finalized type cache")]
    CacheSealed {
        /// File name.
        file: String,
    },
}

impl ConsistencyError {
    /// Creates an unregistered type error.
    pub fn unregistered(kind: &'static str, name: Option<&str>) -> Self {
        Self::UnregisteredType {
            kind,
            name: name.unwrap_or("<none>").to_string(),
        }
    }
}
