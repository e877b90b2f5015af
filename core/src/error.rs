//! Error types for binding operations.
//!
//! Binding fails fast: the first field-level failure aborts the call and is
//! returned as a [`BindError`]. Every variant names the external name of the
//! field being processed so callers can report it back to the client.

use thiserror::Error;

/// Boxed error produced by parsers and custom decoders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification of a [`BindError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The declared field type has no binding rule.
    UnsupportedType,
    /// A supplied string could not be parsed into the target type.
    Conversion,
    /// A fixed-size array received the wrong number of values.
    Arity,
    /// A mapping or nested record carried malformed structured text.
    StructuredDecode,
    /// A declared time zone could not be resolved.
    Configuration,
    /// A custom decoder rejected its input.
    CustomDecode,
}

/// Errors that can occur while binding a source into a record.
#[derive(Error, Debug)]
pub enum BindError {
    /// The field's type cannot be bound from text.
    #[error("field `{field}`: type `{type_name}` cannot be bound from text")]
    UnsupportedType {
        /// External name of the field.
        field: String,
        /// Rust name of the unsupported type.
        type_name: &'static str,
    },

    /// A supplied string could not be converted into the target type.
    #[error("field `{field}`: cannot parse {value:?} as {target}: {source}")]
    Conversion {
        /// External name of the field.
        field: String,
        /// The offending input string.
        value: String,
        /// Human-readable name of the target type.
        target: &'static str,
        /// The underlying parser error.
        #[source]
        source: BoxError,
    },

    /// A fixed-size array received the wrong number of values.
    #[error("field `{field}`: expected exactly {expected} values, got {actual}")]
    Arity {
        /// External name of the field.
        field: String,
        /// Declared array length.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Structured text for a mapping or nested record was malformed.
    #[error("field `{field}`: malformed structured value: {source}")]
    StructuredDecode {
        /// External name of the field.
        field: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A `time_location` directive names a zone that does not exist.
    #[error("field `{field}`: unknown time zone `{zone}`")]
    Configuration {
        /// External name of the field.
        field: String,
        /// The unresolvable zone name.
        zone: String,
    },

    /// A custom decoder returned an error.
    #[error("field `{field}`: {source}")]
    CustomDecode {
        /// External name of the field.
        field: String,
        /// The decoder's own error, preserved as-is.
        #[source]
        source: BoxError,
    },
}

impl BindError {
    /// External name of the field that failed.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::UnsupportedType { field, .. }
            | Self::Conversion { field, .. }
            | Self::Arity { field, .. }
            | Self::StructuredDecode { field, .. }
            | Self::Configuration { field, .. }
            | Self::CustomDecode { field, .. } => field,
        }
    }

    /// Classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Self::Conversion { .. } => ErrorKind::Conversion,
            Self::Arity { .. } => ErrorKind::Arity,
            Self::StructuredDecode { .. } => ErrorKind::StructuredDecode,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::CustomDecode { .. } => ErrorKind::CustomDecode,
        }
    }
}

/// A boolean literal outside the accepted spellings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid boolean literal")]
pub struct InvalidBool;

/// A local time skipped by a forward clock change in its zone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("local time does not exist in {zone}")]
pub struct NonexistentLocalTime {
    /// Name of the zone the local time was interpreted in.
    pub zone: String,
}
