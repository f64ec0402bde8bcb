use thiserror::Error;

use tsgen_types::field_descriptor_proto::Type;

/// Result alias used across the generator.
pub type GenResult<T> = Result<T, GenError>;

/// Fatal conditions. Any of these aborts the entire run: the type map is
/// shared across every file in the request, so there is no partial output.
#[derive(Debug, Error)]
pub enum GenError {
    /// A message or enum reference did not resolve in the type map.
    #[error("no type found for '{type_name}'")]
    UnresolvedType { type_name: String },

    /// The option string carried a key the generator does not recognize.
    #[error("unrecognized option '{key}'")]
    UnknownOption { key: String },

    /// An option value outside the closed set documented for its key.
    #[error("unrecognized value '{value}' for option '{key}'")]
    UnknownOptionValue { key: String, value: String },

    /// A descriptor carried a field type integer outside the closed
    /// enumeration.
    #[error("field '{field}' has invalid type value {value}")]
    InvalidFieldType { field: String, value: i32 },

    /// A non-scalar kind reached a scalar-only metadata function.
    #[error("no wire metadata for non-scalar type {0:?}")]
    NonScalar(Type),

    /// An enum with no declared values reached default-value resolution.
    #[error("enum '{type_name}' has no values to derive a default from")]
    EmptyEnum { type_name: String },

    /// The request asked to generate a file absent from the descriptor set.
    #[error("file '{file}' not present in the request")]
    MissingFile { file: String },

    /// The input bytes were not a valid generation request.
    #[error("failed to decode request: {0}")]
    Decode(#[from] prost::DecodeError),
}
