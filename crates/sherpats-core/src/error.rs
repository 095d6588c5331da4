//! Error types for client generation

use std::fmt;

use thiserror::Error;

/// Result type alias for generation operations
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Where a typewords sequence was found in the schema.
///
/// Carried by type errors so a diagnostic names the exact field, parameter or
/// return value that holds the offending tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeContext {
    /// A field of a struct.
    Field { structure: String, field: String },

    /// A parameter of a function.
    Param { function: String, param: String },

    /// A return value of a function, by position.
    Return { function: String, index: usize },
}

impl TypeContext {
    pub fn field(structure: &str, field: &str) -> Self {
        TypeContext::Field {
            structure: structure.to_string(),
            field: field.to_string(),
        }
    }

    pub fn param(function: &str, param: &str) -> Self {
        TypeContext::Param {
            function: function.to_string(),
            param: param.to_string(),
        }
    }

    pub fn return_value(function: &str, index: usize) -> Self {
        TypeContext::Return {
            function: function.to_string(),
            index,
        }
    }
}

impl fmt::Display for TypeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeContext::Field { structure, field } => {
                write!(f, "field {field} of struct {structure}")
            }
            TypeContext::Param { function, param } => {
                write!(f, "parameter {param} of fn {function}")
            }
            TypeContext::Return { function, index } => {
                write!(f, "return {index} of fn {function}")
            }
        }
    }
}

/// Error type for client generation
///
/// Every variant is fatal: generation stops at the first error and no output
/// is produced.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The schema document is not valid sherpadoc JSON
    #[error("invalid sherpadoc: {0}")]
    InvalidSchema(String),

    /// The document declares a sherpadoc version this generator does not understand
    #[error("unexpected sherpadoc version {found}, expected {expected}")]
    SchemaVersionMismatch { found: i64, expected: i64 },

    /// Two named types share a name somewhere in the section tree
    #[error("duplicate type {name:?}, declared in section {first:?} and again in section {second:?}")]
    DuplicateTypeName {
        name: String,
        first: String,
        second: String,
    },

    /// Two functions share a wire name somewhere in the section tree
    #[error("duplicate function {name:?}, declared in section {first:?} and again in section {second:?}")]
    DuplicateFunctionName {
        name: String,
        first: String,
        second: String,
    },

    /// A typewords sequence references a type that is not declared
    #[error("{context} references type {name:?} that does not exist")]
    UnknownReferencedType { context: TypeContext, name: String },

    /// A typewords sequence is empty or has tokens left after a terminal token
    #[error("invalid type for {context}: {reason}, saw {remainder:?}")]
    MalformedTypeWords {
        context: TypeContext,
        reason: &'static str,
        remainder: Vec<String>,
    },

    /// The namespace option cannot be used as a TypeScript namespace name
    #[error("invalid namespace {name:?}: {reason}")]
    InvalidNamespace { name: String, reason: &'static str },

    /// The generator failed to serialize its own data
    #[error("internal serialization failure: {0}")]
    InternalSerializationFailure(String),
}

impl GenerateError {
    /// Short stable name of the error variant, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::InvalidSchema(_) => "invalid_schema",
            GenerateError::SchemaVersionMismatch { .. } => "schema_version_mismatch",
            GenerateError::DuplicateTypeName { .. } => "duplicate_type_name",
            GenerateError::DuplicateFunctionName { .. } => "duplicate_function_name",
            GenerateError::UnknownReferencedType { .. } => "unknown_referenced_type",
            GenerateError::MalformedTypeWords { .. } => "malformed_typewords",
            GenerateError::InvalidNamespace { .. } => "invalid_namespace",
            GenerateError::InternalSerializationFailure(_) => "internal_serialization_failure",
        }
    }

    pub(crate) fn malformed(context: &TypeContext, reason: &'static str, remainder: &[String]) -> Self {
        GenerateError::MalformedTypeWords {
            context: context.clone(),
            reason,
            remainder: remainder.to_vec(),
        }
    }
}

impl From<serde_json::Error> for GenerateError {
    fn from(err: serde_json::Error) -> Self {
        GenerateError::InternalSerializationFailure(err.to_string())
    }
}
