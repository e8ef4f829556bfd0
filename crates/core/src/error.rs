//! Error types for registries, dispatch and tool handlers.

/// Errors raised by registry operations (tools and resources).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// An entry with the same key already exists.
    #[error("'{0}' already exists")]
    DuplicateName(String),

    /// A required field is blank or absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// No entry with this key.
    #[error("'{0}' not found")]
    NotFound(String),
}

/// Errors raised before an execution record exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
}

/// Errors raised inside a tool handler.
///
/// These never escape the dispatcher; their message ends up in the
/// execution record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument '{name}': expected {expected}")]
    InvalidArgument {
        name: &'static str,
        expected: &'static str,
    },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Division by zero is not allowed")]
    DivisionByZero,

    #[error("Result of {0} is not a finite number")]
    NonFiniteResult(&'static str),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Invalid data type: {0}")]
    InvalidDataType(String),

    #[error("No handler registered for tool: {0}")]
    NoHandler(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
