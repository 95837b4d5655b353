//! Error types for SQL compilation.

/// Errors that can occur while building or compiling SQL.
#[derive(Debug, thiserror::Error)]
pub enum SqlError {
    /// Caller supplied a value of an unsupported shape or kind.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An expression node produced data it should never produce.
    ///
    /// This indicates a broken `ExpressionNode` implementation, not bad
    /// caller input. Compilation of the whole statement is aborted.
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    /// The number of supplied parameters does not match the template.
    #[error("Template expects {expected} parameter(s), {found} supplied")]
    ArityMismatch {
        /// Parameter count declared by the template.
        expected: usize,
        /// Parameter count actually supplied.
        found: usize,
    },

    /// No template in the specification accepts this parameter count.
    #[error("A number of parameters ({0}) was found that is not supported by this specification")]
    UnsupportedArity(usize),

    /// `unnest()` was called on a predicate that was never nested.
    #[error("Not nested")]
    NotNested,
}

/// Result type for SQL compilation.
pub type Result<T> = std::result::Result<T, SqlError>;
