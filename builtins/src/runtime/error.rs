// Error handling for the built-in function layer

use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors a built-in call can return to the execution engine.
///
/// Every variant is recoverable: the engine decides how to surface it to the
/// running program (usually as a raised exception carrying the same fields).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Too few or too many positional arguments
    #[error("{function}() takes {} positional argument{} but {actual} {} given", describe_arity(.min, .max), plural(.min, .max), were(.actual))]
    ArityMismatch {
        function: String,
        min: usize,
        max: Option<usize>,
        actual: usize,
    },

    /// The operand's type does not implement the capability the call needs
    #[error("type {operand_type} doesn't implement {protocol}")]
    UnsupportedOperation {
        operand_type: String,
        protocol: String,
    },

    /// A keyword argument the callable does not recognise
    #[error("{function}() got an unexpected keyword argument '{name}'")]
    UnknownKeyword { function: String, name: String },

    /// A keyword argument naming a parameter that was already filled positionally
    #[error("{function}() got multiple values for argument '{name}'")]
    DuplicateArgument { function: String, name: String },

    /// Type errors (wrong type for operation)
    #[error("Type error in {operation}: expected {expected}, got {actual}")]
    TypeError {
        expected: String,
        actual: String,
        operation: String,
    },

    /// Invalid argument value (right type, unacceptable value)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Result does not fit the native representation
    #[error("Overflow: {0}")]
    Overflow(String),

    #[error("Division by zero")]
    DivisionByZero,

    /// Output sink failures
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Symbol not found: {module}.{name}")]
    SymbolNotFound { module: String, name: String },

    /// Internal error, e.g. a callable registered with an inconsistent signature
    #[error("Internal error: {0}")]
    InternalError(String),
}

fn describe_arity(min: &usize, max: &Option<usize>) -> String {
    match *max {
        Some(max) if max == *min => format!("exactly {}", min),
        Some(max) => format!("from {} to {}", min, max),
        None => format!("at least {}", min),
    }
}

fn plural(min: &usize, max: &Option<usize>) -> &'static str {
    if max.unwrap_or(*min) == 1 {
        ""
    } else {
        "s"
    }
}

fn were(actual: &usize) -> &'static str {
    if *actual == 1 {
        "was"
    } else {
        "were"
    }
}

impl RuntimeError {
    pub fn arity(function: &str, min: usize, max: Option<usize>, actual: usize) -> Self {
        RuntimeError::ArityMismatch {
            function: function.to_string(),
            min,
            max,
            actual,
        }
    }

    pub fn unsupported(operand_type: &str, protocol: &str) -> Self {
        RuntimeError::UnsupportedOperation {
            operand_type: operand_type.to_string(),
            protocol: protocol.to_string(),
        }
    }

    pub fn type_error(expected: &str, actual: &str, operation: &str) -> Self {
        RuntimeError::TypeError {
            expected: expected.to_string(),
            actual: actual.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Name of the exception class an engine would raise for this error.
    pub fn exception_name(&self) -> &'static str {
        match self {
            RuntimeError::ArityMismatch { .. }
            | RuntimeError::UnsupportedOperation { .. }
            | RuntimeError::UnknownKeyword { .. }
            | RuntimeError::DuplicateArgument { .. }
            | RuntimeError::TypeError { .. } => "TypeError",
            RuntimeError::InvalidArgument(_) => "ValueError",
            RuntimeError::Overflow(_) => "OverflowError",
            RuntimeError::DivisionByZero => "ZeroDivisionError",
            RuntimeError::IoError(_) => "OSError",
            RuntimeError::ModuleNotFound(_) => "ImportError",
            RuntimeError::SymbolNotFound { .. } => "NameError",
            RuntimeError::InternalError(_) => "SystemError",
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::IoError(err.to_string())
    }
}
