// Builtins Library
// Native built-in functions for a dynamically-typed language runtime
pub mod config;
pub mod runtime;

// Re-export the pieces an execution engine needs to look up and call built-ins.
pub use config::{BuiltinsConfig, OutputTarget};
pub use runtime::{
    create_builtin_registry, load_builtins, Args, Arity, BuiltinFunction, ModuleRegistry,
    RuntimeError, RuntimeResult, Value,
};
