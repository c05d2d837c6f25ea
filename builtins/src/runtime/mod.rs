//! Built-in Runtime System
//!
//! Argument binding, capability dispatch and the built-in namespace registry.
//! An execution engine looks a callable up in a [`ModuleRegistry`] and calls
//! [`BuiltinFunction::invoke`] with an [`Args`] container.

pub mod args;
pub mod arith;
pub mod capabilities;
pub mod error;
pub mod module_runtime;
pub mod objects;
pub mod param_binding;
pub mod stdlib;
pub mod values;


pub use args::Args;
pub use capabilities::*;
pub use error::{RuntimeError, RuntimeResult};
pub use module_runtime::{Module, ModuleRegistry, ModuleRegistryBuilder, RegistryError};
pub use param_binding::{bind, BoundArgs, Param, ParamKind, Signature};
pub use stdlib::{create_builtin_registry, load_builtins, BuiltinLibrary};
pub use values::{Arity, BuiltinFunction, Object, Value};
