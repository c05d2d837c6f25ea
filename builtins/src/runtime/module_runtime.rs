// Module Runtime - namespace registry for built-in functions
// Populated once by a builder during start-up, then frozen and shared read-only.

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::objects::NativeFunction;
use crate::runtime::values::{BuiltinFunction, Value};
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;

/// Start-up configuration defects. These abort initialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("module '{0}' is already registered")]
    DuplicateModule(String),

    #[error("function '{name}' is registered twice in module '{module}'")]
    DuplicateFunction { module: String, name: String },

    #[error("function '{module}.{name}' has an invalid signature: {reason}")]
    InvalidSignature {
        module: String,
        name: String,
        reason: String,
    },
}

/// One namespace of built-in functions.
#[derive(Debug)]
pub struct Module {
    /// Module name (e.g., "builtins")
    pub name: String,

    /// Module documentation
    pub doc: String,

    /// Exported functions in registration order
    entries: IndexMap<String, Arc<BuiltinFunction>>,
}

impl Module {
    pub fn get(&self, name: &str) -> Option<&Arc<BuiltinFunction>> {
        self.entries.get(name)
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Arc<BuiltinFunction>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mutable registry used during the start-up registration pass.
#[derive(Debug, Default)]
pub struct ModuleRegistryBuilder {
    modules: IndexMap<String, Module>,
}

impl ModuleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a namespace and all of its functions at once.
    ///
    /// Nothing is registered if any check fails: the namespace must be new,
    /// function names unique, and every signature consistent.
    pub fn register(
        &mut self,
        name: &str,
        doc: &str,
        functions: Vec<BuiltinFunction>,
    ) -> Result<(), RegistryError> {
        if self.modules.contains_key(name) {
            return Err(fatal(RegistryError::DuplicateModule(name.to_string())));
        }

        let mut entries = IndexMap::with_capacity(functions.len());
        for function in functions {
            if let Err(reason) = function.signature.validate() {
                return Err(fatal(RegistryError::InvalidSignature {
                    module: name.to_string(),
                    name: function.name.clone(),
                    reason,
                }));
            }
            if entries.contains_key(&function.name) {
                return Err(fatal(RegistryError::DuplicateFunction {
                    module: name.to_string(),
                    name: function.name.clone(),
                }));
            }
            entries.insert(function.name.clone(), Arc::new(function));
        }

        tracing::debug!(module = name, functions = entries.len(), "registered module");
        self.modules.insert(
            name.to_string(),
            Module {
                name: name.to_string(),
                doc: doc.to_string(),
                entries,
            },
        );
        Ok(())
    }

    /// Freezes the registry. No further registration is possible.
    pub fn build(self) -> ModuleRegistry {
        ModuleRegistry {
            modules: self.modules,
        }
    }
}

fn fatal(error: RegistryError) -> RegistryError {
    tracing::error!(%error, "builtin registration failed");
    error
}

/// Read-only registry of built-in namespaces handed to the execution engine.
///
/// It has no interior mutability, so it can be shared across threads
/// (typically as `Arc<ModuleRegistry>`) without locking.
#[derive(Debug)]
pub struct ModuleRegistry {
    modules: IndexMap<String, Module>,
}

impl ModuleRegistry {
    pub fn builder() -> ModuleRegistryBuilder {
        ModuleRegistryBuilder::new()
    }

    pub fn get_module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Finds the descriptor for `module.name`.
    pub fn lookup(&self, module: &str, name: &str) -> RuntimeResult<&BuiltinFunction> {
        let Some(found) = self.modules.get(module) else {
            return Err(RuntimeError::ModuleNotFound(module.to_string()));
        };
        found
            .get(name)
            .map(|function| function.as_ref())
            .ok_or_else(|| RuntimeError::SymbolNotFound {
                module: module.to_string(),
                name: name.to_string(),
            })
    }

    /// Looks up `module.name` and wraps it as a callable value bound to `receiver`.
    pub fn function_value(&self, module: &str, name: &str, receiver: Value) -> RuntimeResult<Value> {
        let found = self
            .modules
            .get(module)
            .ok_or_else(|| RuntimeError::ModuleNotFound(module.to_string()))?;
        let function = found.get(name).ok_or_else(|| RuntimeError::SymbolNotFound {
            module: module.to_string(),
            name: name.to_string(),
        })?;
        Ok(Value::new(NativeFunction::new(Arc::clone(function), receiver)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::param_binding::{Param, Signature};
    use crate::runtime::values::Arity;

    fn identity(name: &str) -> BuiltinFunction {
        BuiltinFunction::new(
            name,
            "returns its argument",
            Signature::new(Arity::Fixed(1), vec![Param::positional("x")]),
            |_, args| Ok(args.get(0).clone()),
        )
    }

    #[test]
    fn register_then_lookup() {
        let mut builder = ModuleRegistry::builder();
        builder
            .register("m", "test module", vec![identity("id"), identity("same")])
            .unwrap();
        let registry = builder.build();

        let function = registry.lookup("m", "id").unwrap();
        assert_eq!(function.name, "id");
        assert_eq!(
            registry.get_module("m").unwrap().function_names().collect::<Vec<_>>(),
            vec!["id", "same"]
        );
        assert_eq!(registry.get_module("m").unwrap().doc, "test module");
    }

    #[test]
    fn missing_module_and_function() {
        let registry = ModuleRegistry::builder().build();
        assert_eq!(
            registry.lookup("nope", "x").unwrap_err(),
            RuntimeError::ModuleNotFound("nope".to_string())
        );

        let mut builder = ModuleRegistry::builder();
        builder.register("m", "", vec![identity("id")]).unwrap();
        let registry = builder.build();
        assert!(matches!(
            registry.lookup("m", "other"),
            Err(RuntimeError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn duplicate_names_are_fatal_and_register_nothing() {
        let mut builder = ModuleRegistry::builder();
        let err = builder
            .register("m", "", vec![identity("id"), identity("id")])
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateFunction {
                module: "m".to_string(),
                name: "id".to_string()
            }
        );
        assert!(builder.build().get_module("m").is_none());
    }

    #[test]
    fn duplicate_module_is_fatal() {
        let mut builder = ModuleRegistry::builder();
        builder.register("m", "", vec![identity("a")]).unwrap();
        let err = builder.register("m", "", vec![identity("b")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateModule("m".to_string()));
    }

    #[test]
    fn inconsistent_signature_is_rejected() {
        let broken = BuiltinFunction::new(
            "broken",
            "",
            Signature::new(Arity::Range(0, 1), vec![Param::positional("x")]),
            |_, _| Ok(Value::none()),
        );
        let mut builder = ModuleRegistry::builder();
        let err = builder.register("m", "", vec![broken]).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSignature { .. }));
    }
}
