use crate::runtime::args::Args;
use crate::runtime::capabilities::{CallCapability, HashCapability};
use crate::runtime::error::RuntimeResult;
use crate::runtime::values::{BuiltinFunction, Object, Value};
use std::any::Any;
use std::sync::Arc;

/// A registered built-in bound to its receiver, usable as a first-class value.
#[derive(Debug, Clone)]
pub struct NativeFunction {
    function: Arc<BuiltinFunction>,
    receiver: Value,
}

impl NativeFunction {
    pub fn new(function: Arc<BuiltinFunction>, receiver: Value) -> Self {
        NativeFunction { function, receiver }
    }

    pub fn function(&self) -> &BuiltinFunction {
        &self.function
    }
}

impl Object for NativeFunction {
    fn type_name(&self) -> &str {
        "builtin_function_or_method"
    }

    fn repr(&self) -> String {
        format!("<built-in function {}>", self.function.name)
    }

    fn equals(&self, other: &Value) -> bool {
        other
            .downcast_ref::<NativeFunction>()
            .map_or(false, |f| Arc::ptr_eq(&f.function, &self.function))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_call(&self) -> Option<&dyn CallCapability> {
        Some(self)
    }

    fn as_hash(&self) -> Option<&dyn HashCapability> {
        Some(self)
    }
}

impl CallCapability for NativeFunction {
    fn call(&self, args: &Args) -> RuntimeResult<Value> {
        self.function.invoke(&self.receiver, args)
    }
}

impl HashCapability for NativeFunction {
    fn hash(&self) -> RuntimeResult<i64> {
        Ok(Arc::as_ptr(&self.function) as usize as i64)
    }
}
