use crate::runtime::capabilities::HashCapability;
use crate::runtime::error::RuntimeResult;
use crate::runtime::values::{Object, Value};
use std::any::Any;

/// Type of the `None` singleton; see [`Value::none`].
#[derive(Debug)]
pub struct NoneType;

impl Object for NoneType {
    fn type_name(&self) -> &str {
        "NoneType"
    }

    fn repr(&self) -> String {
        "None".to_string()
    }

    fn is_truthy(&self) -> bool {
        false
    }

    fn equals(&self, other: &Value) -> bool {
        other.is_none()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_hash(&self) -> Option<&dyn HashCapability> {
        Some(self)
    }
}

impl HashCapability for NoneType {
    fn hash(&self) -> RuntimeResult<i64> {
        Ok(0x5f3c_9a11)
    }
}

/// Type of the `NotImplemented` singleton; see [`Value::not_implemented`].
#[derive(Debug)]
pub struct NotImplementedType;

impl Object for NotImplementedType {
    fn type_name(&self) -> &str {
        "NotImplementedType"
    }

    fn repr(&self) -> String {
        "NotImplemented".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
