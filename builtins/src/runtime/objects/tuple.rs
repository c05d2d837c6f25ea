use crate::runtime::arith;
use crate::runtime::capabilities::{HashCapability, LenCapability};
use crate::runtime::error::RuntimeResult;
use crate::runtime::values::{Object, Value};
use itertools::Itertools;
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

/// Fixed-size sequence (`tuple`), e.g. the result of `divmod`.
#[derive(Debug, Clone)]
pub struct Tuple(Vec<Value>);

impl Tuple {
    pub fn new(items: Vec<Value>) -> Self {
        Tuple(items)
    }

    pub fn items(&self) -> &[Value] {
        &self.0
    }
}

impl Object for Tuple {
    fn type_name(&self) -> &str {
        "tuple"
    }

    fn repr(&self) -> String {
        match self.0.as_slice() {
            [single] => format!("({},)", single.repr()),
            items => format!("({})", items.iter().map(|v| v.repr()).join(", ")),
        }
    }

    fn is_truthy(&self) -> bool {
        !self.0.is_empty()
    }

    fn equals(&self, other: &Value) -> bool {
        other
            .downcast_ref::<Tuple>()
            .map_or(false, |t| t.0 == self.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_len(&self) -> Option<&dyn LenCapability> {
        Some(self)
    }

    fn as_hash(&self) -> Option<&dyn HashCapability> {
        Some(self)
    }
}

impl LenCapability for Tuple {
    fn len(&self) -> RuntimeResult<usize> {
        Ok(self.0.len())
    }
}

impl HashCapability for Tuple {
    /// Hashable only when every item is.
    fn hash(&self) -> RuntimeResult<i64> {
        let mut hasher = DefaultHasher::new();
        hasher.write_usize(self.0.len());
        for item in &self.0 {
            hasher.write_i64(arith::hash(item)?);
        }
        let hash = hasher.finish() as i64;
        Ok(if hash == -1 { -2 } else { hash })
    }
}
