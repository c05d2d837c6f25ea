use crate::runtime::capabilities::{HashCapability, LenCapability};
use crate::runtime::error::RuntimeResult;
use crate::runtime::values::{Object, Value};
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Immutable text (`str`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Str(String);

impl Str {
    pub fn new(value: impl Into<String>) -> Self {
        Str(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Object for Str {
    fn type_name(&self) -> &str {
        "str"
    }

    fn repr(&self) -> String {
        quote(&self.0)
    }

    fn str(&self) -> String {
        self.0.clone()
    }

    fn is_truthy(&self) -> bool {
        !self.0.is_empty()
    }

    fn equals(&self, other: &Value) -> bool {
        other.downcast_ref::<Str>().map_or(false, |s| s.0 == self.0)
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

impl LenCapability for Str {
    fn len(&self) -> RuntimeResult<usize> {
        Ok(self.0.chars().count())
    }
}

impl HashCapability for Str {
    fn hash(&self) -> RuntimeResult<i64> {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        let hash = hasher.finish() as i64;
        Ok(if hash == -1 { -2 } else { hash })
    }
}

/// Quoted literal form. Double quotes only when the text has a single quote and no double quote.
fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = c as u32;
                if code < 0x100 {
                    out.push_str(&format!("\\x{:02x}", code));
                } else {
                    out.push_str(&format!("\\u{:04x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
