//! Reference value types
//!
//! A minimal set of concrete types so the built-ins have something to dispatch
//! on. They opt into capabilities exactly like an embedder's own types would;
//! nothing in the dispatch path names them.

mod float;
mod function;
mod int;
mod singletons;
mod stream;
mod string;
mod tuple;

pub use float::Float;
pub use function::NativeFunction;
pub use int::{Bool, Int};
pub use singletons::{NoneType, NotImplementedType};
pub use stream::{StdStream, TextSink};
pub use string::Str;
pub use tuple::Tuple;

use crate::runtime::values::Value;

/// Integer payload of `int` and `bool` values.
pub(crate) fn int_like(value: &Value) -> Option<i64> {
    if let Some(i) = value.downcast_ref::<Int>() {
        Some(i.0)
    } else {
        value.downcast_ref::<Bool>().map(|b| b.0 as i64)
    }
}

/// Exact int/float equality: no rounding of the int through `f64`.
pub(crate) fn int_equals_float(i: i64, f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 && f as i64 == i
}

/// Float payload of `float`, `int` and `bool` values.
pub(crate) fn float_like(value: &Value) -> Option<f64> {
    match value.downcast_ref::<Float>() {
        Some(f) => Some(f.0),
        None => int_like(value).map(|i| i as f64),
    }
}
