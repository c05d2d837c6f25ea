//! Capability dispatch for type-dependent operations
//!
//! These free functions are what the built-ins (and an execution engine's own
//! operators) call. Each one looks up a single protocol on the operand and
//! either delegates to it or reports `UnsupportedOperation`.

use crate::runtime::capabilities::Capability;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::{Object, Value};

/// Fetches a capability from `value` or fails naming the value's type.
pub fn require<'a, C: ?Sized>(
    value: &'a Value,
    capability: Capability,
    query: impl FnOnce(&'a dyn Object) -> Option<&'a C>,
) -> RuntimeResult<&'a C> {
    tracing::trace!(operand = value.type_name(), %capability, "capability dispatch");
    query(&**value).ok_or_else(|| RuntimeError::unsupported(value.type_name(), capability.name()))
}

/// Treats a `NotImplemented` answer as a missing capability.
fn implemented(result: Value, operand: &Value, capability: Capability) -> RuntimeResult<Value> {
    if result.is_not_implemented() {
        Err(RuntimeError::unsupported(operand.type_name(), capability.name()))
    } else {
        Ok(result)
    }
}

pub fn abs(value: &Value) -> RuntimeResult<Value> {
    require(value, Capability::Abs, |o| o.as_abs())?.abs()
}

pub fn round(number: &Value, ndigits: &Value) -> RuntimeResult<Value> {
    require(number, Capability::Round, |o| o.as_round())?.round(ndigits)
}

/// `base ** exponent`, or `(base ** exponent) % modulus` when `modulus` is not `None`.
///
/// An omitted modulus and an explicit `None` are the same thing here. In the
/// two-argument form a base that declines (or lacks `PowCapability`) gives the
/// exponent's `ReflectedPowCapability` a chance before failing.
pub fn pow(base: &Value, exponent: &Value, modulus: &Value) -> RuntimeResult<Value> {
    let modulus = (!modulus.is_none()).then_some(modulus);

    if let Some(capability) = base.as_pow() {
        let result = capability.pow(exponent, modulus)?;
        if !result.is_not_implemented() {
            return Ok(result);
        }
    }

    if modulus.is_none() {
        if let Some(capability) = exponent.as_reflected_pow() {
            let result = capability.rpow(base)?;
            if !result.is_not_implemented() {
                return Ok(result);
            }
        }
    }

    Err(RuntimeError::unsupported(
        base.type_name(),
        Capability::Pow.name(),
    ))
}

pub fn divmod(dividend: &Value, divisor: &Value) -> RuntimeResult<Value> {
    let result = require(dividend, Capability::DivMod, |o| o.as_divmod())?.divmod(divisor)?;
    implemented(result, dividend, Capability::DivMod)
}

pub fn len(value: &Value) -> RuntimeResult<usize> {
    require(value, Capability::Len, |o| o.as_len())?.len()
}

pub fn hash(value: &Value) -> RuntimeResult<i64> {
    require(value, Capability::Hash, |o| o.as_hash())?.hash()
}

/// Integer value of anything implementing `IndexCapability`.
pub fn index(value: &Value) -> RuntimeResult<i64> {
    require(value, Capability::Index, |o| o.as_index())?.index()
}

pub fn is_callable(value: &Value) -> bool {
    value.as_call().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::objects::Tuple;
    use pretty_assertions::assert_eq;

    #[test]
    fn abs_dispatches_or_reports_type() {
        assert_eq!(abs(&Value::from(-5i64)).unwrap(), Value::from(5i64));
        assert_eq!(abs(&Value::from(-2.5)).unwrap(), Value::from(2.5));
        assert_eq!(
            abs(&Value::from("x")).unwrap_err(),
            RuntimeError::unsupported("str", "AbsCapability")
        );
    }

    #[test]
    fn pow_two_and_three_argument_forms() {
        let two = Value::from(2i64);
        let ten = Value::from(10i64);
        assert_eq!(pow(&two, &ten, &Value::none()).unwrap(), Value::from(1024i64));
        assert_eq!(
            pow(&two, &ten, &Value::from(1000i64)).unwrap(),
            Value::from(24i64)
        );
    }

    #[test]
    fn pow_falls_back_to_reflected_exponent() {
        let result = pow(&Value::from(4i64), &Value::from(0.5), &Value::none()).unwrap();
        assert_eq!(result, Value::from(2.0));
    }

    #[test]
    fn pow_modulus_with_float_is_unsupported() {
        let err = pow(&Value::from(2i64), &Value::from(0.5), &Value::from(3i64)).unwrap_err();
        assert_eq!(err, RuntimeError::unsupported("int", "PowCapability"));
    }

    #[test]
    fn pow_on_string_names_the_base_type() {
        let err = pow(&Value::from("a"), &Value::from(2i64), &Value::none()).unwrap_err();
        assert_eq!(err, RuntimeError::unsupported("str", "PowCapability"));
    }

    #[test]
    fn divmod_declined_operand() {
        let result = divmod(&Value::from(7i64), &Value::from(2i64)).unwrap();
        let expected = Value::new(Tuple::new(vec![Value::from(3i64), Value::from(1i64)]));
        assert_eq!(result, expected);

        let err = divmod(&Value::from(7i64), &Value::from("2")).unwrap_err();
        assert_eq!(err, RuntimeError::unsupported("int", "DivModCapability"));
    }

    #[test]
    fn index_requires_integer_like() {
        assert_eq!(index(&Value::from(true)).unwrap(), 1);
        assert_eq!(
            index(&Value::from(1.5)).unwrap_err(),
            RuntimeError::unsupported("float", "IndexCapability")
        );
    }
}
