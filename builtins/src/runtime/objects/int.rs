use super::float::float_divmod;
use super::{int_equals_float, int_like, Float, Tuple};
use crate::runtime::arith;
use crate::runtime::capabilities::{
    AbsCapability, DivModCapability, HashCapability, IndexCapability, PowCapability,
    RoundCapability,
};
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::{Object, Value};
use std::any::Any;

// Numeric hashes are reduced modulo the Mersenne prime 2^61 - 1 so equal
// int and float values hash alike.
const HASH_MODULUS: i128 = (1 << 61) - 1;

pub(crate) fn hash_int(value: i64) -> i64 {
    let reduced = ((value as i128).abs() % HASH_MODULUS) as i64;
    let hash = if value < 0 { -reduced } else { reduced };
    if hash == -1 {
        -2
    } else {
        hash
    }
}

fn overflow(what: &str) -> RuntimeError {
    RuntimeError::Overflow(format!("{} does not fit in a 64-bit integer", what))
}

/// Fixed-width integer (`int`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int(pub i64);

impl Object for Int {
    fn type_name(&self) -> &str {
        "int"
    }

    fn repr(&self) -> String {
        self.0.to_string()
    }

    fn is_truthy(&self) -> bool {
        self.0 != 0
    }

    fn equals(&self, other: &Value) -> bool {
        match int_like(other) {
            Some(i) => i == self.0,
            None => other
                .downcast_ref::<Float>()
                .map_or(false, |f| int_equals_float(self.0, f.0)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_abs(&self) -> Option<&dyn AbsCapability> {
        Some(self)
    }

    fn as_round(&self) -> Option<&dyn RoundCapability> {
        Some(self)
    }

    fn as_pow(&self) -> Option<&dyn PowCapability> {
        Some(self)
    }

    fn as_divmod(&self) -> Option<&dyn DivModCapability> {
        Some(self)
    }

    fn as_hash(&self) -> Option<&dyn HashCapability> {
        Some(self)
    }

    fn as_index(&self) -> Option<&dyn IndexCapability> {
        Some(self)
    }
}

impl AbsCapability for Int {
    fn abs(&self) -> RuntimeResult<Value> {
        self.0
            .checked_abs()
            .map(Value::from)
            .ok_or_else(|| overflow("absolute value"))
    }
}

impl RoundCapability for Int {
    fn round(&self, ndigits: &Value) -> RuntimeResult<Value> {
        if ndigits.is_none() {
            return Ok(Value::from(self.0));
        }
        let ndigits = arith::index(ndigits)?;
        round_int(self.0, ndigits).map(Value::from)
    }
}

/// Rounds to a multiple of `10^-ndigits`, halves to even.
fn round_int(value: i64, ndigits: i64) -> RuntimeResult<i64> {
    if ndigits >= 0 {
        return Ok(value);
    }
    let exponent = ndigits.unsigned_abs();
    if exponent > 37 {
        return Ok(0);
    }
    let step = 10i128.pow(exponent as u32);
    let wide = value as i128;
    let quotient = wide.div_euclid(step);
    let twice_remainder = 2 * wide.rem_euclid(step);
    let quotient = if twice_remainder > step || (twice_remainder == step && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    };
    i64::try_from(quotient * step).map_err(|_| overflow("rounded value"))
}

impl PowCapability for Int {
    fn pow(&self, exponent: &Value, modulus: Option<&Value>) -> RuntimeResult<Value> {
        let Some(exponent) = int_like(exponent) else {
            return Ok(Value::not_implemented());
        };
        match modulus {
            None => int_pow(self.0, exponent),
            Some(modulus) => match int_like(modulus) {
                Some(modulus) => int_pow_mod(self.0, exponent, modulus).map(Value::from),
                None => Ok(Value::not_implemented()),
            },
        }
    }
}

fn int_pow(base: i64, exponent: i64) -> RuntimeResult<Value> {
    if exponent < 0 {
        if base == 0 {
            return Err(RuntimeError::DivisionByZero);
        }
        return Ok(Value::from((base as f64).powf(exponent as f64)));
    }
    match u32::try_from(exponent) {
        Ok(exponent) => base
            .checked_pow(exponent)
            .map(Value::from)
            .ok_or_else(|| overflow("power")),
        Err(_) => match base {
            0 | 1 => Ok(Value::from(base)),
            -1 => Ok(Value::from(if exponent % 2 == 0 { 1i64 } else { -1 })),
            _ => Err(overflow("power")),
        },
    }
}

fn int_pow_mod(base: i64, exponent: i64, modulus: i64) -> RuntimeResult<i64> {
    if modulus == 0 {
        return Err(RuntimeError::InvalidArgument(
            "pow() 3rd argument cannot be 0".to_string(),
        ));
    }
    let m = (modulus as i128).abs();
    let mut base = (base as i128).rem_euclid(m);
    if exponent < 0 {
        base = mod_inverse(base, m).ok_or_else(|| {
            RuntimeError::InvalidArgument("base is not invertible for the given modulus".to_string())
        })?;
    }

    let mut result = 1 % m;
    let mut remaining = exponent.unsigned_abs();
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result * base % m;
        }
        base = base * base % m;
        remaining >>= 1;
    }

    // The result takes the sign of the modulus.
    let result = if modulus < 0 && result != 0 {
        result - m
    } else {
        result
    };
    i64::try_from(result).map_err(|_| overflow("modular power"))
}

fn mod_inverse(a: i128, m: i128) -> Option<i128> {
    let (mut old_r, mut r) = (a, m);
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    (old_r == 1).then(|| old_s.rem_euclid(m))
}

impl DivModCapability for Int {
    fn divmod(&self, other: &Value) -> RuntimeResult<Value> {
        if let Some(divisor) = int_like(other) {
            let (q, r) = int_divmod(self.0, divisor)?;
            return Ok(Value::new(Tuple::new(vec![Value::from(q), Value::from(r)])));
        }
        if let Some(divisor) = other.downcast_ref::<Float>() {
            let (q, r) = float_divmod(self.0 as f64, divisor.0)?;
            return Ok(Value::new(Tuple::new(vec![Value::from(q), Value::from(r)])));
        }
        Ok(Value::not_implemented())
    }
}

/// Floor division and the matching remainder (remainder takes the divisor's sign).
fn int_divmod(a: i64, b: i64) -> RuntimeResult<(i64, i64)> {
    if b == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    let q = a.checked_div(b).ok_or_else(|| overflow("quotient"))?;
    let r = a % b;
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok((q - 1, r + b))
    } else {
        Ok((q, r))
    }
}

impl HashCapability for Int {
    fn hash(&self) -> RuntimeResult<i64> {
        Ok(hash_int(self.0))
    }
}

impl IndexCapability for Int {
    fn index(&self) -> RuntimeResult<i64> {
        Ok(self.0)
    }
}

/// Boolean (`bool`); behaves as the integers 0 and 1 in arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bool(pub bool);

impl Bool {
    fn as_int(&self) -> Int {
        Int(self.0 as i64)
    }
}

impl Object for Bool {
    fn type_name(&self) -> &str {
        "bool"
    }

    fn repr(&self) -> String {
        let text = if self.0 { "True" } else { "False" };
        text.to_string()
    }

    fn is_truthy(&self) -> bool {
        self.0
    }

    fn equals(&self, other: &Value) -> bool {
        self.as_int().equals(other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_abs(&self) -> Option<&dyn AbsCapability> {
        Some(self)
    }

    fn as_round(&self) -> Option<&dyn RoundCapability> {
        Some(self)
    }

    fn as_pow(&self) -> Option<&dyn PowCapability> {
        Some(self)
    }

    fn as_divmod(&self) -> Option<&dyn DivModCapability> {
        Some(self)
    }

    fn as_hash(&self) -> Option<&dyn HashCapability> {
        Some(self)
    }

    fn as_index(&self) -> Option<&dyn IndexCapability> {
        Some(self)
    }
}

impl AbsCapability for Bool {
    fn abs(&self) -> RuntimeResult<Value> {
        self.as_int().abs()
    }
}

impl RoundCapability for Bool {
    fn round(&self, ndigits: &Value) -> RuntimeResult<Value> {
        self.as_int().round(ndigits)
    }
}

impl PowCapability for Bool {
    fn pow(&self, exponent: &Value, modulus: Option<&Value>) -> RuntimeResult<Value> {
        self.as_int().pow(exponent, modulus)
    }
}

impl DivModCapability for Bool {
    fn divmod(&self, other: &Value) -> RuntimeResult<Value> {
        self.as_int().divmod(other)
    }
}

impl HashCapability for Bool {
    fn hash(&self) -> RuntimeResult<i64> {
        Ok(self.0 as i64)
    }
}

impl IndexCapability for Bool {
    fn index(&self) -> RuntimeResult<i64> {
        Ok(self.0 as i64)
    }
}
