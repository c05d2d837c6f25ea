use super::int::hash_int;
use super::{float_like, int_equals_float, int_like, Tuple};
use crate::runtime::arith;
use crate::runtime::capabilities::{
    AbsCapability, DivModCapability, HashCapability, PowCapability, ReflectedPowCapability,
    RoundCapability,
};
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::{Object, Value};
use ordered_float::OrderedFloat;
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Beyond these `ndigits` bounds rounding cannot change a double (or always gives zero).
const ROUND_DIGITS_MAX: i64 = 323;
const ROUND_DIGITS_MIN: i64 = -308;

/// Fraction digits in the exact decimal expansion of the smallest subnormal.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Double precision float (`float`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float(pub f64);

impl Object for Float {
    fn type_name(&self) -> &str {
        "float"
    }

    fn repr(&self) -> String {
        format_float(self.0)
    }

    fn is_truthy(&self) -> bool {
        self.0 != 0.0
    }

    fn equals(&self, other: &Value) -> bool {
        match other.downcast_ref::<Float>() {
            Some(f) => f.0 == self.0,
            None => int_like(other).map_or(false, |i| int_equals_float(i, self.0)),
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

    fn as_reflected_pow(&self) -> Option<&dyn ReflectedPowCapability> {
        Some(self)
    }

    fn as_divmod(&self) -> Option<&dyn DivModCapability> {
        Some(self)
    }

    fn as_hash(&self) -> Option<&dyn HashCapability> {
        Some(self)
    }
}

/// Shortest round-trip text, always marked as a float (`1.0`, `1e+16`, `inf`).
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text,
        };
    }
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl AbsCapability for Float {
    fn abs(&self) -> RuntimeResult<Value> {
        Ok(Value::from(self.0.abs()))
    }
}

impl RoundCapability for Float {
    fn round(&self, ndigits: &Value) -> RuntimeResult<Value> {
        if ndigits.is_none() {
            return round_to_int(self.0);
        }
        let ndigits = arith::index(ndigits)?;
        round_float(self.0, ndigits).map(Value::from)
    }
}

fn round_to_int(value: f64) -> RuntimeResult<Value> {
    if value.is_nan() {
        return Err(RuntimeError::InvalidArgument(
            "cannot convert float NaN to integer".to_string(),
        ));
    }
    let rounded = value.round_ties_even();
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(RuntimeError::Overflow(format!(
            "cannot convert float {} to integer",
            format_float(value)
        )));
    }
    Ok(Value::from(rounded as i64))
}

/// Rounds to `ndigits` decimal digits, halves to even, on the exact decimal value.
fn round_float(value: f64, ndigits: i64) -> RuntimeResult<f64> {
    if !value.is_finite() || value == 0.0 || ndigits > ROUND_DIGITS_MAX {
        return Ok(value);
    }
    if ndigits < ROUND_DIGITS_MIN {
        return Ok(0.0f64.copysign(value));
    }

    // Every finite double has a terminating expansion of at most 1074 fraction digits.
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let Some((whole, fraction)) = exact.split_once('.') else {
        return Err(RuntimeError::InternalError(format!(
            "unexpected float expansion: {}",
            exact
        )));
    };
    let digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes())
        .map(|b| b - b'0')
        .collect();

    let keep = whole.len() as i64 + ndigits;
    if keep < 0 {
        return Ok(0.0f64.copysign(value));
    }
    let keep = keep as usize;
    let (kept, dropped) = digits.split_at(keep.min(digits.len()));

    let round_up = match dropped.split_first() {
        Some((&first, tail)) if first == 5 => {
            tail.iter().any(|&d| d != 0) || kept.last().map_or(false, |&d| d % 2 == 1)
        }
        Some((&first, _)) => first > 5,
        None => false,
    };

    let mut kept = kept.to_vec();
    if round_up {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, 1);
        }
    }

    let mantissa: String = kept.iter().map(|&d| char::from(b'0' + d)).collect();
    let mantissa = if mantissa.is_empty() { "0" } else { mantissa.as_str() };
    let rounded: f64 = format!("{}e{}", mantissa, -ndigits)
        .parse()
        .map_err(|e| RuntimeError::InternalError(format!("rounded float did not parse: {}", e)))?;

    if rounded.is_finite() {
        Ok(rounded.copysign(value))
    } else {
        Err(RuntimeError::Overflow(
            "rounded value too large to represent".to_string(),
        ))
    }
}

impl PowCapability for Float {
    fn pow(&self, exponent: &Value, modulus: Option<&Value>) -> RuntimeResult<Value> {
        if modulus.is_some() {
            return Err(RuntimeError::type_error(
                "int",
                "float",
                "pow() with 3 arguments",
            ));
        }
        match float_like(exponent) {
            Some(exponent) => float_pow(self.0, exponent).map(Value::from),
            None => Ok(Value::not_implemented()),
        }
    }
}

impl ReflectedPowCapability for Float {
    fn rpow(&self, base: &Value) -> RuntimeResult<Value> {
        match int_like(base) {
            Some(base) => float_pow(base as f64, self.0).map(Value::from),
            None => Ok(Value::not_implemented()),
        }
    }
}

pub(crate) fn float_pow(base: f64, exponent: f64) -> RuntimeResult<f64> {
    if base == 0.0 && exponent < 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    if base < 0.0 && exponent.is_finite() && exponent.fract() != 0.0 {
        return Err(RuntimeError::InvalidArgument(
            "negative number cannot be raised to a fractional power".to_string(),
        ));
    }
    let result = base.powf(exponent);
    if result.is_infinite() && base.is_finite() && exponent.is_finite() {
        return Err(RuntimeError::Overflow(
            "numerical result out of range".to_string(),
        ));
    }
    Ok(result)
}

impl DivModCapability for Float {
    fn divmod(&self, other: &Value) -> RuntimeResult<Value> {
        match float_like(other) {
            Some(divisor) => {
                let (q, r) = float_divmod(self.0, divisor)?;
                Ok(Value::new(Tuple::new(vec![Value::from(q), Value::from(r)])))
            }
            None => Ok(Value::not_implemented()),
        }
    }
}

/// Floor quotient and remainder of two doubles; the remainder takes the divisor's sign.
pub(crate) fn float_divmod(a: f64, b: f64) -> RuntimeResult<(f64, f64)> {
    if b == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    let mut remainder = a % b;
    let mut quotient = (a - remainder) / b;
    if remainder != 0.0 {
        if (b < 0.0) != (remainder < 0.0) {
            remainder += b;
            quotient -= 1.0;
        }
    } else {
        remainder = 0.0f64.copysign(b);
    }
    let floor = if quotient != 0.0 {
        let floor = quotient.floor();
        if quotient - floor > 0.5 {
            floor + 1.0
        } else {
            floor
        }
    } else {
        0.0f64.copysign(a / b)
    };
    Ok((floor, remainder))
}

impl HashCapability for Float {
    fn hash(&self) -> RuntimeResult<i64> {
        let value = self.0;
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            return Ok(hash_int(value as i64));
        }
        let mut hasher = DefaultHasher::new();
        OrderedFloat(value).hash(&mut hasher);
        let hash = hasher.finish() as i64;
        Ok(if hash == -1 { -2 } else { hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repr_marks_floats() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(3.14), "3.14");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NAN), "nan");
    }

    #[test]
    fn rounding_to_digits() {
        assert_eq!(round_float(3.14159, 2).unwrap(), 3.14);
        assert_eq!(round_float(2.5, 0).unwrap(), 2.0);
        assert_eq!(round_float(3.5, 0).unwrap(), 4.0);
        assert_eq!(round_float(1234.5, -2).unwrap(), 1200.0);
        assert_eq!(round_float(0.1, 40).unwrap(), 0.1);
        assert_eq!(round_float(-0.4, 0).unwrap().to_bits(), (-0.0f64).to_bits());
        assert_eq!(round_float(9.96, 1).unwrap(), 10.0);
    }

    #[test]
    fn rounding_uses_the_stored_decimal_value() {
        // 2657.4025 is stored slightly above the tie, 2.675 slightly below it.
        assert_eq!(round_float(2657.4025, 3).unwrap(), 2657.403);
        assert_eq!(round_float(2.675, 2).unwrap(), 2.67);
        // Exact binary ties go to the even digit.
        assert_eq!(round_float(0.125, 2).unwrap(), 0.12);
        assert_eq!(round_float(0.375, 2).unwrap(), 0.38);
    }

    #[test]
    fn tiny_values_round_away_below_many_digits() {
        assert_eq!(round_float(1e-30, 25).unwrap(), 0.0);
        assert_eq!(round_float(1.23456e-25, 27).unwrap(), 1.23e-25);
        assert_eq!(round_float(5e-324, 400).unwrap(), 5e-324);
        assert_eq!(round_float(1e300, -400).unwrap(), 0.0);
        assert!(matches!(
            round_float(f64::MAX, -308),
            Err(RuntimeError::Overflow(_))
        ));
    }

    #[test]
    fn ints_beyond_double_precision_are_not_equal() {
        let big = Value::from((1i64 << 53) + 1);
        let float = Value::from(2f64.powi(53));
        assert!(!Float(2f64.powi(53)).equals(&big));
        assert_ne!(big, float);
        assert_eq!(Value::from(1i64 << 53), float);
        assert_eq!(
            arith::hash(&Value::from(1i64 << 53)).unwrap(),
            arith::hash(&float).unwrap()
        );
        assert_ne!(Value::from(i64::MAX), Value::from(i64::MAX as f64));
        assert_ne!(Value::from(1i64), Value::from(1.5));
    }

    #[test]
    fn rounding_to_int_rejects_non_finite() {
        assert_eq!(round_to_int(2.5).unwrap(), Value::from(2i64));
        assert!(matches!(round_to_int(f64::NAN), Err(RuntimeError::InvalidArgument(_))));
        assert!(matches!(round_to_int(f64::INFINITY), Err(RuntimeError::Overflow(_))));
    }

    #[test]
    fn float_divmod_floors() {
        assert_eq!(float_divmod(7.5, 2.0).unwrap(), (3.0, 1.5));
        assert_eq!(float_divmod(-7.5, 2.0).unwrap(), (-4.0, 0.5));
        assert_eq!(float_divmod(1.0, 0.0).unwrap_err(), RuntimeError::DivisionByZero);
    }

    #[test]
    fn float_pow_domain() {
        assert!((float_pow(2.0, 0.5).unwrap() - 2f64.sqrt()).abs() < 1e-15);
        assert!(float_pow(-8.0, 1.0 / 3.0).is_err());
        assert_eq!(float_pow(0.0, -1.0).unwrap_err(), RuntimeError::DivisionByZero);
        assert!(matches!(float_pow(10.0, 400.0), Err(RuntimeError::Overflow(_))));
    }

    #[test]
    fn integral_floats_hash_like_ints() {
        assert_eq!(Float(3.0).hash().unwrap(), hash_int(3));
        assert_eq!(Float(-1.0).hash().unwrap(), -2);
    }
}
