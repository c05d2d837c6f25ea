//! Capability protocols
//!
//! Each protocol is a narrow trait a value type may implement to opt into one
//! type-dependent operation. Types advertise a protocol through the matching
//! `Object::as_*` query; built-ins look the protocol up on the operand at call
//! time and fail with `UnsupportedOperation` when it is missing.
//!
//! Implementations that understand only some operand types return
//! `Value::not_implemented()` for the rest, so a reflected protocol on the
//! other operand can take over where one exists.

use crate::runtime::args::Args;
use crate::runtime::error::RuntimeResult;
use crate::runtime::values::Value;
use std::fmt;

/// Names of the protocols, used in dispatch errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Abs,
    Round,
    Pow,
    ReflectedPow,
    DivMod,
    Len,
    Hash,
    Index,
    Call,
    Write,
}

impl Capability {
    pub fn name(self) -> &'static str {
        match self {
            Capability::Abs => "AbsCapability",
            Capability::Round => "RoundCapability",
            Capability::Pow => "PowCapability",
            Capability::ReflectedPow => "ReflectedPowCapability",
            Capability::DivMod => "DivModCapability",
            Capability::Len => "LenCapability",
            Capability::Hash => "HashCapability",
            Capability::Index => "IndexCapability",
            Capability::Call => "CallCapability",
            Capability::Write => "WriteCapability",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// "Can compute its own absolute value."
pub trait AbsCapability {
    fn abs(&self) -> RuntimeResult<Value>;
}

/// "Can round itself to `ndigits` decimal digits."
///
/// `ndigits` arrives exactly as the caller passed it (or the integer zero);
/// validating it is up to the implementation.
pub trait RoundCapability {
    fn round(&self, ndigits: &Value) -> RuntimeResult<Value>;
}

/// "Can raise itself to a power", optionally reduced by a modulus.
pub trait PowCapability {
    fn pow(&self, exponent: &Value, modulus: Option<&Value>) -> RuntimeResult<Value>;
}

/// "Can be used as the exponent of a base that declined the operation."
pub trait ReflectedPowCapability {
    fn rpow(&self, base: &Value) -> RuntimeResult<Value>;
}

/// "Can compute floor quotient and remainder against another value."
pub trait DivModCapability {
    fn divmod(&self, other: &Value) -> RuntimeResult<Value>;
}

/// "Has a length."
pub trait LenCapability {
    fn len(&self) -> RuntimeResult<usize>;
}

/// "Has a hash consistent with its equality."
pub trait HashCapability {
    fn hash(&self) -> RuntimeResult<i64>;
}

/// "Is losslessly usable as an integer" (sequence indices, `chr`, `hex`).
pub trait IndexCapability {
    fn index(&self) -> RuntimeResult<i64>;
}

/// "Can be called with an argument container."
pub trait CallCapability {
    fn call(&self, args: &Args) -> RuntimeResult<Value>;
}

/// Text output sink used by `print`.
pub trait WriteCapability {
    fn write(&self, text: &str) -> RuntimeResult<()>;
    fn flush(&self) -> RuntimeResult<()>;
}
