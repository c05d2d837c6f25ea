// Runtime value handles for the built-in layer
// Values are opaque here: everything goes through the Object trait and its capability queries.

use crate::runtime::args::Args;
use crate::runtime::capabilities::{
    AbsCapability, CallCapability, DivModCapability, HashCapability, IndexCapability,
    LenCapability, PowCapability, ReflectedPowCapability, RoundCapability, WriteCapability,
};
use crate::runtime::error::RuntimeResult;
use crate::runtime::objects::{Bool, Float, Int, NoneType, NotImplementedType, Str};
use crate::runtime::param_binding::{BoundArgs, Signature};
use once_cell::sync::Lazy;
use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

static NONE: Lazy<Value> = Lazy::new(|| Value::new(NoneType));
static NOT_IMPLEMENTED: Lazy<Value> = Lazy::new(|| Value::new(NotImplementedType));
static TRUE: Lazy<Value> = Lazy::new(|| Value::new(Bool(true)));
static FALSE: Lazy<Value> = Lazy::new(|| Value::new(Bool(false)));

/// Behaviour every runtime object exposes to this layer.
///
/// Capability queries default to `None`; a type opts into a protocol by
/// overriding the matching `as_*` method to return `Some(self)`. The
/// dispatcher never inspects concrete types.
pub trait Object: fmt::Debug + Send + Sync + Any {
    /// Display name of the object's type, e.g. `"int"`.
    fn type_name(&self) -> &str;

    /// Unambiguous textual form (what `repr()` returns).
    fn repr(&self) -> String;

    /// Readable textual form (what `print()` writes). Defaults to `repr`.
    fn str(&self) -> String {
        self.repr()
    }

    fn is_truthy(&self) -> bool {
        true
    }

    /// Value equality beyond identity.
    fn equals(&self, _other: &Value) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;

    fn as_abs(&self) -> Option<&dyn AbsCapability> {
        None
    }

    fn as_round(&self) -> Option<&dyn RoundCapability> {
        None
    }

    fn as_pow(&self) -> Option<&dyn PowCapability> {
        None
    }

    fn as_reflected_pow(&self) -> Option<&dyn ReflectedPowCapability> {
        None
    }

    fn as_divmod(&self) -> Option<&dyn DivModCapability> {
        None
    }

    fn as_len(&self) -> Option<&dyn LenCapability> {
        None
    }

    fn as_hash(&self) -> Option<&dyn HashCapability> {
        None
    }

    fn as_index(&self) -> Option<&dyn IndexCapability> {
        None
    }

    fn as_call(&self) -> Option<&dyn CallCapability> {
        None
    }

    fn as_write(&self) -> Option<&dyn WriteCapability> {
        None
    }
}

/// Shared, immutable handle to a runtime object.
#[derive(Clone)]
pub struct Value(Arc<dyn Object>);

impl Value {
    pub fn new<T: Object>(object: T) -> Self {
        Value(Arc::new(object))
    }

    pub fn from_arc(object: Arc<dyn Object>) -> Self {
        Value(object)
    }

    /// The `None` singleton, also used as the "absent argument" sentinel.
    pub fn none() -> Self {
        NONE.clone()
    }

    /// The `NotImplemented` singleton a capability returns to decline an operand.
    pub fn not_implemented() -> Self {
        NOT_IMPLEMENTED.clone()
    }

    pub fn bool(b: bool) -> Self {
        if b {
            TRUE.clone()
        } else {
            FALSE.clone()
        }
    }

    pub fn is_none(&self) -> bool {
        self.downcast_ref::<NoneType>().is_some()
    }

    pub fn is_not_implemented(&self) -> bool {
        self.downcast_ref::<NotImplementedType>().is_some()
    }

    /// Identity comparison (the `is` operator).
    pub fn is(&self, other: &Value) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Deref for Value {
    type Target = dyn Object;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.repr())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.str())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.is(other) || self.0.equals(other)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::new(Int(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::new(Float(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::new(Str::new(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::new(Str::new(s))
    }
}

/// Arity contract of a built-in: how many positional arguments it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Range(usize, usize),
    Variadic(usize), // Minimum number of arguments
}

impl Arity {
    pub fn min(&self) -> usize {
        match *self {
            Arity::Fixed(n) => n,
            Arity::Range(min, _) => min,
            Arity::Variadic(min) => min,
        }
    }

    /// Upper bound, `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        match *self {
            Arity::Fixed(n) => Some(n),
            Arity::Range(_, max) => Some(max),
            Arity::Variadic(_) => None,
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min() && self.max().map_or(true, |max| count <= max)
    }
}

pub type BuiltinFn = Arc<dyn Fn(&Value, &BoundArgs) -> RuntimeResult<Value> + Send + Sync>;

/// Callable descriptor: a native function as it is registered in a namespace.
#[derive(Clone)]
pub struct BuiltinFunction {
    pub name: String,
    pub doc: String,
    pub signature: Signature,
    pub func: BuiltinFn,
}

impl BuiltinFunction {
    pub fn new<F>(name: &str, doc: &str, signature: Signature, func: F) -> Self
    where
        F: Fn(&Value, &BoundArgs) -> RuntimeResult<Value> + Send + Sync + 'static,
    {
        BuiltinFunction {
            name: name.to_string(),
            doc: doc.to_string(),
            signature,
            func: Arc::new(func),
        }
    }

    pub fn arity(&self) -> Arity {
        self.signature.arity
    }

    pub fn accepts_keywords(&self) -> bool {
        self.signature.accepts_keywords()
    }

    /// Binds `args` against the signature, then runs the native body.
    pub fn invoke(&self, receiver: &Value, args: &Args) -> RuntimeResult<Value> {
        tracing::trace!(
            function = %self.name,
            positional = args.positional_len(),
            keywords = args.keywords().len(),
            "invoking builtin"
        );
        let bound = self.signature.bind(args, &self.name)?;
        (self.func)(receiver, &bound)
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .field("arity", &self.signature.arity)
            .finish()
    }
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        // Compare builtin functions by name and arity, not by function pointer
        self.name == other.name && self.signature.arity == other.signature.arity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_keep_identity() {
        assert!(Value::none().is(&Value::none()));
        assert!(Value::bool(true).is(&Value::from(true)));
        assert!(!Value::none().is(&Value::not_implemented()));
        assert!(Value::none().is_none());
        assert!(!Value::from(0i64).is_none());
    }

    #[test]
    fn arity_bounds() {
        assert_eq!(Arity::Fixed(1).max(), Some(1));
        assert_eq!(Arity::Range(2, 3).min(), 2);
        assert_eq!(Arity::Variadic(0).max(), None);
        assert!(Arity::Variadic(1).accepts(40));
        assert!(!Arity::Range(1, 2).accepts(3));
        assert!(!Arity::Fixed(1).accepts(0));
    }

    #[test]
    fn equality_is_identity_or_value() {
        let a = Value::from("abc");
        assert_eq!(a, a.clone());
        assert_eq!(Value::from("abc"), Value::from("abc"));
        assert_eq!(Value::from(3i64), Value::from(3.0));
        assert_ne!(Value::from(3i64), Value::from("3"));
    }
}
