//! Built-in function library
//!
//! The callables installed into the `builtins` namespace. Each one declares a
//! signature, lets the binder validate the call, then either computes its
//! result directly or hands off to a capability protocol on an argument:
//! - Numeric dispatch: `abs`, `round`, `pow`, `divmod`
//! - Object protocols: `len`, `hash`, `callable`, `repr`
//! - Integer formatting: `bin`, `oct`, `hex`, `ord`, `chr`
//! - Output: `print`

use crate::config::BuiltinsConfig;
use crate::runtime::arith;
use crate::runtime::capabilities::Capability;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::module_runtime::{ModuleRegistry, ModuleRegistryBuilder, RegistryError};
use crate::runtime::objects::{StdStream, Str};
use crate::runtime::param_binding::{BoundArgs, Param, Signature};
use crate::runtime::values::{Arity, BuiltinFunction, Value};
use itertools::Itertools;

const ABS_DOC: &str = "Return the absolute value of the argument.";

const POW_DOC: &str = "Equivalent to base**exp with 2 arguments or base**exp % mod with 3 arguments.\n\n\
Some types, such as ints, are able to use a more efficient algorithm when\n\
invoked using the three argument form.";

const ROUND_DOC: &str = "Round a number to a given precision in decimal digits.\n\n\
The return value is an integer if ndigits is None. Otherwise the return\n\
value has the same type as the number; an omitted ndigits means 0.\n\
ndigits may be negative.";

const PRINT_DOC: &str = "Prints the values to a stream, or to sys.stdout by default.\n\n\
  sep\n    string inserted between values, default a space.\n\
  end\n    string appended after the last value, default a newline.\n\
  file\n    a file-like object (stream); defaults to the current sys.stdout.\n\
  flush\n    whether to forcibly flush the stream.";

const DIVMOD_DOC: &str = "Return the tuple (x//y, x%y).  Invariant: div*y + mod == x.";

const LEN_DOC: &str = "Return the number of items in a container.";

const HASH_DOC: &str = "Return the hash value for the given object.\n\n\
Two objects that compare equal must also have the same hash value, but the\n\
reverse is not necessarily true.";

const CALLABLE_DOC: &str = "Return whether the object is callable (i.e., some kind of function).";

const REPR_DOC: &str = "Return the canonical string representation of the object.";

const BIN_DOC: &str = "Return the binary representation of an integer.\n\n   >>> bin(2796202)\n   '0b1010101010101010101010'";

const OCT_DOC: &str = "Return the octal representation of an integer.\n\n   >>> oct(342391)\n   '0o1234567'";

const HEX_DOC: &str = "Return the hexadecimal representation of an integer.\n\n   >>> hex(12648430)\n   '0xc0ffee'";

const ORD_DOC: &str = "Return the Unicode code point for a one-character string.";

const CHR_DOC: &str = "Return a Unicode string of one character with ordinal i; 0 <= i <= 0x10ffff.";

/// The built-in function library.
pub struct BuiltinLibrary;

impl BuiltinLibrary {
    /// Every built-in descriptor, in listing order.
    ///
    /// `print` captures the configured output stream as its default `file`.
    pub fn functions(config: &BuiltinsConfig) -> Vec<BuiltinFunction> {
        let stdout = Value::new(StdStream::new(config.output));

        vec![
            BuiltinFunction::new(
                "abs",
                ABS_DOC,
                Signature::new(Arity::Fixed(1), vec![Param::positional("x")]),
                |_, args| Self::abs(args),
            ),
            BuiltinFunction::new(
                "pow",
                POW_DOC,
                Signature::new(
                    Arity::Range(2, 3),
                    vec![
                        Param::positional("base"),
                        Param::positional("exp"),
                        Param::positional("mod").with_default(Value::none()),
                    ],
                ),
                |_, args| Self::pow(args),
            ),
            BuiltinFunction::new(
                "round",
                ROUND_DOC,
                Signature::new(
                    Arity::Range(1, 2),
                    vec![
                        Param::required("number"),
                        Param::optional("ndigits", Value::from(0i64)),
                    ],
                ),
                |_, args| Self::round(args),
            ),
            BuiltinFunction::new(
                "print",
                PRINT_DOC,
                Signature::new(
                    Arity::Variadic(0),
                    vec![
                        Param::keyword_only("sep", Value::from(" ")),
                        Param::keyword_only("end", Value::from("\n")),
                        Param::keyword_only("file", Value::none()),
                        Param::keyword_only("flush", Value::bool(false)),
                    ],
                ),
                move |_, args| Self::print(&stdout, args),
            ),
            BuiltinFunction::new(
                "divmod",
                DIVMOD_DOC,
                Signature::new(
                    Arity::Fixed(2),
                    vec![Param::positional("x"), Param::positional("y")],
                ),
                |_, args| arith::divmod(args.get(0), args.get(1)),
            ),
            unary("len", LEN_DOC, "obj", Self::len),
            unary("hash", HASH_DOC, "obj", Self::hash),
            unary("callable", CALLABLE_DOC, "obj", |obj| {
                Ok(Value::bool(arith::is_callable(obj)))
            }),
            unary("repr", REPR_DOC, "obj", |obj| Ok(Value::from(obj.repr()))),
            unary("bin", BIN_DOC, "number", |n| {
                Self::radix(n, "0b", |digits| format!("{:b}", digits))
            }),
            unary("oct", OCT_DOC, "number", |n| {
                Self::radix(n, "0o", |digits| format!("{:o}", digits))
            }),
            unary("hex", HEX_DOC, "number", |n| {
                Self::radix(n, "0x", |digits| format!("{:x}", digits))
            }),
            unary("ord", ORD_DOC, "c", Self::ord),
            unary("chr", CHR_DOC, "i", Self::chr),
        ]
    }

    fn abs(args: &BoundArgs) -> RuntimeResult<Value> {
        arith::abs(args.get(0))
    }

    /// `pow(base, exp[, mod])`; an omitted `mod` binds to `None`.
    fn pow(args: &BoundArgs) -> RuntimeResult<Value> {
        arith::pow(args.get(0), args.get(1), args.get(2))
    }

    fn round(args: &BoundArgs) -> RuntimeResult<Value> {
        arith::round(args.get(0), args.get(1))
    }

    /// Writes the joined `str()` forms plus `end` to the stream in a single write.
    fn print(default_file: &Value, args: &BoundArgs) -> RuntimeResult<Value> {
        let sep = text_or_default(args.get(0), " ", "sep")?;
        let end = text_or_default(args.get(1), "\n", "end")?;
        let file = if args.get(2).is_none() {
            default_file
        } else {
            args.get(2)
        };
        let stream = arith::require(file, Capability::Write, |o| o.as_write())?;

        let mut text = args.rest().iter().map(|value| value.str()).join(sep);
        text.push_str(end);
        stream.write(&text)?;

        if args.get(3).is_truthy() {
            stream.flush()?;
        }
        Ok(Value::none())
    }

    fn len(obj: &Value) -> RuntimeResult<Value> {
        let len = arith::len(obj)?;
        let len = i64::try_from(len)
            .map_err(|_| RuntimeError::Overflow(format!("length {} does not fit an int", len)))?;
        Ok(Value::from(len))
    }

    fn hash(obj: &Value) -> RuntimeResult<Value> {
        Ok(Value::from(arith::hash(obj)?))
    }

    /// Prefixed digits of an integer-like value, sign first (`-0x1f`).
    fn radix(number: &Value, prefix: &str, digits: fn(u64) -> String) -> RuntimeResult<Value> {
        let n = arith::index(number)?;
        let sign = if n < 0 { "-" } else { "" };
        Ok(Value::from(format!(
            "{}{}{}",
            sign,
            prefix,
            digits(n.unsigned_abs())
        )))
    }

    fn ord(c: &Value) -> RuntimeResult<Value> {
        let Some(text) = c.downcast_ref::<Str>() else {
            return Err(RuntimeError::type_error(
                "string of length 1",
                c.type_name(),
                "ord",
            ));
        };
        let mut chars = text.as_str().chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(Value::from(i64::from(u32::from(ch)))),
            _ => Err(RuntimeError::type_error(
                "a character",
                &format!("string of length {}", text.as_str().chars().count()),
                "ord",
            )),
        }
    }

    fn chr(i: &Value) -> RuntimeResult<Value> {
        let code = arith::index(i)?;
        u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .map(|ch| Value::from(ch.to_string()))
            .ok_or_else(|| {
                RuntimeError::InvalidArgument(format!(
                    "chr() arg not in range(0x110000) or is a surrogate: {}",
                    code
                ))
            })
    }
}

/// Descriptor for a one-argument, positional-only built-in.
fn unary(
    name: &str,
    doc: &str,
    param: &'static str,
    body: fn(&Value) -> RuntimeResult<Value>,
) -> BuiltinFunction {
    BuiltinFunction::new(
        name,
        doc,
        Signature::new(Arity::Fixed(1), vec![Param::positional(param)]),
        move |_, args| body(args.get(0)),
    )
}

/// `print`'s `sep`/`end`: `None` selects the default, anything else must be a `str`.
fn text_or_default<'a>(value: &'a Value, default: &'a str, name: &str) -> RuntimeResult<&'a str> {
    if value.is_none() {
        return Ok(default);
    }
    value
        .downcast_ref::<Str>()
        .map(Str::as_str)
        .ok_or_else(|| {
            RuntimeError::type_error("None or str", value.type_name(), &format!("print({})", name))
        })
}

/// Registers the `builtins` namespace: the single flat registration pass.
///
/// Names listed in `config.disabled` are left out; an unknown name there is
/// reported but not fatal.
pub fn load_builtins(
    builder: &mut ModuleRegistryBuilder,
    config: &BuiltinsConfig,
) -> Result<(), RegistryError> {
    let functions = BuiltinLibrary::functions(config);

    for name in &config.disabled {
        if !functions.iter().any(|f| &f.name == name) {
            tracing::warn!(name = %name, "disabled builtin does not exist");
        }
    }

    let enabled: Vec<BuiltinFunction> = functions
        .into_iter()
        .filter(|f| config.is_enabled(&f.name))
        .collect();
    tracing::debug!(
        namespace = %config.namespace,
        count = enabled.len(),
        output = config.output.as_str(),
        "loading builtins"
    );
    builder.register(&config.namespace, &config.doc, enabled)
}

/// Builds a frozen registry holding only the `builtins` namespace.
pub fn create_builtin_registry(config: &BuiltinsConfig) -> Result<ModuleRegistry, RegistryError> {
    let mut builder = ModuleRegistry::builder();
    load_builtins(&mut builder, config)?;
    Ok(builder.build())
}
