use crate::runtime::args::Args;
use crate::runtime::values::{Arity, Value};
use crate::runtime::{RuntimeError, RuntimeResult};
use std::collections::HashSet;

/// How a declared parameter may be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// By position only.
    Positional,
    /// By position or by keyword.
    PositionalOrKeyword,
    /// By keyword only; declared after all positional parameters.
    KeywordOnly,
}

/// One declared parameter slot.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: Option<Value>,
}

impl Param {
    pub fn positional(name: &'static str) -> Self {
        Param {
            name,
            kind: ParamKind::Positional,
            default: None,
        }
    }

    pub fn required(name: &'static str) -> Self {
        Param {
            name,
            kind: ParamKind::PositionalOrKeyword,
            default: None,
        }
    }

    pub fn optional(name: &'static str, default: Value) -> Self {
        Param {
            name,
            kind: ParamKind::PositionalOrKeyword,
            default: Some(default),
        }
    }

    pub fn keyword_only(name: &'static str, default: Value) -> Self {
        Param {
            name,
            kind: ParamKind::KeywordOnly,
            default: Some(default),
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn by_keyword(&self) -> bool {
        self.kind != ParamKind::Positional
    }
}

/// Result of binding: one value per declared parameter plus surplus positionals.
#[derive(Debug, Clone)]
pub struct BoundArgs {
    names: Vec<&'static str>,
    slots: Vec<Value>,
    rest: Vec<Value>,
}

impl BoundArgs {
    /// Value bound to the parameter at `index` in declaration order.
    ///
    /// Panics if `index` is outside the signature, which is a bug in the callable.
    pub fn get(&self, index: usize) -> &Value {
        &self.slots[index]
    }

    pub fn slot(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| *n == name)
            .map(|i| &self.slots[i])
    }

    /// Positional arguments beyond the declared positional parameters
    /// (only non-empty for variadic signatures).
    pub fn rest(&self) -> &[Value] {
        &self.rest
    }

    pub fn slots(&self) -> &[Value] {
        &self.slots
    }
}

/// Validates `args` against `min`/`max` positional arguments and fills `params`.
///
/// Positional values fill positional slots in order; when `max` is unbounded,
/// extra values land in [`BoundArgs::rest`]. Keyword values fill slots that
/// accept keywords and are still empty, left to right. Remaining empty slots
/// take their declared default.
pub fn bind(
    args: &Args,
    function: &str,
    min: usize,
    max: Option<usize>,
    params: &[Param],
) -> RuntimeResult<BoundArgs> {
    let positional = args.positional();
    let n = positional.len();

    if let Some(max) = max {
        if n > max {
            return Err(RuntimeError::arity(function, min, Some(max), n));
        }
    }

    let positional_slots = params
        .iter()
        .take_while(|p| p.kind != ParamKind::KeywordOnly)
        .count();

    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    for (slot, value) in slots.iter_mut().zip(positional.iter().take(positional_slots)) {
        *slot = Some(value.clone());
    }
    let rest = positional.iter().skip(positional_slots).cloned().collect();

    if let Some(unknown) = args
        .keywords()
        .keys()
        .find(|name| !params.iter().any(|p| p.by_keyword() && p.name == name.as_str()))
    {
        return Err(RuntimeError::UnknownKeyword {
            function: function.to_string(),
            name: unknown.clone(),
        });
    }

    for (slot, param) in slots.iter_mut().zip(params) {
        if !param.by_keyword() {
            continue;
        }
        if let Some(value) = args.keywords().get(param.name) {
            if slot.is_some() {
                return Err(RuntimeError::DuplicateArgument {
                    function: function.to_string(),
                    name: param.name.to_string(),
                });
            }
            *slot = Some(value.clone());
        }
    }

    if n < min && slots.iter().take(min).any(Option::is_none) {
        return Err(RuntimeError::arity(function, min, max, n));
    }

    let mut bound = Vec::with_capacity(params.len());
    for (slot, param) in slots.into_iter().zip(params) {
        match slot.or_else(|| param.default.clone()) {
            Some(value) => bound.push(value),
            None => {
                return Err(RuntimeError::InternalError(format!(
                    "{}(): parameter '{}' has no argument and no default",
                    function, param.name
                )))
            }
        }
    }

    Ok(BoundArgs {
        names: params.iter().map(|p| p.name).collect(),
        slots: bound,
        rest,
    })
}

/// Arity contract plus the parameter slots of a built-in.
#[derive(Debug, Clone)]
pub struct Signature {
    pub arity: Arity,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new(arity: Arity, params: Vec<Param>) -> Self {
        Signature { arity, params }
    }

    /// Whether any parameter can be supplied by keyword.
    pub fn accepts_keywords(&self) -> bool {
        self.params.iter().any(Param::by_keyword)
    }

    pub fn bind(&self, args: &Args, function: &str) -> RuntimeResult<BoundArgs> {
        bind(args, function, self.arity.min(), self.arity.max(), &self.params)
    }

    /// Checks that every call accepted by the arity can be bound.
    /// Run once at registration; a failure is a defect in the callable.
    pub fn validate(&self) -> Result<(), String> {
        let min = self.arity.min();
        if let Some(max) = self.arity.max() {
            if min > max {
                return Err(format!("minimum arity {} exceeds maximum {}", min, max));
            }
        }

        let positional = self
            .params
            .iter()
            .take_while(|p| p.kind != ParamKind::KeywordOnly)
            .count();
        if self.params[positional..]
            .iter()
            .any(|p| p.kind != ParamKind::KeywordOnly)
        {
            return Err("positional parameter declared after a keyword-only one".to_string());
        }

        match self.arity.max() {
            Some(max) if max != positional => {
                return Err(format!(
                    "arity allows {} positional arguments but {} slots are declared",
                    max, positional
                ))
            }
            None if positional < min => {
                return Err(format!(
                    "arity requires {} positional arguments but {} slots are declared",
                    min, positional
                ))
            }
            _ => {}
        }

        if let Some(p) = self
            .params
            .iter()
            .enumerate()
            .find(|(i, p)| (*i >= min || p.kind == ParamKind::KeywordOnly) && p.default.is_none())
            .map(|(_, p)| p)
        {
            return Err(format!("optional parameter '{}' has no default", p.name));
        }

        let mut seen = HashSet::new();
        if let Some(p) = self.params.iter().find(|p| !seen.insert(p.name)) {
            return Err(format!("parameter '{}' declared twice", p.name));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn round_params() -> Vec<Param> {
        vec![
            Param::required("number"),
            Param::optional("ndigits", Value::from(0i64)),
        ]
    }

    #[test]
    fn bind_fills_defaults_for_missing_trailing() {
        let x = Value::from(3.5);
        let bound = bind(&Args::new(vec![x.clone()]), "round", 1, Some(2), &round_params())
            .expect("bind");
        assert!(bound.get(0).is(&x));
        assert_eq!(bound.get(1), &Value::from(0i64));
        assert!(bound.rest().is_empty());
    }

    #[test]
    fn bind_rejects_too_few_and_too_many() {
        let err = bind(&Args::default(), "round", 1, Some(2), &round_params()).unwrap_err();
        assert_eq!(err, RuntimeError::arity("round", 1, Some(2), 0));

        let three = Args::new(vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)]);
        let err = bind(&three, "round", 1, Some(2), &round_params()).unwrap_err();
        assert_eq!(err, RuntimeError::arity("round", 1, Some(2), 3));
    }

    #[test]
    fn keywords_fill_unfilled_slots() {
        let args = Args::default().kwarg("ndigits", 2i64).kwarg("number", 2.5);
        let bound = bind(&args, "round", 1, Some(2), &round_params()).expect("bind");
        assert_eq!(bound.slot("number"), Some(&Value::from(2.5)));
        assert_eq!(bound.slot("ndigits"), Some(&Value::from(2i64)));
    }

    #[test]
    fn unknown_and_duplicate_keywords() {
        let args = Args::new(vec![Value::from(1.0)]).kwarg("digits", 2i64);
        let err = bind(&args, "round", 1, Some(2), &round_params()).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::UnknownKeyword {
                function: "round".to_string(),
                name: "digits".to_string()
            }
        );

        let args = Args::new(vec![Value::from(1.0)]).kwarg("number", 2.0);
        let err = bind(&args, "round", 1, Some(2), &round_params()).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::DuplicateArgument {
                function: "round".to_string(),
                name: "number".to_string()
            }
        );
    }

    #[test]
    fn positional_only_params_reject_keywords() {
        let params = vec![Param::positional("x")];
        let args = Args::default().kwarg("x", 1i64);
        let err = bind(&args, "abs", 1, Some(1), &params).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownKeyword { .. }));
    }

    #[test]
    fn variadic_collects_rest_and_keyword_only() {
        let params = vec![Param::keyword_only("sep", Value::from(" "))];
        let args = Args::new(vec![Value::from(1i64), Value::from(2i64)]).kwarg("sep", "-");
        let bound = bind(&args, "print", 0, None, &params).expect("bind");
        assert_eq!(bound.rest().len(), 2);
        assert_eq!(bound.get(0), &Value::from("-"));
    }

    #[test]
    fn validate_catches_inconsistent_signatures() {
        let missing_default = Signature::new(
            Arity::Range(1, 2),
            vec![Param::required("a"), Param::required("b")],
        );
        assert!(missing_default.validate().is_err());

        let too_few_slots = Signature::new(Arity::Range(1, 3), round_params());
        assert!(too_few_slots.validate().is_err());

        let inverted = Signature::new(Arity::Range(2, 1), round_params());
        assert!(inverted.validate().is_err());

        let ok = Signature::new(Arity::Range(1, 2), round_params());
        assert!(ok.validate().is_ok());
        assert!(ok.accepts_keywords());
    }
}
