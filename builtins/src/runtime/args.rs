// Argument container handed from the execution engine to a built-in call

use crate::runtime::values::Value;
use indexmap::IndexMap;

/// Positional and keyword arguments of one call.
///
/// Built by the caller, read-only for the callee, dropped when the call returns.
#[derive(Debug, Clone, Default)]
pub struct Args {
    positional: Vec<Value>,
    keyword: IndexMap<String, Value>,
}

impl Args {
    pub fn new(positional: Vec<Value>) -> Self {
        Args {
            positional,
            keyword: IndexMap::new(),
        }
    }

    pub fn with_keywords(positional: Vec<Value>, keyword: IndexMap<String, Value>) -> Self {
        Args {
            positional,
            keyword,
        }
    }

    /// Adds a keyword argument while the container is being assembled.
    /// A repeated name replaces the earlier value.
    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.to_string(), value.into());
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> &IndexMap<String, Value> {
        &self.keyword
    }

    /// Number of positional arguments; keywords are counted separately.
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    /// True when the call carries no arguments of either kind.
    /// A keyword-only call is not empty even though `positional_len()` is zero.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

impl From<Vec<Value>> for Args {
    fn from(positional: Vec<Value>) -> Self {
        Args::new(positional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_and_keyword_counts_are_separate() {
        let args = Args::default().kwarg("sep", "-");
        assert_eq!(args.positional_len(), 0);
        assert_eq!(args.keywords().len(), 1);
        assert!(!args.is_empty());

        let args = Args::from(vec![Value::from(1i64), Value::from(2i64)]);
        assert_eq!(args.positional_len(), 2);
        assert!(!args.is_empty());
        assert!(Args::default().is_empty());
    }
}
