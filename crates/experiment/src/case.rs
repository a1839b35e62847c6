//! A single enumerable axis of an experiment.

use std::hash::{Hash, Hasher};

use crate::error::ExperimentError;

/// Characters that would break path or template substitution.
const FORBIDDEN: &[char] = &['{', '}', '/', '\\', '\0'];

/// Check that `token` can be substituted into a path template.
///
/// Returns the reason it cannot, if any.
pub(crate) fn check_token(token: &str) -> Option<String> {
    if token.is_empty() {
        return Some("empty token".to_string());
    }
    if token == "." || token == ".." {
        return Some(format!("'{token}' is not a valid path segment"));
    }
    if let Some(c) = token.chars().find(|c| FORBIDDEN.contains(c)) {
        return Some(format!("'{token}' contains forbidden character {c:?}"));
    }
    None
}

/// One axis of the parameter space: a short key used in templates and as a
/// dimension name, a descriptive name, and an ordered list of values.
///
/// Cases are immutable once built. Equality and hashing consider only the
/// key.
#[derive(Debug, Clone)]
pub struct Case {
    key: String,
    long_name: String,
    values: Vec<String>,
}

impl Case {
    /// Create a case.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::InvalidCase`] if the key is not a valid
    /// token (or contains whitespace), if `values` is empty or has
    /// duplicates, or if any value is empty, `.`/`..`, or contains a brace,
    /// a path separator, or NUL.
    pub fn new<I, S>(
        key: impl Into<String>,
        long_name: impl Into<String>,
        values: I,
    ) -> Result<Self, ExperimentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = key.into();
        let invalid = |reason: String| ExperimentError::InvalidCase {
            key: key.clone(),
            reason,
        };

        if let Some(reason) = check_token(&key) {
            return Err(invalid(format!("bad key: {reason}")));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(invalid("bad key: contains whitespace".to_string()));
        }

        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(invalid("no values".to_string()));
        }
        for (i, value) in values.iter().enumerate() {
            if let Some(reason) = check_token(value) {
                return Err(invalid(format!("bad value: {reason}")));
            }
            if values[..i].contains(value) {
                return Err(invalid(format!("duplicate value '{value}'")));
            }
        }

        Ok(Self {
            key,
            long_name: long_name.into(),
            values,
        })
    }

    /// Short key, used as template placeholder and dimension name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human-readable name.
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Values in declaration order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Iterate over values in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.values.iter()
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `false` for every constructed case; [`Case::new`] rejects empty value
    /// lists.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of `value` in declaration order.
    pub fn position(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    /// Whether `value` is declared for this case.
    pub fn contains(&self, value: &str) -> bool {
        self.position(value).is_some()
    }

    /// Compare every field, not just the key.
    pub(crate) fn same_as(&self, other: &Case) -> bool {
        self.key == other.key && self.long_name == other.long_name && self.values == other.values
    }
}

impl PartialEq for Case {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Case {}

impl Hash for Case {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<'a> IntoIterator for &'a Case {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
