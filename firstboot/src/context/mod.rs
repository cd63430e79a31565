//! Placeholder context: the read-only snapshot substituted into command
//! templates before execution.

use crate::errors::TaskError;
use std::collections::HashMap;

/// A mapping from placeholder names to their current values, resolved once
/// per stage run and read-only for its duration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderContext {
    values: HashMap<String, String>,
}

impl PlaceholderContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one placeholder value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Looks up a placeholder value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns the number of resolved placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no placeholders are resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Substitutes `{name}` markers in a template.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::Malformed` for an unclosed marker or a name with
    /// no resolved value; the task carrying the template fails, nothing else.
    pub fn substitute(&self, template: &str) -> Result<String, TaskError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                return Err(TaskError::malformed(format!(
                    "unclosed placeholder in template '{template}'"
                )));
            };
            let name = &after[..close];
            match self.values.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    return Err(TaskError::malformed(format!(
                        "unresolved placeholder '{{{name}}}'"
                    )))
                }
            }
            rest = &after[close + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

impl FromIterator<(String, String)> for PlaceholderContext {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_substitute_known_placeholders() {
        let ctx = PlaceholderContext::new()
            .with_value("product_key", "XXXXX-YYYYY")
            .with_value("computer_name", "WS-042");

        let out = ctx
            .substitute("slmgr /ipk {product_key} && rename {computer_name}")
            .unwrap();
        assert_eq!(out, "slmgr /ipk XXXXX-YYYYY && rename WS-042");
    }

    #[test]
    fn test_substitute_without_markers_is_identity() {
        let ctx = PlaceholderContext::new();
        assert_eq!(ctx.substitute("echo ok").unwrap(), "echo ok");
    }

    #[test]
    fn test_unresolved_placeholder_fails() {
        let ctx = PlaceholderContext::new();
        let err = ctx.substitute("echo {missing}").unwrap_err();
        assert!(matches!(err, TaskError::Malformed { .. }));
    }

    #[test]
    fn test_unclosed_marker_fails() {
        let ctx = PlaceholderContext::new().with_value("a", "1");
        assert!(ctx.substitute("echo {a").is_err());
    }
}
