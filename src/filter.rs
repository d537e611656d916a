// Drop filters: regex patterns compiled once at backend setup and matched
// against an event's group and message on every log call.
use crate::domain::FilterError;
use regex::Regex;

/// Compiled drop-list of a backend.
///
/// Immutable after [`DropFilter::compile`]; shared read-only across concurrent
/// `log` calls.
#[derive(Debug, Clone, Default)]
pub struct DropFilter {
    patterns: Vec<Regex>,
}

impl DropFilter {
    /// A filter that never drops.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile every present pattern, skipping `None` entries.
    ///
    /// Fails on the first pattern that is not a valid regular expression.
    pub fn compile<I, S>(patterns: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();

        for pattern in patterns.into_iter().flatten() {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|e| FilterError::InvalidPattern {
                pattern: pattern.to_string(),
                source: e,
            })?;
            compiled.push(regex);
        }

        Ok(Self { patterns: compiled })
    }

    /// True iff any pattern matches the group or the message.
    pub fn should_drop(&self, group: &str, message: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.is_match(group) || pattern.is_match(message))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Source strings of the compiled patterns, in compilation order.
    pub fn patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(Regex::as_str).collect()
    }
}
