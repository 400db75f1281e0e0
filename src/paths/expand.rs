//! Template Expansion
//!
//! Expansion of one pattern into many paths belongs to the orchestration
//! engine. Resolvers receive it as an [`Expander`]; [`ProductExpander`]
//! reproduces the engine's default behaviour for standalone use.

use std::fmt;

use super::template::render;

/// Ordered list of placeholder names and the values each may take.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    entries: Vec<(String, Vec<String>)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a placeholder with several candidate values.
    pub fn with<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = values,
            None => self.entries.push((name, values)),
        }
        self
    }

    /// Adds a placeholder with exactly one value.
    pub fn with_value(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(name, [value.into()])
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Expands a pattern into every combination of its substitutions.
pub trait Expander {
    fn expand(&self, pattern: &str, substitutions: &Substitutions) -> Vec<String>;
}

impl<F> Expander for F
where
    F: Fn(&str, &Substitutions) -> Vec<String>,
{
    fn expand(&self, pattern: &str, substitutions: &Substitutions) -> Vec<String> {
        self(pattern, substitutions)
    }
}

/// Cartesian-product expansion.
///
/// Names vary in declaration order, the first one slowest. A name with no
/// values yields no paths at all; placeholders not listed stay literal.
///
/// # Example
///
/// ```
/// use rattle::paths::{Expander, ProductExpander, Substitutions};
///
/// let subs = Substitutions::new()
///     .with_value("sample", "s1")
///     .with("read_group", ["rg1", "rg2"]);
/// let paths = ProductExpander.expand("{sample}/{read_group}.bam", &subs);
/// assert_eq!(paths, vec!["s1/rg1.bam", "s1/rg2.bam"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductExpander;

impl Expander for ProductExpander {
    fn expand(&self, pattern: &str, substitutions: &Substitutions) -> Vec<String> {
        let mut combinations: Vec<Vec<(&str, &str)>> = vec![Vec::new()];

        for (name, values) in substitutions.iter() {
            combinations = combinations
                .iter()
                .flat_map(|partial| {
                    values.iter().map(move |value| {
                        let mut next = partial.clone();
                        next.push((name, value.as_str()));
                        next
                    })
                })
                .collect();
        }

        combinations
            .iter()
            .map(|assignment| {
                render(pattern, |placeholder| {
                    assignment
                        .iter()
                        .find(|(name, _)| *name == placeholder)
                        .map(|(_, value)| value.to_string())
                })
            })
            .collect()
    }
}

impl fmt::Display for Substitutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(name, values)| format!("{}={:?}", name, values))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
