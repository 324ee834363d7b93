use std::fmt;

use anyhow::{bail, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One of the four named corners of the corridor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Corner { NW, NE, SE, SW }

impl Corner {
    /// Ring order of the corridor polygon.
    pub const ALL: [Corner; 4] = [Corner::NW, Corner::NE, Corner::SE, Corner::SW];

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Corner::NW => 0,
            Corner::NE => 1,
            Corner::SE => 2,
            Corner::SW => 3,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            Corner::NW => "NW",
            Corner::NE => "NE",
            Corner::SE => "SE",
            Corner::SW => "SW",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A single test on a street name, as written in the configuration file:
/// `{"contains": "lexington"}` or `{"matches": "\\b\\d+ street\\b"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePattern {
    /// Case-insensitive substring.
    Contains(String),
    /// Case-insensitive regular expression.
    Matches(String),
}

/// Configured corner rule: which pair of street names meets at `corner`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerRule {
    pub corner: Corner,
    pub first: Vec<NamePattern>,
    pub second: Vec<NamePattern>,
}

#[derive(Clone, Debug)]
enum Matcher {
    Substring(String), // lowercased
    Regex(Regex),
}

impl Matcher {
    fn compile(pattern: &NamePattern) -> Result<Self> {
        Ok(match pattern {
            NamePattern::Contains(text) => Matcher::Substring(text.to_lowercase()),
            NamePattern::Matches(expr) => match RegexBuilder::new(expr).case_insensitive(true).build() {
                Ok(regex) => Matcher::Regex(regex),
                Err(err) => bail!(ConfigError::InvalidParameter {
                    name: "corridor.corners",
                    reason: format!("bad name pattern {expr:?}: {err}"),
                }),
            },
        })
    }

    #[inline]
    fn test(&self, lowered: &str) -> bool {
        match self {
            Matcher::Substring(text) => lowered.contains(text.as_str()),
            Matcher::Regex(regex) => regex.is_match(lowered),
        }
    }
}

/// Compiled corner rule. A street pair matches when one name satisfies every
/// pattern of `first` and the other satisfies every pattern of `second`.
#[derive(Clone, Debug)]
pub struct CornerPredicate {
    corner: Corner,
    first: Vec<Matcher>,
    second: Vec<Matcher>,
}

impl CornerPredicate {
    /// Compile a configured rule.
    pub fn compile(rule: &CornerRule) -> Result<Self> {
        if rule.first.is_empty() || rule.second.is_empty() {
            bail!(ConfigError::InvalidParameter {
                name: "corridor.corners",
                reason: format!("{} rule needs at least one pattern per street", rule.corner),
            });
        }
        Ok(Self {
            corner: rule.corner,
            first: rule.first.iter().map(Matcher::compile).collect::<Result<_>>()?,
            second: rule.second.iter().map(Matcher::compile).collect::<Result<_>>()?,
        })
    }

    /// Shorthand for a rule made only of substring tests.
    pub fn contains(corner: Corner, first: &[&str], second: &[&str]) -> Self {
        Self {
            corner,
            first: first.iter().map(|s| Matcher::Substring(s.to_lowercase())).collect(),
            second: second.iter().map(|s| Matcher::Substring(s.to_lowercase())).collect(),
        }
    }

    #[inline] pub fn corner(&self) -> Corner { self.corner }

    /// Whether the pair of (lowercased) names satisfies this rule, in either order.
    pub(crate) fn matches_pair(&self, a: &str, b: &str) -> bool {
        let first = |name: &str| self.first.iter().all(|m| m.test(name));
        let second = |name: &str| self.second.iter().all(|m| m.test(name));
        (first(a) && second(b)) || (first(b) && second(a))
    }

    /// Whether a single (lowercased) name could take part in a match.
    pub(crate) fn mentions(&self, name: &str) -> bool {
        self.first.iter().all(|m| m.test(name)) || self.second.iter().all(|m| m.test(name))
    }
}

/// Compile the configured rules, checking that each corner appears exactly once.
pub fn compile_rules(rules: &[CornerRule]) -> Result<Vec<CornerPredicate>> {
    let predicates = rules.iter().map(CornerPredicate::compile).collect::<Result<Vec<_>>>()?;
    check_predicates(&predicates)?;
    Ok(predicates)
}

pub(crate) fn check_predicates(predicates: &[CornerPredicate]) -> Result<()> {
    let mut seen = [false; 4];
    for predicate in predicates {
        let slot = &mut seen[predicate.corner.index()];
        if *slot {
            bail!(ConfigError::InvalidCornerPredicates(format!("{} listed twice", predicate.corner)));
        }
        *slot = true;
    }
    if predicates.len() != 4 {
        bail!(ConfigError::InvalidCornerPredicates(format!("{} predicates", predicates.len())));
    }
    Ok(())
}
