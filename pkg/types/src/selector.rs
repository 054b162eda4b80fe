//! Label and field selectors.
//!
//! A selector is a conjunction of `key=value` / `key!=value` terms. The
//! empty selector matches everything. The text form is the one the API
//! server accepts in the `labels` and `fields` query parameters:
//! `tier=backend,env!=dev`.

use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub key: String,
    pub operator: Operator,
    pub value: String,
}

impl Requirement {
    fn matches(&self, set: &BTreeMap<String, String>) -> bool {
        let actual = set.get(&self.key).map(String::as_str);
        match self.operator {
            Operator::Equals => actual == Some(self.value.as_str()),
            // An absent key is "not equal" to any value.
            Operator::NotEquals => actual != Some(self.value.as_str()),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.key, self.operator.as_str(), self.value)
    }
}

/// Immutable conjunctive filter over labels or fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    terms: Vec<Requirement>,
}

impl Selector {
    /// The match-all selector.
    pub fn everything() -> Self {
        Self::default()
    }

    /// Equality selector for every pair in `set`, ordered by key.
    pub fn from_set<K, V>(set: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let ordered: BTreeMap<String, String> = set
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            terms: ordered
                .into_iter()
                .map(|(key, value)| Requirement {
                    key,
                    operator: Operator::Equals,
                    value,
                })
                .collect(),
        }
    }

    /// A copy of this selector with one more `key=value` term.
    pub fn and_equals(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.and(key.into(), Operator::Equals, value.into())
    }

    /// A copy of this selector with one more `key!=value` term.
    pub fn and_not_equals(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.and(key.into(), Operator::NotEquals, value.into())
    }

    fn and(&self, key: String, operator: Operator, value: String) -> Self {
        let mut terms = self.terms.clone();
        terms.push(Requirement {
            key,
            operator,
            value,
        });
        Self { terms }
    }

    /// Parse the text form. Whitespace around terms is ignored; `==` is
    /// accepted as a synonym for `=`.
    pub fn parse(s: &str) -> Result<Self> {
        let mut terms = Vec::new();
        for raw in s.split(',') {
            let term = raw.trim();
            if term.is_empty() {
                continue;
            }
            let (key, operator, value) = if let Some((k, v)) = term.split_once("!=") {
                (k, Operator::NotEquals, v)
            } else if let Some((k, v)) = term.split_once("==") {
                (k, Operator::Equals, v)
            } else if let Some((k, v)) = term.split_once('=') {
                (k, Operator::Equals, v)
            } else {
                bail!("invalid selector term '{}': expected key=value or key!=value", term);
            };
            let key = key.trim();
            if key.is_empty() {
                bail!("invalid selector term '{}': empty key", term);
            }
            terms.push(Requirement {
                key: key.to_string(),
                operator,
                value: value.trim().to_string(),
            });
        }
        Ok(Self { terms })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.terms
    }

    /// True when every term holds for `set`.
    pub fn matches(&self, set: &BTreeMap<String, String>) -> bool {
        self.terms.iter().all(|t| t.matches(set))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

impl FromStr for Selector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
