//! Candidate-match patterns for collision watching.
//!
//! A small CSS-like subset: a comma-separated list of compound selectors,
//! each an optional kind (or `*`) followed by any number of `.class` and
//! `#name` parts. `player`, `.enemy`, `wall.solid, #boss` and `*` are all
//! valid. Combinators are not supported.

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;

use std::fmt;
use std::str::FromStr;

use crate::consts::MATCH_EVERYTHING;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("selector {0:?} is empty or has an empty alternative")]
    Empty(String),
    #[error("unexpected character {found:?} in selector {selector:?}")]
    Unexpected { selector: String, found: char },
    #[error("`{marker}` must be followed by a name in selector {selector:?}")]
    MissingIdentifier { selector: String, marker: char },
}

/// Anything a selector can be tested against.
pub trait Matchable {
    fn kind(&self) -> &str;
    fn name(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
struct Compound {
    /// `None` for `*` or when only classes/name are given.
    kind: Option<String>,
    name: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, target: &impl Matchable) -> bool {
        self.kind.as_deref().is_none_or(|kind| kind == target.kind())
            && self.name.as_deref().is_none_or(|name| target.name() == Some(name))
            && self.classes.iter().all(|class| target.has_class(class))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

impl Selector {
    /// # Errors
    ///
    /// Returns a [`SelectorError`] describing the first malformed part.
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        let source = raw.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty(raw.to_owned()));
        }

        let alternatives = source
            .split(',')
            .map(|part| parse_compound(source, part.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { source: source.to_owned(), alternatives })
    }

    /// The `*` selector.
    #[must_use]
    pub fn everything() -> Self {
        Self { source: MATCH_EVERYTHING.to_owned(), alternatives: vec![Compound::default()] }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn matches(&self, target: &impl Matchable) -> bool {
        self.alternatives.iter().any(|c| c.matches(target))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn split_ident(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_ident_char(c)).unwrap_or(s.len());
    s.split_at(end)
}

fn parse_compound(source: &str, part: &str) -> Result<Compound, SelectorError> {
    if part.is_empty() {
        return Err(SelectorError::Empty(source.to_owned()));
    }

    let mut compound = Compound::default();
    let mut rest = part;

    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let (kind, after) = split_ident(rest);
        if !kind.is_empty() {
            compound.kind = Some(kind.to_owned());
        }
        rest = after;
    }

    while let Some(marker) = rest.chars().next() {
        if marker != '.' && marker != '#' {
            return Err(SelectorError::Unexpected { selector: source.to_owned(), found: marker });
        }
        let (ident, after) = split_ident(&rest[marker.len_utf8()..]);
        if ident.is_empty() {
            return Err(SelectorError::MissingIdentifier { selector: source.to_owned(), marker });
        }
        if marker == '.' {
            compound.classes.push(ident.to_owned());
        } else {
            compound.name = Some(ident.to_owned());
        }
        rest = after;
    }

    Ok(compound)
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
