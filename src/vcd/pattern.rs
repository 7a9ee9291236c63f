//! Declarative structural predicates over a parsed trace.
//!
//! A [`Pattern`] is a conjunction of [`Predicate`]s. The same pattern can be
//! checked against a scope or a signal; predicates that do not apply to the
//! kind of node being checked are skipped, except for type predicates, which
//! never match a node of the other kind.
//!
//! Patterns are usually loaded from a mapping such as
//!
//! ```json
//! {"identifier": "alu", "type": "module",
//!  "signals": {"clk": {"size": 1}, "out": {"size": 32, "type": "wire"}},
//!  "children": {"adder": {}}}
//! ```
//!
//! where every key is optional and an absent key matches anything.
use std::collections::BTreeMap;

use serde::Deserialize;

use super::errors::PatternError;
use super::signal::{SignalTrace, SignalType};
use super::types::{ScopeIdx, ScopeType, VCD};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Name of the scope or signal.
    Identifier(String),
    /// Declared bit width, only checked on signals.
    Size(u32),
    ScopeType(ScopeType),
    SignalType(SignalType),
    /// The scope must declare a signal with this name that satisfies the
    /// nested pattern.
    Signal(String, Pattern),
    /// The scope must contain a child scope with this name that satisfies the
    /// nested pattern.
    Child(String, Pattern),
}

impl Predicate {
    /// Resolves a `type` keyword against the scope kinds first, then the
    /// signal kinds.
    pub fn from_type_keyword(word: &str) -> Result<Predicate, PatternError> {
        if let Some(scope_type) = ScopeType::from_keyword(word) {
            return Ok(Predicate::ScopeType(scope_type));
        }
        match SignalType::from_keyword(word) {
            Some(signal_type) => Ok(Predicate::SignalType(signal_type)),
            None => Err(PatternError::UnknownType(word.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPattern")]
pub struct Pattern {
    predicates: Vec<Predicate>,
}

/// Wire form of a [`Pattern`]. Unrecognized keys are ignored.
#[derive(Debug, Deserialize)]
struct RawPattern {
    identifier: Option<String>,
    size: Option<u32>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    signals: BTreeMap<String, Pattern>,
    #[serde(default)]
    children: BTreeMap<String, Pattern>,
}

impl TryFrom<RawPattern> for Pattern {
    type Error = PatternError;

    fn try_from(raw: RawPattern) -> Result<Self, Self::Error> {
        let mut predicates = vec![];

        if let Some(identifier) = raw.identifier {
            predicates.push(Predicate::Identifier(identifier));
        }
        if let Some(size) = raw.size {
            predicates.push(Predicate::Size(size));
        }
        if let Some(kind) = raw.kind {
            predicates.push(Predicate::from_type_keyword(&kind)?);
        }
        for (name, pattern) in raw.signals {
            predicates.push(Predicate::Signal(name, pattern));
        }
        for (name, pattern) in raw.children {
            predicates.push(Predicate::Child(name, pattern));
        }

        Ok(Pattern { predicates })
    }
}

impl Pattern {
    /// The empty conjunction, which matches every scope and signal.
    pub fn any() -> Pattern {
        Pattern::default()
    }

    pub fn from_predicates(predicates: Vec<Predicate>) -> Pattern {
        Pattern { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Pattern {
        self.predicates.push(Predicate::Identifier(identifier.into()));
        self
    }

    pub fn with_size(mut self, size: u32) -> Pattern {
        self.predicates.push(Predicate::Size(size));
        self
    }

    pub fn with_scope_type(mut self, scope_type: ScopeType) -> Pattern {
        self.predicates.push(Predicate::ScopeType(scope_type));
        self
    }

    pub fn with_signal_type(mut self, signal_type: SignalType) -> Pattern {
        self.predicates.push(Predicate::SignalType(signal_type));
        self
    }

    pub fn with_signal(mut self, name: impl Into<String>, pattern: Pattern) -> Pattern {
        self.predicates.push(Predicate::Signal(name.into(), pattern));
        self
    }

    pub fn with_child(mut self, name: impl Into<String>, pattern: Pattern) -> Pattern {
        self.predicates.push(Predicate::Child(name.into(), pattern));
        self
    }

    pub(crate) fn matches_signal(&self, signal: &SignalTrace) -> bool {
        self.predicates.iter().all(|predicate| match predicate {
            Predicate::Identifier(identifier) => signal.name() == identifier.as_str(),
            Predicate::Size(size) => signal.num_bits() == *size,
            Predicate::SignalType(signal_type) => signal.signal_type() == *signal_type,
            Predicate::ScopeType(_) => false,
            Predicate::Signal(..) | Predicate::Child(..) => true,
        })
    }

    pub(crate) fn matches_scope(&self, vcd: &VCD, scope_idx: ScopeIdx) -> bool {
        let scope = vcd.scope(scope_idx);
        self.predicates.iter().all(|predicate| match predicate {
            Predicate::Identifier(identifier) => scope.name() == identifier.as_str(),
            Predicate::Size(_) => true,
            Predicate::ScopeType(scope_type) => scope.scope_type() == *scope_type,
            Predicate::SignalType(_) => false,
            Predicate::Signal(name, pattern) => vcd
                .signal_by_name(scope_idx, name)
                .map_or(false, |signal| pattern.matches_signal(signal)),
            Predicate::Child(name, pattern) => vcd
                .child_scope_by_name(scope_idx, name)
                .map_or(false, |child_idx| pattern.matches_scope(vcd, child_idx)),
        })
    }
}

impl VCD {
    /// Checks the scope at `scope_idx` against `pattern`.
    pub fn match_scope(&self, scope_idx: ScopeIdx, pattern: &Pattern) -> bool {
        pattern.matches_scope(self, scope_idx)
    }

    /// Returns the first child of `scope_idx`, in declaration order, that
    /// satisfies `pattern`.
    pub fn match_children(&self, scope_idx: ScopeIdx, pattern: &Pattern) -> Option<ScopeIdx> {
        self.scope(scope_idx)
            .child_scopes
            .iter()
            .copied()
            .find(|child_idx| pattern.matches_scope(self, *child_idx))
    }
}
