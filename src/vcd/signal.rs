use super::errors::LookupError;
use super::pattern::Pattern;
use super::types::{ScopeIdx, SignalIdx};
use super::utilities::ordered_binary_lookup;

/// The value kinds a `$var` declaration may carry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SignalType {
    Event,
    Integer,
    Parameter,
    Real,
    RealTime,
    Reg,
    Str,
    Supply0,
    Supply1,
    Time,
    Tri,
    TriAnd,
    TriOr,
    TriReg,
    Tri0,
    Tri1,
    WAnd,
    Wire,
    WOr,
    SVInt,
    SVShortInt,
    SVLongInt,
    SVChar,
    SVLogic,
    SVBit,
    SVShortReal,
}

impl SignalType {
    /// Maps a `$var` keyword onto its signal type.
    pub fn from_keyword(word: &str) -> Option<SignalType> {
        let signal_type = match word {
            "event" => SignalType::Event,
            "integer" => SignalType::Integer,
            "parameter" => SignalType::Parameter,
            "real" => SignalType::Real,
            "realtime" => SignalType::RealTime,
            "reg" => SignalType::Reg,
            "string" => SignalType::Str,
            "supply0" => SignalType::Supply0,
            "supply1" => SignalType::Supply1,
            "time" => SignalType::Time,
            "tri" => SignalType::Tri,
            "triand" => SignalType::TriAnd,
            "trior" => SignalType::TriOr,
            "trireg" => SignalType::TriReg,
            "tri0" => SignalType::Tri0,
            "tri1" => SignalType::Tri1,
            "wand" => SignalType::WAnd,
            "wire" => SignalType::Wire,
            "wor" => SignalType::WOr,
            "int" => SignalType::SVInt,
            "int_s" | "shortint" => SignalType::SVShortInt,
            "int_l" | "longint" => SignalType::SVLongInt,
            "byte" | "char" => SignalType::SVChar,
            "logic" => SignalType::SVLogic,
            "bit" => SignalType::SVBit,
            "shortreal" => SignalType::SVShortReal,
            _ => return None,
        };
        Some(signal_type)
    }

    /// The canonical keyword for this type, as written in a `$var` command.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Event => "event",
            SignalType::Integer => "integer",
            SignalType::Parameter => "parameter",
            SignalType::Real => "real",
            SignalType::RealTime => "realtime",
            SignalType::Reg => "reg",
            SignalType::Str => "string",
            SignalType::Supply0 => "supply0",
            SignalType::Supply1 => "supply1",
            SignalType::Time => "time",
            SignalType::Tri => "tri",
            SignalType::TriAnd => "triand",
            SignalType::TriOr => "trior",
            SignalType::TriReg => "trireg",
            SignalType::Tri0 => "tri0",
            SignalType::Tri1 => "tri1",
            SignalType::WAnd => "wand",
            SignalType::Wire => "wire",
            SignalType::WOr => "wor",
            SignalType::SVInt => "int",
            SignalType::SVShortInt => "shortint",
            SignalType::SVLongInt => "longint",
            SignalType::SVChar => "byte",
            SignalType::SVLogic => "logic",
            SignalType::SVBit => "bit",
            SignalType::SVShortReal => "shortreal",
        }
    }
}

/// A single entry on a signal's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalChange {
    pub time: u64,
    // Two-state vectors are stored as unpadded base 2 digits, so `b0010`
    // becomes `10`. Everything else keeps the literal token.
    pub value: String,
}

/// A declared signal together with its complete value history.
#[derive(Debug)]
pub struct SignalTrace {
    pub(crate) name: String,
    pub(crate) signal_type: SignalType,
    pub(crate) num_bits: u32,
    // bit select that may trail the name, i.e. the `[7:0]` in
    // `$var wire 8 # data [7:0] $end`
    pub(crate) index: Option<String>,
    pub(crate) id_code: String,
    pub(crate) self_idx: SignalIdx,
    pub(crate) scope_parent: ScopeIdx,
    pub(crate) changes: Vec<SignalChange>,
}

impl SignalTrace {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signal_type(&self) -> SignalType {
        self.signal_type
    }

    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// The identifier code this signal was declared with. Several signals may
    /// share one code.
    pub fn id_code(&self) -> &str {
        &self.id_code
    }

    pub fn self_idx(&self) -> SignalIdx {
        self.self_idx
    }

    pub fn scope_parent(&self) -> ScopeIdx {
        self.scope_parent
    }

    pub fn changes(&self) -> &[SignalChange] {
        &self.changes
    }

    /// Returns the value the signal holds at `desired_time`, that is the value
    /// of the last change recorded at or before that time. When several
    /// changes share a timestamp the one appended last wins.
    pub fn value_at(&self, desired_time: u64) -> Result<&str, LookupError> {
        let idx = ordered_binary_lookup(&self.changes, desired_time)?;
        Ok(self.changes[idx].value.as_str())
    }

    /// Checks this signal against the leaf predicates of `pattern`.
    pub fn matches(&self, pattern: &Pattern) -> bool {
        pattern.matches_signal(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_with(changes: &[(u64, &str)]) -> SignalTrace {
        SignalTrace {
            name: "foo".to_string(),
            signal_type: SignalType::Wire,
            num_bits: 4,
            index: None,
            id_code: "!".to_string(),
            self_idx: SignalIdx(0),
            scope_parent: ScopeIdx(0),
            changes: changes
                .iter()
                .map(|(time, value)| SignalChange {
                    time: *time,
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn keywords() {
        for word in ["wire", "reg", "integer", "real", "string", "parameter", "logic"] {
            let signal_type = SignalType::from_keyword(word).unwrap();
            assert_eq!(signal_type.as_str(), word);
        }
        assert_eq!(SignalType::from_keyword("int_s"), Some(SignalType::SVShortInt));
        assert_eq!(SignalType::from_keyword("char"), Some(SignalType::SVChar));
        assert_eq!(SignalType::from_keyword("module"), None);
    }

    #[test]
    fn value_between_changes() {
        let trace = trace_with(&[(0, "0"), (5, "1010")]);
        assert_eq!(trace.value_at(3), Ok("0"));
        assert_eq!(trace.value_at(5), Ok("1010"));
        assert_eq!(trace.value_at(0), Ok("0"));
        assert_eq!(trace.value_at(1_000), Ok("1010"));
    }

    #[test]
    fn latest_change_wins_within_a_timestamp() {
        let trace = trace_with(&[(0, "x"), (10, "0"), (10, "1"), (10, "11"), (20, "0")]);
        assert_eq!(trace.value_at(10), Ok("11"));
        assert_eq!(trace.value_at(19), Ok("11"));
        assert_eq!(trace.value_at(9), Ok("x"));
    }

    #[test]
    fn query_before_first_change() {
        let trace = trace_with(&[(4, "1")]);
        assert_eq!(
            trace.value_at(3),
            Err(LookupError::PreTimeline {
                desired_time: 3,
                timeline_start_time: 4
            })
        );

        let empty = trace_with(&[]);
        assert_eq!(empty.value_at(0), Err(LookupError::EmptyTimeline));
    }

    #[test]
    fn monotonic_prefix() {
        let changes = [(2, "a"), (3, "b"), (3, "c"), (7, "d"), (8, "e"), (8, "f"), (15, "g")];
        let trace = trace_with(&changes);
        for t in 2..20u64 {
            let expected = changes
                .iter()
                .filter(|(time, _)| *time <= t)
                .last()
                .map(|(_, value)| *value)
                .unwrap();
            assert_eq!(trace.value_at(t), Ok(expected), "at time {t}");
        }
    }
}
