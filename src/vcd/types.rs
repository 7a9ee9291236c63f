use std::collections::HashMap;
use std::fmt::Write;

use chrono::prelude::*;

use super::signal::SignalTrace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(pub String);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Timescale {
    Fs,
    Ps,
    Ns,
    Us,
    Ms,
    S,
    Unit,
}

impl Timescale {
    pub fn from_unit(word: &str) -> Option<Timescale> {
        match word {
            "fs" => Some(Timescale::Fs),
            "ps" => Some(Timescale::Ps),
            "ns" => Some(Timescale::Ns),
            "us" => Some(Timescale::Us),
            "ms" => Some(Timescale::Ms),
            "s" => Some(Timescale::S),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timescale::Fs => "fs",
            Timescale::Ps => "ps",
            Timescale::Ns => "ns",
            Timescale::Us => "us",
            Timescale::Ms => "ms",
            Timescale::S => "s",
            Timescale::Unit => "unit",
        }
    }
}

/// Header information of a trace. Every field is optional since traces in
/// the wild omit any of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// `$date` text exactly as written, words joined by single spaces.
    pub date: Option<String>,
    /// `date` interpreted as a calendar date, when it could be.
    pub parsed_date: Option<DateTime<Utc>>,
    pub version: Option<Version>,
    pub timescale: (Option<u32>, Timescale),
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            date: None,
            parsed_date: None,
            version: None,
            timescale: (None, Timescale::Unit),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScopeIdx(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SignalIdx(pub usize);

/// The kinds of namespace a `$scope` command may open.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScopeType {
    Module,
    Task,
    Function,
    Begin,
    Fork,
    Generate,
    Struct,
    Union,
    Class,
    Interface,
    Package,
    Program,
    VhdlArchitecture,
    VhdlProcedure,
    VhdlFunction,
    VhdlRecord,
    VhdlProcess,
    VhdlBlock,
    VhdlForGenerate,
    VhdlIfGenerate,
    VhdlGenerate,
    VhdlPackage,
}

impl ScopeType {
    pub fn from_keyword(word: &str) -> Option<ScopeType> {
        let scope_type = match word {
            "module" => ScopeType::Module,
            "task" => ScopeType::Task,
            "function" => ScopeType::Function,
            "begin" => ScopeType::Begin,
            "fork" => ScopeType::Fork,
            "generate" => ScopeType::Generate,
            "struct" => ScopeType::Struct,
            "union" => ScopeType::Union,
            "class" => ScopeType::Class,
            "interface" => ScopeType::Interface,
            "package" => ScopeType::Package,
            "program" => ScopeType::Program,
            "vhdl_architecture" => ScopeType::VhdlArchitecture,
            "vhdl_procedure" => ScopeType::VhdlProcedure,
            "vhdl_function" => ScopeType::VhdlFunction,
            "vhdl_record" => ScopeType::VhdlRecord,
            "vhdl_process" => ScopeType::VhdlProcess,
            "vhdl_block" => ScopeType::VhdlBlock,
            "vhdl_for_generate" => ScopeType::VhdlForGenerate,
            "vhdl_if_generate" => ScopeType::VhdlIfGenerate,
            "vhdl_generate" => ScopeType::VhdlGenerate,
            "vhdl_package" => ScopeType::VhdlPackage,
            _ => return None,
        };
        Some(scope_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeType::Module => "module",
            ScopeType::Task => "task",
            ScopeType::Function => "function",
            ScopeType::Begin => "begin",
            ScopeType::Fork => "fork",
            ScopeType::Generate => "generate",
            ScopeType::Struct => "struct",
            ScopeType::Union => "union",
            ScopeType::Class => "class",
            ScopeType::Interface => "interface",
            ScopeType::Package => "package",
            ScopeType::Program => "program",
            ScopeType::VhdlArchitecture => "vhdl_architecture",
            ScopeType::VhdlProcedure => "vhdl_procedure",
            ScopeType::VhdlFunction => "vhdl_function",
            ScopeType::VhdlRecord => "vhdl_record",
            ScopeType::VhdlProcess => "vhdl_process",
            ScopeType::VhdlBlock => "vhdl_block",
            ScopeType::VhdlForGenerate => "vhdl_for_generate",
            ScopeType::VhdlIfGenerate => "vhdl_if_generate",
            ScopeType::VhdlGenerate => "vhdl_generate",
            ScopeType::VhdlPackage => "vhdl_package",
        }
    }
}

#[derive(Debug)]
pub struct Scope {
    pub(crate) name: String,
    pub(crate) scope_type: ScopeType,

    pub(crate) parent_idx: Option<ScopeIdx>,
    pub(crate) self_idx: ScopeIdx,

    // both kept in declaration order, the lookups are keyed by name
    pub(crate) child_signals: Vec<SignalIdx>,
    pub(crate) child_scopes: Vec<ScopeIdx>,
    pub(crate) signal_lookup: HashMap<String, SignalIdx>,
    pub(crate) scope_lookup: HashMap<String, ScopeIdx>,
}

impl Scope {
    pub(crate) fn new(
        name: String,
        scope_type: ScopeType,
        parent_idx: Option<ScopeIdx>,
        self_idx: ScopeIdx,
    ) -> Scope {
        Scope {
            name,
            scope_type,
            parent_idx,
            self_idx,
            child_signals: vec![],
            child_scopes: vec![],
            signal_lookup: HashMap::new(),
            scope_lookup: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope_type(&self) -> ScopeType {
        self.scope_type
    }

    pub fn parent_idx(&self) -> Option<ScopeIdx> {
        self.parent_idx
    }

    pub fn self_idx(&self) -> ScopeIdx {
        self.self_idx
    }

    /// Registers `child` under `name`. A scope already registered under that
    /// name is replaced in place and returned.
    pub(crate) fn insert_child_scope(&mut self, name: &str, child: ScopeIdx) -> Option<ScopeIdx> {
        let replaced = self.scope_lookup.insert(name.to_string(), child);
        match replaced.and_then(|old| self.child_scopes.iter().position(|idx| *idx == old)) {
            Some(position) => self.child_scopes[position] = child,
            None => self.child_scopes.push(child),
        }
        replaced
    }

    /// Registers `signal` under `name`, following the same overwrite policy
    /// as [`Scope::insert_child_scope`].
    pub(crate) fn insert_signal(&mut self, name: &str, signal: SignalIdx) -> Option<SignalIdx> {
        let replaced = self.signal_lookup.insert(name.to_string(), signal);
        match replaced.and_then(|old| self.child_signals.iter().position(|idx| *idx == old)) {
            Some(position) => self.child_signals[position] = signal,
            None => self.child_signals.push(signal),
        }
        replaced
    }
}

/// A fully parsed trace. Scopes and signals live in flat arenas and refer to
/// each other by index; the synthetic root scope is always at index 0.
#[derive(Debug)]
pub struct VCD {
    pub(crate) metadata: Metadata,
    pub(crate) all_signals: Vec<SignalTrace>,
    pub(crate) all_scopes: Vec<Scope>,
    pub(crate) root_scope: ScopeIdx,
}

impl VCD {
    pub(crate) const ROOT_NAME: &'static str = "root";

    pub(crate) fn new() -> VCD {
        let root_scope = ScopeIdx(0);
        VCD {
            metadata: Metadata::default(),
            all_signals: vec![],
            all_scopes: vec![Scope::new(
                VCD::ROOT_NAME.to_string(),
                ScopeType::Module,
                None,
                root_scope,
            )],
            root_scope,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The synthetic scope that owns every top level scope of the trace, as
    /// well as any signal declared outside of a scope.
    pub fn root_scope(&self) -> ScopeIdx {
        self.root_scope
    }

    pub fn scope(&self, idx: ScopeIdx) -> &Scope {
        let ScopeIdx(idx) = idx;
        &self.all_scopes[idx]
    }

    pub fn signal(&self, idx: SignalIdx) -> &SignalTrace {
        let SignalIdx(idx) = idx;
        &self.all_signals[idx]
    }

    pub fn scope_name_by_idx(&self, idx: ScopeIdx) -> &str {
        self.scope(idx).name()
    }

    pub fn child_scopes_by_idx(&self, idx: ScopeIdx) -> Vec<ScopeIdx> {
        self.scope(idx).child_scopes.clone()
    }

    pub fn child_signals_by_idx(&self, idx: ScopeIdx) -> Vec<SignalIdx> {
        self.scope(idx).child_signals.clone()
    }

    pub fn child_scope_by_name(&self, idx: ScopeIdx, name: &str) -> Option<ScopeIdx> {
        self.scope(idx).scope_lookup.get(name).copied()
    }

    pub fn signal_by_name(&self, idx: ScopeIdx, name: &str) -> Option<&SignalTrace> {
        let signal_idx = self.scope(idx).signal_lookup.get(name)?;
        Some(self.signal(*signal_idx))
    }

    /// Walks down from the root following `path`, one scope name per element.
    pub fn scope_by_path(&self, path: &[&str]) -> Option<ScopeIdx> {
        let mut scope_idx = self.root_scope;
        for name in path {
            scope_idx = self.child_scope_by_name(scope_idx, name)?;
        }
        Some(scope_idx)
    }

    fn write_scope_tree(&self, scope_idx: ScopeIdx, depth: usize, out: &mut String) {
        let indent = " ".repeat(depth * 4);
        let scope = self.scope(scope_idx);
        let scope_name = scope.name();
        let scope_type = scope.scope_type().as_str();

        // writing into a String cannot fail
        let _ = writeln!(out, "{indent}scope: {scope_name} ({scope_type})");

        for signal_idx in &scope.child_signals {
            let signal = self.signal(*signal_idx);
            let name = signal.name();
            let num_bits = signal.num_bits();
            let signal_type = signal.signal_type().as_str();
            let _ = writeln!(out, "{indent} - sig: {name} ({signal_type}, {num_bits} bits)");
        }

        for child_idx in &scope.child_scopes {
            self.write_scope_tree(*child_idx, depth + 1, out);
        }
    }

    /// Renders the scope tree below the root, one line per scope and signal.
    pub fn scope_tree(&self) -> String {
        let mut out = String::new();
        for child_idx in &self.scope(self.root_scope).child_scopes {
            self.write_scope_tree(*child_idx, 0, &mut out);
        }
        out
    }

    pub fn print_scopes(&self) {
        print!("{}", self.scope_tree());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_child_keeps_its_slot() {
        let mut scope = Scope::new("top".to_string(), ScopeType::Module, None, ScopeIdx(0));
        assert_eq!(scope.insert_child_scope("a", ScopeIdx(1)), None);
        assert_eq!(scope.insert_child_scope("b", ScopeIdx(2)), None);
        assert_eq!(scope.insert_child_scope("a", ScopeIdx(3)), Some(ScopeIdx(1)));

        assert_eq!(scope.child_scopes, vec![ScopeIdx(3), ScopeIdx(2)]);
        assert_eq!(scope.scope_lookup.get("a"), Some(&ScopeIdx(3)));
    }

    #[test]
    fn duplicate_signal_keeps_its_slot() {
        let mut scope = Scope::new("top".to_string(), ScopeType::Module, None, ScopeIdx(0));
        scope.insert_signal("clk", SignalIdx(0));
        scope.insert_signal("rst", SignalIdx(1));
        assert_eq!(scope.insert_signal("clk", SignalIdx(2)), Some(SignalIdx(0)));
        assert_eq!(scope.child_signals, vec![SignalIdx(2), SignalIdx(1)]);
    }

    #[test]
    fn keywords() {
        for scope_type in [ScopeType::Module, ScopeType::Generate, ScopeType::VhdlIfGenerate] {
            assert_eq!(ScopeType::from_keyword(scope_type.as_str()), Some(scope_type));
        }
        assert_eq!(ScopeType::from_keyword("wire"), None);
        assert_eq!(Timescale::from_unit("ns"), Some(Timescale::Ns));
        assert_eq!(Timescale::from_unit("ks"), None);
    }
}
