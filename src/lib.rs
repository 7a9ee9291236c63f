// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

mod vcd;
pub use vcd::errors::{Cursor, Line, LookupError, PatternError, VcdError, Word};
pub use vcd::parse::tokens::{tokenize, ChangeValue, SimulationCommand, Token, Tokenizer};
pub use vcd::parse::parse_vcd;
pub use vcd::pattern::{Pattern, Predicate};
pub use vcd::signal::{SignalChange, SignalTrace, SignalType};
pub use vcd::types::{Metadata, Scope, ScopeIdx, ScopeType, SignalIdx, Timescale, Version, VCD};
