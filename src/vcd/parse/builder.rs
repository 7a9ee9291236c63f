use std::collections::HashMap;

use log::debug;

use super::super::errors::{Cursor, VcdError};
use super::super::types::{ScopeIdx, SignalIdx, Version, VCD};
use super::metadata::parse_date;
use super::tokens::Token;

/// Turns the token stream into a [`VCD`], one token at a time.
pub(super) struct Builder {
    pub(super) vcd: VCD,
    // the root scope sits at the bottom and is never popped
    pub(super) scope_stack: Vec<ScopeIdx>,
    // identifier code -> every signal declared with that code
    pub(super) alias_map: HashMap<String, Vec<SignalIdx>>,
    pub(super) current_time: u64,
}

impl Builder {
    pub(super) fn new() -> Builder {
        let vcd = VCD::new();
        let root_scope = vcd.root_scope();
        Builder {
            vcd,
            scope_stack: vec![root_scope],
            alias_map: HashMap::new(),
            current_time: 0,
        }
    }

    pub(super) fn current_scope(&self) -> ScopeIdx {
        self.scope_stack
            .last()
            .copied()
            .unwrap_or(self.vcd.root_scope)
    }

    pub(super) fn apply(&mut self, token: Token, cursor: Cursor) -> Result<(), VcdError> {
        match token {
            Token::Date(text) => {
                self.vcd.metadata.parsed_date = parse_date(&text);
                if self.vcd.metadata.parsed_date.is_none() {
                    debug!("could not interpret `$date {text}` as a calendar date");
                }
                self.vcd.metadata.date = Some(text);
            }
            Token::Version(text) => self.vcd.metadata.version = Some(Version(text)),
            Token::Timescale(magnitude, unit) => {
                self.vcd.metadata.timescale = (Some(magnitude), unit)
            }
            Token::ScopeBegin { name, scope_type } => self.open_scope(name, scope_type),
            Token::ScopeEnd => self.close_scope(cursor)?,
            Token::VarDecl {
                name,
                signal_type,
                num_bits,
                id_code,
                index,
            } => self.declare_var(name, signal_type, num_bits, id_code, index),
            Token::Time(time) => self.advance_time(time, cursor)?,
            Token::ValueChange { id_code, value } => self.apply_value_change(&id_code, &value),
            // none of these affect the tree
            Token::Comment(_)
            | Token::EndDefinitions
            | Token::SimulationCommand(_)
            | Token::SimulationCommandEnd => {}
        }
        Ok(())
    }

    /// Hands over the finished tree. Fails if any scope was left open.
    pub(super) fn finish(self, cursor: Cursor) -> Result<VCD, VcdError> {
        let unclosed = self.scope_stack.len().saturating_sub(1);
        if unclosed > 0 {
            let innermost = self.vcd.scope_name_by_idx(self.current_scope());
            return Err(VcdError::structural(
                cursor,
                format!(
                    "reached end of file with {unclosed} unclosed scope(s), \
                     innermost is `{innermost}`"
                ),
            ));
        }

        debug!(
            "built {} scopes and {} signals from {} identifier codes",
            self.vcd.all_scopes.len() - 1,
            self.vcd.all_signals.len(),
            self.alias_map.len()
        );
        Ok(self.vcd)
    }
}
