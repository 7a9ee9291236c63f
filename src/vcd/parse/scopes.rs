// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! part of the vcd parser that handles building the signal tree
use log::debug;

use super::super::errors::{Cursor, VcdError};
use super::super::signal::{SignalTrace, SignalType};
use super::super::types::{Scope, ScopeIdx, ScopeType, SignalIdx};
use super::builder::Builder;

impl Builder {
    pub(super) fn open_scope(&mut self, name: String, scope_type: ScopeType) {
        let parent_scope_idx = self.current_scope();
        let curr_scope_idx = ScopeIdx(self.vcd.all_scopes.len());

        // register this scope as a child of the current parent scope; a
        // sibling of the same name is replaced
        let ScopeIdx(parent_scope_idx_usize) = parent_scope_idx;
        let replaced =
            self.vcd.all_scopes[parent_scope_idx_usize].insert_child_scope(&name, curr_scope_idx);
        if replaced.is_some() {
            debug!(
                "scope `{name}` redeclared in `{}`, keeping the latest declaration",
                self.vcd.scope_name_by_idx(parent_scope_idx)
            );
        }

        self.vcd.all_scopes.push(Scope::new(
            name,
            scope_type,
            Some(parent_scope_idx),
            curr_scope_idx,
        ));
        self.scope_stack.push(curr_scope_idx);
    }

    pub(super) fn close_scope(&mut self, cursor: Cursor) -> Result<(), VcdError> {
        if self.scope_stack.len() <= 1 {
            return Err(VcdError::structural(
                cursor,
                "found `$upscope` without a matching `$scope`",
            ));
        }
        self.scope_stack.pop();
        Ok(())
    }

    pub(super) fn declare_var(
        &mut self,
        name: String,
        signal_type: SignalType,
        num_bits: u32,
        id_code: String,
        index: Option<String>,
    ) {
        let parent_scope_idx = self.current_scope();
        let signal_idx = SignalIdx(self.vcd.all_signals.len());

        let ScopeIdx(parent_scope_idx_usize) = parent_scope_idx;
        let replaced =
            self.vcd.all_scopes[parent_scope_idx_usize].insert_signal(&name, signal_idx);
        if replaced.is_some() {
            debug!(
                "signal `{name}` redeclared in `{}`, keeping the latest declaration",
                self.vcd.scope_name_by_idx(parent_scope_idx)
            );
        }

        // Several declarations may share one identifier code, e.g. a port and
        // the net it is connected to. All of them receive every change.
        self.alias_map
            .entry(id_code.clone())
            .or_default()
            .push(signal_idx);

        self.vcd.all_signals.push(SignalTrace {
            name,
            signal_type,
            num_bits,
            index,
            id_code,
            self_idx: signal_idx,
            scope_parent: parent_scope_idx,
            changes: vec![],
        });
    }
}
