//! part of the vcd parser that handles the value change section
use log::trace;
use num::BigUint;

use super::super::errors::{Cursor, VcdError};
use super::super::signal::SignalChange;
use super::super::types::SignalIdx;
use super::builder::Builder;
use super::tokens::ChangeValue;

/// Renders a value change the way it is stored on a timeline.
///
/// Vectors made up only of `0` and `1` are read as unsigned integers and
/// written back in base 2, which drops leading zeros: `b0010` becomes `10`
/// and `b0000` becomes `0`. The result is intentionally not padded to the
/// declared width. Vectors holding any other state, reals and strings keep
/// their literal text.
pub(super) fn decode_value(value: &ChangeValue) -> String {
    match value {
        ChangeValue::Scalar(chr) => chr.to_string(),
        ChangeValue::Vector(digits) => match BigUint::parse_bytes(digits.as_bytes(), 2) {
            Some(num) => num.to_str_radix(2),
            None => digits.clone(),
        },
        ChangeValue::Real(literal) | ChangeValue::Str(literal) => literal.clone(),
    }
}

impl Builder {
    pub(super) fn advance_time(&mut self, time: u64, cursor: Cursor) -> Result<(), VcdError> {
        // timelines must stay ordered for lookups to work
        if time < self.current_time {
            return Err(VcdError::format(
                cursor,
                format!("timestamp #{time} goes back from #{}", self.current_time),
            ));
        }
        self.current_time = time;
        Ok(())
    }

    pub(super) fn apply_value_change(&mut self, id_code: &str, value: &ChangeValue) {
        let signal_idxs = match self.alias_map.get(id_code) {
            Some(signal_idxs) => signal_idxs,
            None => {
                trace!("skipping value change for undeclared identifier code `{id_code}`");
                return;
            }
        };

        let value = decode_value(value);
        for SignalIdx(signal_idx) in signal_idxs {
            self.vcd.all_signals[*signal_idx].changes.push(SignalChange {
                time: self.current_time,
                value: value.clone(),
            });
        }
    }
}
