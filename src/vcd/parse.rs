use std::io::Read;

use log::debug;

use super::errors::VcdError;
use super::types::VCD;

mod builder;
mod combinator_atoms;
mod events;
mod metadata;
mod scopes;
pub(crate) mod tokens;
mod types;

use builder::Builder;
use tokens::tokenize;

/// Parses a complete trace into a [`VCD`].
///
/// Any format or structural error aborts the parse and no partial tree is
/// returned. Value changes that reference an identifier code that was never
/// declared are skipped.
pub fn parse_vcd<R: Read>(reader: R) -> Result<VCD, VcdError> {
    let mut tokens = tokenize(reader);
    let mut builder = Builder::new();

    // `tokens` is polled by hand so that its cursor stays reachable for
    // error reporting
    while let Some(token) = tokens.next() {
        builder.apply(token?, tokens.cursor())?;
    }

    let vcd = builder.finish(tokens.cursor())?;
    debug!("finished parsing vcd with metadata {:?}", vcd.metadata());
    Ok(vcd)
}
