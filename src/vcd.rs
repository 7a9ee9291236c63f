pub(crate) mod errors;
pub(crate) mod parse;
pub(crate) mod pattern;
pub(crate) mod reader;
pub(crate) mod signal;
pub(crate) mod types;
pub(crate) mod utilities;
