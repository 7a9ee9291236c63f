use super::types::ParseResult;

pub(super) fn digit(chr: u8) -> bool {
    chr.is_ascii_digit()
}

pub(super) fn take_until(word: &str, pattern: u8) -> ParseResult<'_> {
    let new_start = word
        .as_bytes()
        .iter()
        .position(|chr| *chr == pattern)
        .unwrap_or(word.len());

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}

pub(super) fn take_while(word: &str, cond: fn(u8) -> bool) -> ParseResult<'_> {
    let new_start = word
        .as_bytes()
        .iter()
        .position(|chr| !cond(*chr))
        .unwrap_or(word.len());

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}

/// Matches `pattern` as a prefix of `word`. On a partial match, `matched`
/// holds the common prefix.
pub(super) fn tag<'a>(word: &'a str, pattern: &str) -> ParseResult<'a> {
    let new_start = word
        .as_bytes()
        .iter()
        .zip(pattern.as_bytes())
        .take_while(|(c_lhs, c_rhs)| c_lhs == c_rhs)
        .count();

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}
