use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use itertools::Itertools;

use super::super::errors::{Cursor, VcdError};
use super::super::types::Timescale;
use super::combinator_atoms::{digit, take_until, take_while};
use super::types::ParseResult;

fn parse_clock(word: &str) -> Result<(u8, u8, u8), String> {
    // get hour
    let res = take_until(word, b':');
    let hh: u8 = res.assert_match()?.parse().map_err(|e| format!("{e}"))?;
    if hh > 23 {
        return Err(format!("{hh} is not a valid hour : must be between 0 and 23"));
    }

    // get minute
    let word = &res.assert_residual()?[1..]; // chop off colon which is at index 0
    let res = take_until(word, b':');
    let mm: u8 = res.assert_match()?.parse().map_err(|e| format!("{e}"))?;
    if mm > 59 {
        return Err(format!("{mm} is not a valid minute : must be between 0 and 59"));
    }

    // get second
    let residual = &res.assert_residual()?[1..]; // chop off colon which is at index 0
    let ss: u8 = residual.parse().map_err(|e| format!("{e}"))?;
    if ss > 60 {
        return Err(format!("{ss} is not a valid second : must be between 0 and 60"));
    }

    Ok((hh, mm, ss))
}

fn parse_date_words(
    day: &str,
    month: &str,
    date: &str,
    clock: &str,
    year: &str,
) -> Result<DateTime<Utc>, String> {
    let days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    if !days.contains(&day) {
        return Err(format!("{day} is not a valid weekday : expected one of {days:?}"));
    }

    let months = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    if !months.contains(&month) {
        return Err(format!("{month} is not a valid month : expected one of {months:?}"));
    }

    let date: u8 = date.parse().map_err(|e| format!("{e}"))?;
    if date == 0 || date > 31 {
        return Err(format!("{date} is not a valid date : must be between 1 and 31"));
    }

    let (hh, mm, ss) = parse_clock(clock)?;

    let full_date = format!("{day} {month} {date} {hh}:{mm}:{ss} {year}");
    let naive = NaiveDateTime::parse_from_str(&full_date, "%a %b %e %H:%M:%S %Y")
        .map_err(|e| format!("failed to parse date `{full_date}` : {e}"))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Interprets the text of a `$date` command.
///
/// A date is typically composed of the 5 following words, which different
/// simulators emit in different orders:
/// {Day, Month, Date(number in month), hh:mm:ss, year}.
/// We try our date parser on every one of the 5! = 120 orderings and keep the
/// first one that parses. Anything else yields `None`; the raw text is kept
/// by the caller either way.
pub(super) fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let words = text.split_ascii_whitespace().collect::<Vec<&str>>();
    if words.len() != 5 {
        return None;
    }

    words
        .iter()
        .permutations(words.len())
        .find_map(|p| parse_date_words(p[0], p[1], p[2], p[3], p[4]).ok())
}

/// Parses the body of a `$timescale` command. We might see `1ps $end` or
/// `1 ps $end`, so the words are glued together before splitting the
/// magnitude from the unit.
pub(super) fn parse_timescale(words: &[String], cursor: Cursor) -> Result<(u32, Timescale), VcdError> {
    let joined = words.concat();
    let ParseResult { matched, residual } = take_while(&joined, digit);

    let magnitude: u32 = matched.parse().map_err(|_| {
        VcdError::format(
            cursor,
            format!("`{joined}` does not start with a timescale magnitude"),
        )
    })?;
    if ![1, 10, 100].contains(&magnitude) {
        return Err(VcdError::format(
            cursor,
            format!("timescale magnitude must be 1, 10 or 100, not {magnitude}"),
        ));
    }

    let unit = Timescale::from_unit(residual).ok_or_else(|| {
        VcdError::format(
            cursor,
            format!("unknown timescale unit `{residual}` : expected one of fs, ps, ns, us, ms, s"),
        )
    })?;

    Ok((magnitude, unit))
}
