//! The individual normalization stages, in the order [`normalize`](crate::normalize)
//! applies them.

use crate::consts::{
    AGGRESSIVE_EXTRA, BRACKETED_SPAN, BRACKET_CHARS, EXTRA_MATH, MATH_CATEGORIES, PUNCTUATION_OR_SYMBOL, SEPARATORS,
};
use regex::Captures;
use std::borrow::Cow;

/// Stage 1: strip bracketed spans (and the whitespace around them), innermost
/// first, until nothing else matches.
///
/// Every replacement swaps at least two characters for a single space, so the
/// loop always terminates.
pub(crate) fn remove_bracketed(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        match BRACKETED_SPAN.replace_all(&current, " ") {
            Cow::Borrowed(_) => return current,
            Cow::Owned(next) => current = next,
        }
    }
}

/// Stage 2: drop math (`Sm`) and modifier (`Sk`) symbols plus [`EXTRA_MATH`].
pub(crate) fn remove_math_symbols(text: &str) -> String {
    MATH_CATEGORIES.replace_all(text, "").chars().filter(|c| !EXTRA_MATH.contains(*c)).collect()
}

/// Stage 3 (aggressive only): drop every punctuation and symbol character plus
/// [`AGGRESSIVE_EXTRA`], then blank out any bracket that is somehow still there.
pub(crate) fn remove_punctuation_and_symbols(text: &str) -> String {
    let stripped = PUNCTUATION_OR_SYMBOL.replace_all(text, |caps: &Captures<'_>| match caps[0].chars().all(char::is_whitespace) {
        true => " ",
        false => "",
    });
    let stripped: String = stripped.chars().filter(|c| !AGGRESSIVE_EXTRA.contains(*c)).collect();
    BRACKET_CHARS.replace_all(&stripped, " ").into_owned()
}

/// Stage 4: collapse whitespace runs, then trim whitespace and [`SEPARATORS`]
/// from both ends until neither is left.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_matches(|c: char| c.is_whitespace() || SEPARATORS.contains(c)).to_string()
}
