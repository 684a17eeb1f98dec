use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// An innermost bracketed span: an opener, then no bracket characters at all,
// then a closer. Pairs don't have to match (`(draft]` is still a span).
regex!(BRACKETED_SPAN, r"\s*[(\[{<][^(\[{<)\]}>]*[)\]}>]\s*");
regex!(MATH_CATEGORIES, r"[\p{Sm}\p{Sk}]");
regex!(PUNCTUATION_OR_SYMBOL, r"[\p{P}\p{S}]");
regex!(BRACKET_CHARS, r"[()\[\]{}<>]");

/// Math-like characters removed in every mode, on top of the `Sm`/`Sk`
/// categories. Listed literally because category assignments drift between
/// Unicode versions (and `-`, `*`, `/`, `%` aren't math symbols at all).
pub(crate) const EXTRA_MATH: &str = concat!(
    // Arithmetic
    "+-*/=^%±×÷√∝∞",
    // Comparison and relations
    "≈≠≤≥≃≅≡≪≫≀≁≂≄≆≇≉≊≋≌≍≎≏≐≑≒≓≔≕≖≗≘≙≚≛≜≝≞≟",
    // Set theory
    "∈∋∩∪⊂⊃⊆⊇⊕⊗",
    // Calculus
    "∑∏∂∆∇∫∬∭∮∯∰∱∲∳",
    // Logic and geometry
    "∧∨⊥∴∵∶∷∸∠∟∥∦",
);

/// Characters only removed in aggressive mode that aren't reliably covered by
/// the `P*`/`S*` categories (`½` is a number, for one).
pub(crate) const AGGRESSIVE_EXTRA: &str = "#@~`|•·…“”‘’'\"°§©®™½¼¾†‡_";

/// Left behind at either end of a field once whatever they separated is gone.
pub(crate) const SEPARATORS: &str = "-–—:;,.";
