//! Text clean-up applied before tokenization: lowercasing, punctuation
//! stripping, the "meia dúzia" idiom and written Portuguese numerals.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashMap;

static HALF_DOZEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"meia\s+(?:dúzia|duzia)").expect("valid half-dozen pattern"));

static WRITTEN_NUMERALS: Lazy<HashMap<&'static str, Decimal>> = Lazy::new(|| {
    let half = Decimal::new(5, 1);
    [
        ("um", Decimal::from(1)),
        ("uma", Decimal::from(1)),
        ("meio", half),
        ("meia", half),
        ("dois", Decimal::from(2)),
        ("duas", Decimal::from(2)),
        ("três", Decimal::from(3)),
        ("quatro", Decimal::from(4)),
        ("cinco", Decimal::from(5)),
        ("seis", Decimal::from(6)),
        ("sete", Decimal::from(7)),
        ("oito", Decimal::from(8)),
        ("nove", Decimal::from(9)),
        ("dez", Decimal::from(10)),
        ("onze", Decimal::from(11)),
        ("doze", Decimal::from(12)),
        ("dúzia", Decimal::from(12)),
        ("duzia", Decimal::from(12)),
        ("treze", Decimal::from(13)),
        ("catorze", Decimal::from(14)),
        ("quatorze", Decimal::from(14)),
        ("quinze", Decimal::from(15)),
    ]
    .into_iter()
    .collect()
});

/// Value of a written numeral ("dois", "meia", "dúzia"), if `word` is one.
pub fn written_numeral(word: &str) -> Option<Decimal> {
    WRITTEN_NUMERALS.get(word).copied()
}

/// Drop `.`, `,`, `!` and `?`. A `.` or `,` sitting between two digits is a
/// decimal separator and survives as `.`, so "1,5" and "1.5" both read 1.5.
fn strip_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '.' | ',' => {
                let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
                let next_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
                if prev_digit && next_digit {
                    out.push('.');
                }
            }
            '!' | '?' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Normalize raw order text. Never fails; empty input gives an empty string.
pub fn normalize(text: &str) -> String {
    let cleaned = strip_punctuation(&text.to_lowercase());
    let rewritten = HALF_DOZEN.replace_all(&cleaned, "6");

    rewritten
        .split_whitespace()
        .map(|word| match written_numeral(word) {
            Some(value) => value.normalize().to_string(),
            None => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
