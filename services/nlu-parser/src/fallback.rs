//! Exact-phrase scan used when the pattern pass accepts nothing.

use crate::matcher::{OrderAccumulator, ProcessedIndices};
use crate::tokenizer::Token;
use shared::dto::Quantity;
use tracing::debug;

/// Grow a phrase over the unconsumed tokens and record keywords it spells
/// out exactly.
///
/// The phrase is dropped as soon as it stops being a prefix of some keyword.
/// The token that broke it is not retried on its own, so a keyword that
/// directly follows a dead-end prefix is missed.
pub fn fallback_scan<S: AsRef<str>>(
    tokens: &[Token],
    keywords: &[S],
    processed: &mut ProcessedIndices,
    found: &mut OrderAccumulator,
) {
    let lowered: Vec<String> = keywords.iter().map(|k| k.as_ref().to_lowercase()).collect();
    let mut by_length: Vec<(&str, &str)> = keywords
        .iter()
        .map(|k| k.as_ref())
        .zip(lowered.iter().map(String::as_str))
        .collect();
    by_length.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

    let remaining: Vec<&Token> = tokens
        .iter()
        .filter(|t| !processed.contains(t.index))
        .collect();

    let mut phrase: Vec<&Token> = Vec::new();
    for token in remaining {
        phrase.push(token);
        let text = phrase
            .iter()
            .map(|t| t.text.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        if let Some(&(keyword, _)) = by_length.iter().find(|(_, lower)| *lower == text) {
            if !found.contains(keyword) {
                found.add(keyword, Quantity::ONE);
                processed.mark(phrase.iter().map(|t| t.index));
                debug!(keyword, "fallback matched exact phrase");
            }
            phrase.clear();
        } else if !lowered.iter().any(|k| k.starts_with(&text)) {
            phrase.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(index, w)| Token { text: w.to_string(), index, like_num: false })
            .collect()
    }

    fn run(words: &[&str], keywords: &[&str]) -> (Vec<(String, Quantity)>, ProcessedIndices) {
        let mut processed = ProcessedIndices::default();
        let mut found = OrderAccumulator::default();
        fallback_scan(&toks(words), keywords, &mut processed, &mut found);
        let items = found
            .into_items()
            .into_iter()
            .map(|i| (i.keyword, i.quantity))
            .collect();
        (items, processed)
    }

    #[test]
    fn finds_multi_word_phrase() {
        let (items, processed) = run(&["quero", "pão", "de", "queijo"], &["pão de queijo"]);
        assert_eq!(items, [("pão de queijo".to_string(), Quantity::ONE)]);
        assert!(!processed.contains(0));
        assert!((1..4).all(|i| processed.contains(i)));
    }

    #[test]
    fn keeps_supplied_keyword_spelling() {
        let (items, _) = run(&["Espresso"], &["ESPRESSO"]);
        assert_eq!(items, [("ESPRESSO".to_string(), Quantity::ONE)]);
    }

    #[test]
    fn repeated_phrase_counts_once() {
        let (items, processed) = run(&["bolo", "e", "bolo"], &["bolo"]);
        assert_eq!(items, [("bolo".to_string(), Quantity::ONE)]);
        assert!(processed.contains(0));
        assert!(!processed.contains(2));
    }

    #[test]
    fn skips_processed_tokens() {
        let mut processed = ProcessedIndices::default();
        processed.mark([1]);
        let mut found = OrderAccumulator::default();
        fallback_scan(&toks(&["café", "bolo", "leite"]), &["café leite"], &mut processed, &mut found);
        assert!(!found.is_empty());
        assert_eq!(found.into_items()[0].keyword, "café leite");
    }

    #[test]
    fn no_keyword_prefix_means_nothing_found() {
        let (items, _) = run(&["quero", "uma", "pizza"], &["cappuccino", "espresso"]);
        assert!(items.is_empty());
    }

    // Known edge case: "café" starts a phrase toward "café com leite", "bolo"
    // kills it, and "bolo" itself is never tried as a fresh start.
    #[test]
    fn keyword_after_dead_end_prefix_is_missed() {
        let (items, _) = run(&["café", "bolo"], &["café com leite", "bolo"]);
        assert!(items.is_empty());

        let (items, _) = run(&["café", "e", "bolo"], &["café com leite", "bolo"]);
        assert_eq!(items, [("bolo".to_string(), Quantity::ONE)]);
    }

    #[test]
    fn marks_matched_span_while_scanning() {
        let mut processed = ProcessedIndices::default();
        let mut found = OrderAccumulator::default();
        let tokens = toks(&["bolo", "e", "pão", "de", "queijo"]);
        fallback_scan(&tokens, &["bolo", "pão de queijo"], &mut processed, &mut found);
        let keywords: Vec<String> = found.into_items().into_iter().map(|i| i.keyword).collect();
        assert_eq!(keywords, ["bolo", "pão de queijo"]);
        assert!([0, 2, 3, 4].iter().all(|&i| processed.contains(i)));
        assert!(!processed.contains(1));
    }
}
