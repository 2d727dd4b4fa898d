//! Keyword matching over normalized tokens.
//!
//! Every keyword phrase is looked for in three shapes: numeral before the
//! phrase ("2 cafés"), numeral after it ("cafés 2") and the phrase alone.
//! All hits become candidate spans; they are ordered by start position,
//! longest first on ties, and accepted greedily as long as they do not touch
//! an already accepted span.

use crate::fallback::fallback_scan;
use crate::normalizer::normalize;
use crate::tokenizer::{RuleTokenizer, Token, Tokenizer};
use shared::dto::{ParsedItem, Quantity};
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info};

/// Connectors allowed between a leading numeral and the phrase
/// ("6 de pão de queijo").
const PARTITIVES: &[&str] = &["de"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityRole {
    NumeralBefore,
    NumeralAfter,
    Solo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate<'k> {
    pub keyword: &'k str,
    pub start: usize,
    pub end: usize,
    pub role: QuantityRole,
}

impl MatchCandidate<'_> {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    fn len(&self) -> usize {
        self.end - self.start
    }

    /// Quantity carried by the span. A numeral that cannot be read counts
    /// as 1.
    pub fn quantity(&self, tokens: &[Token]) -> Quantity {
        let numeral = match self.role {
            QuantityRole::NumeralBefore => tokens.get(self.start),
            QuantityRole::NumeralAfter => tokens.get(self.end - 1),
            QuantityRole::Solo => None,
        };
        numeral
            .and_then(Token::numeric_value)
            .unwrap_or(Quantity::ONE)
    }
}

/// Token positions consumed by accepted matches.
#[derive(Debug, Default)]
pub struct ProcessedIndices(HashSet<usize>);

impl ProcessedIndices {
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn overlaps(&self, span: Range<usize>) -> bool {
        span.into_iter().any(|i| self.0.contains(&i))
    }

    pub fn mark(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.0.extend(indices);
    }
}

/// Per-keyword running totals, kept in first-seen order.
#[derive(Debug, Default)]
pub struct OrderAccumulator {
    items: Vec<ParsedItem>,
    positions: HashMap<String, usize>,
}

impl OrderAccumulator {
    pub fn add(&mut self, keyword: &str, quantity: Quantity) {
        match self.positions.get(keyword) {
            Some(&pos) => self.items[pos].quantity += quantity,
            None => {
                self.positions.insert(keyword.to_string(), self.items.len());
                self.items.push(ParsedItem {
                    keyword: keyword.to_string(),
                    quantity,
                });
            }
        }
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.positions.contains_key(keyword)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<ParsedItem> {
        self.items
    }
}

fn words_at(tokens: &[Token], at: usize, words: &[String]) -> bool {
    tokens
        .get(at..at + words.len())
        .is_some_and(|run| run.iter().zip(words).all(|(t, w)| t.text == *w))
}

/// All candidate spans for all keywords, in acceptance order.
pub fn collect_candidates<'k, S: AsRef<str>>(
    tokens: &[Token],
    keywords: &'k [S],
) -> Vec<MatchCandidate<'k>> {
    let mut candidates = Vec::new();

    for keyword in keywords {
        let keyword: &'k str = keyword.as_ref();
        let words: Vec<String> = keyword
            .to_lowercase()
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        if words.is_empty() {
            continue;
        }
        let n = words.len();

        for start in 0..tokens.len() {
            if !words_at(tokens, start, &words) {
                continue;
            }
            let end = start + n;
            let mut push = |start, end, role| {
                candidates.push(MatchCandidate { keyword, start, end, role })
            };

            if start >= 1 && tokens[start - 1].like_num {
                push(start - 1, end, QuantityRole::NumeralBefore);
            } else if start >= 2
                && PARTITIVES.contains(&tokens[start - 1].text.as_str())
                && tokens[start - 2].like_num
            {
                push(start - 2, end, QuantityRole::NumeralBefore);
            }
            if tokens.get(end).is_some_and(|t| t.like_num) {
                push(start, end + 1, QuantityRole::NumeralAfter);
            }
            push(start, end, QuantityRole::Solo);
        }
    }

    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.len().cmp(&a.len())));
    candidates
}

#[derive(Clone)]
pub struct OrderParser {
    tokenizer: Option<Arc<dyn Tokenizer>>,
}

impl Default for OrderParser {
    fn default() -> Self {
        Self::new(Arc::new(RuleTokenizer::compact()))
    }
}

impl OrderParser {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            tokenizer: Some(tokenizer),
        }
    }

    /// A parser whose language resource failed to load. Every parse returns
    /// no items.
    pub fn unavailable() -> Self {
        Self { tokenizer: None }
    }

    pub fn is_available(&self) -> bool {
        self.tokenizer.is_some()
    }

    /// Extract `(keyword, quantity)` pairs from `text`.
    ///
    /// Keywords are returned exactly as supplied, at most once each, in the
    /// order they were first matched. Never fails.
    pub fn parse<S: AsRef<str>>(&self, text: &str, keywords: &[S]) -> Vec<ParsedItem> {
        let Some(tokenizer) = self.tokenizer.as_deref() else {
            return Vec::new();
        };

        let normalized = normalize(text);
        let tokens = tokenizer.tokenize(&normalized);
        if tokens.is_empty() || keywords.is_empty() {
            return Vec::new();
        }

        let mut processed = ProcessedIndices::default();
        let mut found = OrderAccumulator::default();

        for candidate in collect_candidates(&tokens, keywords) {
            if processed.overlaps(candidate.span()) {
                continue;
            }
            let quantity = candidate.quantity(&tokens);
            processed.mark(candidate.span());
            debug!(
                keyword = candidate.keyword,
                %quantity,
                start = candidate.start,
                end = candidate.end,
                role = ?candidate.role,
                "matched keyword"
            );
            found.add(candidate.keyword, quantity);
        }

        if found.is_empty() {
            fallback_scan(&tokens, keywords, &mut processed, &mut found);
        }

        let items = found.into_items();
        debug!(text, "order text");
        info!(items = items.len(), "parsed order text");
        items
    }
}
