//! Natural-language order parser.
//!
//! Turns free-form kiosk text ("quero dois cappuccino e meia dúzia de pão de
//! queijo") into `(keyword, quantity)` pairs against a vocabulary supplied
//! with each request.

pub mod api;
pub mod fallback;
pub mod matcher;
pub mod normalizer;
pub mod tokenizer;

pub use matcher::OrderParser;
pub use normalizer::normalize;
pub use shared::dto::{ParsedItem, Quantity};

/// Parse `text` with the built-in numeral lexicon.
pub fn parse_order<S: AsRef<str>>(text: &str, product_keywords: &[S]) -> Vec<ParsedItem> {
    OrderParser::default().parse(text, product_keywords)
}
