//! Word segmentation and numeral detection.
//!
//! The parser only needs one capability from its language resource: split
//! normalized text into words and flag the words that denote quantities.
//! [`Tokenizer`] is that seam; [`RuleTokenizer`] is the lexicon-backed
//! implementation built once at start-up.

use once_cell::sync::Lazy;
use regex::Regex;
use shared::config::Settings;
use shared::dto::Quantity;
use shared::error::{AppError, Result};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)?x?$").expect("valid numeric token pattern"));

/// Number words beyond the normalizer's table. They are recognised as
/// quantities but carry no value the parser can read.
const COMPACT_NUMERALS: &[&str] = &[
    "zero", "dezesseis", "dezasseis", "dezessete", "dezassete", "dezoito",
    "dezenove", "dezanove", "vinte", "trinta", "quarenta", "cinquenta",
    "sessenta", "setenta", "oitenta", "noventa", "cem", "cento", "duzentos",
    "duzentas", "trezentos", "quinhentos", "mil",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub index: usize,
    pub like_num: bool,
}

impl Token {
    /// Numeric value of the token; `2x` reads as 2. `None` for number words
    /// and anything else that does not parse.
    pub fn numeric_value(&self) -> Option<Quantity> {
        let digits = self.text.strip_suffix('x').unwrap_or(&self.text);
        digits.parse().ok()
    }
}

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexiconVariant {
    Extended(PathBuf),
    Compact,
}

impl fmt::Display for LexiconVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexiconVariant::Extended(path) => write!(f, "extended ({})", path.display()),
            LexiconVariant::Compact => f.write_str("compact"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleTokenizer {
    numeral_words: HashSet<String>,
    variant: LexiconVariant,
}

impl RuleTokenizer {
    pub fn compact() -> Self {
        Self {
            numeral_words: COMPACT_NUMERALS.iter().map(|w| w.to_string()).collect(),
            variant: LexiconVariant::Compact,
        }
    }

    /// Compact lexicon plus every word listed in `path` (one per line, `#`
    /// starts a comment).
    pub fn with_lexicon_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("{}: {e}", path.display())))?;
        let extra: Vec<String> = raw
            .lines()
            .map(|l| l.split('#').next().unwrap_or("").trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        if extra.is_empty() {
            return Err(AppError::TokenizerUnavailable(format!(
                "numeral lexicon {} is empty",
                path.display()
            )));
        }
        debug!(path = %path.display(), words = extra.len(), "loaded numeral lexicon");

        let mut tokenizer = Self::compact();
        tokenizer.numeral_words.extend(extra);
        tokenizer.variant = LexiconVariant::Extended(path.to_path_buf());
        Ok(tokenizer)
    }

    /// Extended lexicon if configured and loadable, else the compact one.
    /// Fails only when nothing can be loaded and the built-in lexicon is
    /// disabled.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if let Some(path) = settings.numeral_lexicon.as_deref() {
            match Self::with_lexicon_file(path) {
                Ok(tokenizer) => return Ok(tokenizer),
                Err(e) if settings.builtin_lexicon => {
                    warn!(%e, path, "extended numeral lexicon not loaded, using compact lexicon")
                }
                Err(e) => return Err(e),
            }
        }
        if settings.builtin_lexicon {
            Ok(Self::compact())
        } else {
            Err(AppError::TokenizerUnavailable(
                "no numeral lexicon loaded and the built-in lexicon is disabled".into(),
            ))
        }
    }

    pub fn variant(&self) -> &LexiconVariant {
        &self.variant
    }

    pub fn is_numeral(&self, word: &str) -> bool {
        NUMERIC.is_match(word) || self.numeral_words.contains(word)
    }
}

impl Tokenizer for RuleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.split_whitespace()
            .enumerate()
            .map(|(index, word)| Token {
                text: word.to_string(),
                index,
                like_num: self.is_numeral(word),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_and_flags_numerals() {
        let tokens = RuleTokenizer::compact().tokenize("quero 2 cafés e vinte pães 1.5 2x");
        assert_eq!(texts(&tokens), ["quero", "2", "cafés", "e", "vinte", "pães", "1.5", "2x"]);
        let flags: Vec<bool> = tokens.iter().map(|t| t.like_num).collect();
        assert_eq!(flags, [false, true, false, false, true, false, true, true]);
        assert!(tokens.iter().enumerate().all(|(i, t)| t.index == i));
    }

    #[test]
    fn numeric_values() {
        let tok = |text: &str| Token { text: text.into(), index: 0, like_num: true };
        assert_eq!(tok("3").numeric_value(), Some(Quantity::from(3)));
        assert_eq!(tok("2x").numeric_value(), Some(Quantity::from(2)));
        assert_eq!(tok("0.5").numeric_value(), Some("0.5".parse().unwrap()));
        assert_eq!(tok("vinte").numeric_value(), None);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(RuleTokenizer::compact().tokenize("").is_empty());
    }

    #[test]
    fn extended_lexicon_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# extra numerals").unwrap();
        writeln!(file, "Par").unwrap();
        writeln!(file, "dezena  # ten").unwrap();

        let tokenizer = RuleTokenizer::with_lexicon_file(file.path()).unwrap();
        assert!(tokenizer.is_numeral("par"));
        assert!(tokenizer.is_numeral("dezena"));
        assert!(tokenizer.is_numeral("vinte"));
        assert_eq!(tokenizer.variant(), &LexiconVariant::Extended(file.path().to_path_buf()));
    }

    #[test]
    fn empty_lexicon_file_is_unavailable() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = RuleTokenizer::with_lexicon_file(file.path()).unwrap_err();
        assert!(matches!(err, AppError::TokenizerUnavailable(_)));
    }

    #[test]
    fn settings_fall_back_to_compact() {
        let settings = Settings {
            numeral_lexicon: Some("/nonexistent/numerals.txt".into()),
            ..Settings::default()
        };
        let tokenizer = RuleTokenizer::from_settings(&settings).unwrap();
        assert_eq!(tokenizer.variant(), &LexiconVariant::Compact);
    }

    #[test]
    fn settings_without_any_lexicon_fail() {
        let settings = Settings {
            numeral_lexicon: Some("/nonexistent/numerals.txt".into()),
            builtin_lexicon: false,
            ..Settings::default()
        };
        assert!(matches!(
            RuleTokenizer::from_settings(&settings),
            Err(AppError::Io(_))
        ));

        let settings = Settings { builtin_lexicon: false, ..Settings::default() };
        assert!(matches!(
            RuleTokenizer::from_settings(&settings),
            Err(AppError::TokenizerUnavailable(_))
        ));
    }
}
