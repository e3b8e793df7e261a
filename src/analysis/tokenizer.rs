//! Keyword tokenizer
//!
//! Splits text into words, keeps alphabetic tokens of two or more letters
//! (any script), lower-cases them (except the pronoun `I`), stems with the
//! English Snowball stemmer and drops stop words.

use crate::analysis::counter::KeywordCounter;
use crate::analysis::stopwords::StopWords;
use rust_stemmers::{Algorithm, Stemmer};
use std::sync::Arc;

/// Turns page text into keyword counts
pub struct Tokenizer {
    stemmer: Stemmer,
    stop_words: Arc<StopWords>,
}

impl Tokenizer {
    pub fn new(stop_words: Arc<StopWords>) -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            stop_words,
        }
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Tokenizes `text` into a frequency counter of stems
    ///
    /// A token is dropped when either its lower-case form or its stem is a
    /// stop word, so no stop word can ever be a key. Contractions are looked up
    /// whole (`it's`); otherwise only the part before the apostrophe is kept
    /// (`google's` counts as `google`).
    ///
    /// # Example
    ///
    /// ```
    /// use seo_survey::analysis::{StopWords, Tokenizer};
    /// use std::sync::Arc;
    ///
    /// let tokenizer = Tokenizer::new(Arc::new(StopWords::english()));
    /// let counts = tokenizer.tokenize("Running shoes and running tracks");
    /// assert_eq!(counts.get("run"), 2);
    /// assert!(!counts.contains_key("and"));
    /// ```
    pub fn tokenize(&self, text: &str) -> KeywordCounter {
        let mut counter = KeywordCounter::new();

        for raw in text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}')) {
            if let Some(keyword) = self.keyword(raw) {
                counter.add(&keyword);
            }
        }

        counter
    }

    fn keyword(&self, raw: &str) -> Option<String> {
        let raw = raw.trim_matches(|c| c == '\'' || c == '\u{2019}');
        if raw.is_empty() {
            return None;
        }

        if raw == "I" {
            return Some(raw.to_string());
        }

        let lower = raw.to_lowercase().replace('\u{2019}', "'");
        let word = match lower.split_once('\'') {
            Some(_) if self.stop_words.contains(&lower) => return None,
            Some((head, _)) => head,
            None => lower.as_str(),
        };

        if word.chars().count() < 2 || !word.chars().all(char::is_alphabetic) {
            return None;
        }
        if self.stop_words.contains(word) {
            return None;
        }

        let stem = self.stemmer.stem(word);
        if self.stop_words.contains(&stem) {
            return None;
        }
        Some(stem.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(Arc::new(StopWords::english()))
    }

    #[test]
    fn test_stems_and_counts() {
        let counts = tokenizer().tokenize("Gardening gardens; the GARDEN.");

        assert_eq!(counts.get("garden"), 3);
        assert_eq!(counts.get("garden"), counts.most_common(1)[0].1);
        assert!(!counts.contains_key("the"));
    }

    #[test]
    fn test_drops_non_alphabetic_tokens() {
        let counts = tokenizer().tokenize("2024 seo3 v2 hello 3d");

        assert_eq!(counts.keys().collect::<Vec<_>>(), vec!["hello"]);
    }

    #[test]
    fn test_keeps_accented_and_non_ascii_words() {
        let counts = tokenizer().tokenize("Café résumé naïve Straße Zürich über Fußball");

        assert_eq!(counts.total(), 7);
        assert!(counts.keys().any(|k| k.starts_with("caf")));
        assert!(counts.keys().any(|k| k.starts_with("straß")));
        assert!(counts.keys().all(|k| k.chars().all(char::is_lowercase)));
    }

    #[test]
    fn test_drops_single_letters_except_i() {
        let counts = tokenizer().tokenize("b c I garden e");

        assert_eq!(counts.get("I"), 1);
        assert_eq!(counts.get("garden"), 1);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_keeps_uppercase_i() {
        let counts = tokenizer().tokenize("I think I can");

        assert_eq!(counts.get("I"), 2);
        assert!(!counts.contains_key("i"));
    }

    #[test]
    fn test_contractions_and_possessives() {
        let counts = tokenizer().tokenize("It's Google's guide, you\u{2019}ve seen it");

        assert!(!counts.contains_key("it"));
        assert_eq!(counts.get("googl"), 1);
        assert_eq!(counts.get("guid"), 1);
        assert_eq!(counts.get("seen"), 1);
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn test_no_stop_word_keys() {
        let stop_words = StopWords::english();
        let counts = tokenizer()
            .tokenize("Was it there? Those were the days: being, doing, having, and also another.");

        for key in counts.keys() {
            assert!(!stop_words.contains(key), "stop word {} leaked", key);
        }
    }

    #[test]
    fn test_extra_stop_words() {
        let tokenizer = Tokenizer::new(Arc::new(StopWords::english_with(["widget"])));
        let counts = tokenizer.tokenize("widget widgets gadget");

        assert!(!counts.contains_key("widget"));
        assert_eq!(counts.get("gadget"), 1);
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenizer().tokenize("").is_empty());
        assert!(tokenizer().tokenize("  ... !!! ").is_empty());
    }
}
