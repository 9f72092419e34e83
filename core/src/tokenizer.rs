use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;
use std::fmt;

lazy_static! {
    static ref PUNCT: Regex = Regex::new(r"[^\w\s]").expect("valid regex");
}

// Cap on re-stemming passes per token.
const MAX_STEM_PASSES: usize = 8;

/// Turns raw text into index terms: lowercase, strip punctuation, split on
/// whitespace, drop stopwords, stem. Order and multiplicity are preserved.
///
/// Output terms are fixed points: normalizing the joined output again yields
/// the same terms.
pub struct Normalizer {
    stopwords: HashSet<String>,
    stemmer: Stemmer,
}

impl Normalizer {
    /// Stopwords go through the same lowercase/punctuation steps as text, so
    /// `"Don't"` in the list filters the token `"dont"`.
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = stopwords
            .into_iter()
            .flat_map(|w| clean(w.as_ref()).split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .collect();
        Self { stopwords, stemmer: Stemmer::create(Algorithm::English) }
    }

    pub fn is_stopword(&self, token: &str) -> bool { self.stopwords.contains(token) }

    pub fn stopword_count(&self) -> usize { self.stopwords.len() }

    /// Sorted stopword list, as recorded in the cache manifest.
    pub fn stopwords(&self) -> Vec<String> {
        let mut words: Vec<String> = self.stopwords.iter().cloned().collect();
        words.sort_unstable();
        words
    }

    pub fn normalize(&self, text: &str) -> Vec<String> {
        clean(text)
            .split_whitespace()
            .filter(|tok| !self.is_stopword(tok))
            .map(|tok| self.stem(tok))
            .filter(|term| !term.is_empty() && !self.is_stopword(term))
            .collect()
    }

    /// Stems until the stemmer stops changing the token.
    fn stem(&self, token: &str) -> String {
        let mut current = token.to_string();
        for _ in 0..MAX_STEM_PASSES {
            let next = self.stemmer.stem(&current).into_owned();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Normalizes `word` and requires it to reduce to exactly one term.
    pub fn single_term(&self, word: &str) -> Option<String> {
        let mut terms = self.normalize(word);
        if terms.len() == 1 { terms.pop() } else { None }
    }
}

impl Default for Normalizer {
    fn default() -> Self { Self::new(std::iter::empty::<&str>()) }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("stopwords", &self.stopwords.len())
            .field("stemmer", &"english")
            .finish()
    }
}

/// NFKC + lowercase, then drop everything that is neither a word character nor whitespace.
fn clean(text: &str) -> String {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    PUNCT.replace_all(&lowered, "").into_owned()
}
