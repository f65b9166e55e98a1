use std::collections::BTreeSet;
use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::lowercase::LowercaseFilter;
use crate::analysis::filters::ngram::NGramFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{Tokenizer, WordTokenizer};

/// Turns source text into index terms: a tokenizer followed by filters
pub struct Analyzer {
    tokenizer: Box<dyn Tokenizer>,
    filters: Vec<Box<dyn TokenFilter>>,
}

impl Analyzer {
    pub fn new(tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
        }
    }

    pub fn with_filter<F: TokenFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);
        for filter in &self.filters {
            filter.apply(&mut tokens);
        }
        tokens
    }

    /// Distinct token texts, sorted.
    pub fn terms(&self, text: &str) -> BTreeSet<String> {
        self.analyze(text).into_iter().map(|t| t.text).collect()
    }

    /// Index terms for source texts: lower-cased word trigrams, short words
    /// kept whole so "OK" or "le" can still be found.
    pub fn trigram() -> Self {
        Analyzer::new(Box::new(WordTokenizer))
            .with_filter(LowercaseFilter)
            .with_filter(NGramFilter::new(3, 3).keep_short(true))
    }

    /// Lookup terms for a literal phrase. Only full trigrams: a phrase may
    /// start or end mid-word, and a partial word's trigrams are still
    /// trigrams of the whole word, but its short remainder is not a term.
    pub fn substring_trigram() -> Self {
        Analyzer::new(Box::new(WordTokenizer))
            .with_filter(LowercaseFilter)
            .with_filter(NGramFilter::new(3, 3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigram_terms_are_lowercased_and_deduplicated() {
        let terms = Analyzer::trigram().terms("Open OPEN le");
        let terms: Vec<_> = terms.into_iter().collect();
        assert_eq!(terms, vec!["le", "ope", "pen"]);
    }

    #[test]
    fn substring_terms_drop_short_fragments() {
        let terms = Analyzer::substring_trigram().terms("en fil");
        let terms: Vec<_> = terms.into_iter().collect();
        assert_eq!(terms, vec!["fil"]);
    }
}
