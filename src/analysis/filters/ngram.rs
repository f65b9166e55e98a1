use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Character n-grams of each token. With `keep_short` a token shorter than
/// `min_gram` passes through whole instead of vanishing.
pub struct NGramFilter {
    pub min_gram: usize,
    pub max_gram: usize,
    pub keep_short: bool,
}

impl NGramFilter {
    pub fn new(min_gram: usize, max_gram: usize) -> Self {
        NGramFilter {
            min_gram,
            max_gram,
            keep_short: false,
        }
    }

    pub fn keep_short(mut self, keep: bool) -> Self {
        self.keep_short = keep;
        self
    }
}

impl TokenFilter for NGramFilter {
    fn apply(&self, tokens: &mut Vec<Token>) {
        let words = std::mem::take(tokens);

        for token in words {
            let chars: Vec<(usize, char)> = token.text.char_indices().collect();

            if chars.len() < self.min_gram {
                if self.keep_short && !chars.is_empty() {
                    tokens.push(token);
                }
                continue;
            }

            for n in self.min_gram..=self.max_gram.min(chars.len()) {
                for window in chars.windows(n) {
                    tokens.push(Token {
                        text: window.iter().map(|(_, c)| *c).collect(),
                        position: token.position,
                        offset: token.offset + window[0].0,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(filter: &NGramFilter, word: &str) -> Vec<String> {
        let mut tokens = vec![Token::new(word.to_string(), 0, 0)];
        filter.apply(&mut tokens);
        tokens.into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_into_trigrams() {
        assert_eq!(texts(&NGramFilter::new(3, 3), "file"), vec!["fil", "ile"]);
    }

    #[test]
    fn multibyte_characters_count_once() {
        assert_eq!(texts(&NGramFilter::new(3, 3), "öffnen"), vec!["öff", "ffn", "fne", "nen"]);
    }

    #[test]
    fn short_tokens_follow_keep_short() {
        assert!(texts(&NGramFilter::new(3, 3), "le").is_empty());
        assert_eq!(texts(&NGramFilter::new(3, 3).keep_short(true), "le"), vec!["le"]);
    }
}
