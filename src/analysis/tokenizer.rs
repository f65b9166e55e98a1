use crate::analysis::token::Token;
use unicode_segmentation::UnicodeSegmentation;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Splits on Unicode word boundaries (UAX #29); punctuation and whitespace
/// produce no token. Every word is kept however long: substring lookups
/// rely on each word of a source being indexed.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.unicode_word_indices()
            .enumerate()
            .map(|(position, (offset, word))| Token::new(word.to_string(), position as u32, offset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_word_boundaries() {
        let tokens = WordTokenizer.tokenize("Open file, now!");
        let words: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["Open", "file", "now"]);
        assert_eq!(tokens[1].offset, 5);
        assert_eq!(tokens[2].position, 2);
    }

    #[test]
    fn non_latin_words_are_tokens() {
        let words: Vec<_> = WordTokenizer.tokenize("Сохранить файл?")
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(words, vec!["Сохранить", "файл"]);
    }
}
