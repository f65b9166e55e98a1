use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Folds case one char at a time. Unlike `str::to_lowercase` this ignores
/// word context (final sigma), so a fragment of a word folds exactly like
/// the same chars inside the whole word.
pub struct LowercaseFilter;

impl TokenFilter for LowercaseFilter {
    fn apply(&self, tokens: &mut Vec<Token>) {
        for token in tokens.iter_mut() {
            if token.text.chars().any(char::is_uppercase) {
                token.text = token.text.chars().flat_map(char::to_lowercase).collect();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_sigma_folds_like_medial_sigma() {
        let mut tokens = vec![Token::new("ΟΔΟΣ".to_string(), 0, 0)];
        LowercaseFilter.apply(&mut tokens);
        assert_eq!(tokens[0].text, "οδοσ");
    }
}
