use crate::analysis::token::Token;

/// Rewrites the token stream of an analyzer in place
pub trait TokenFilter: Send + Sync {
    fn apply(&self, tokens: &mut Vec<Token>);
}
