pub mod lowercase;
pub mod ngram;
