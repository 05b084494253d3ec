use rust_stemmers::Algorithm;
use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::lowercase::LowercaseFilter;
use crate::analysis::filters::stemmer::StemmerFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
use crate::core::types::Term;

/// Turns raw text into the ordered sequence of normalized terms.
///
/// Documents and query operands must go through the same instance,
/// otherwise index terms and query terms stop matching.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> Vec<Term>;
}

/// Tokenizer followed by a chain of filters, applied in order
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
}

impl Analyzer {
    pub fn with_tokenizer(tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer { tokenizer, filters: Vec::new() }
    }

    pub fn then(mut self, filter: impl TokenFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        self.filters
            .iter()
            .fold(self.tokenizer.tokenize(text), |tokens, filter| filter.filter(tokens))
    }

    /// Unicode words, lower-cased, English Snowball stemming. No stop words:
    /// boolean retrieval has to be able to find every term.
    pub fn standard_english() -> Self {
        Analyzer::with_tokenizer(Box::new(StandardTokenizer::default()))
            .then(LowercaseFilter)
            .then(StemmerFilter::new(Algorithm::English))
    }
}

impl Normalizer for Analyzer {
    fn normalize(&self, text: &str) -> Vec<Term> {
        self.analyze(text)
            .into_iter()
            .map(|token| token.text)
            .filter(|text| !text.is_empty())
            .collect()
    }
}
