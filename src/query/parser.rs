use std::sync::Arc;
use crate::analysis::analyzer::Normalizer;
use crate::core::error::{Error, ErrorKind, Result};
use crate::query::types::{InfixToken, Operator, QueryToken};

/// Split a query on whitespace, with `(` and `)` always standing alone
/// even when glued to a word: `(cat` -> `(`, `cat`.
pub fn tokenize(query: &str) -> Vec<&str> {
    let mut tokens = Vec::new();

    for chunk in query.split_whitespace() {
        let mut start = 0;
        for (pos, ch) in chunk.char_indices() {
            if ch == '(' || ch == ')' {
                if start < pos {
                    tokens.push(&chunk[start..pos]);
                }
                tokens.push(&chunk[pos..pos + 1]);
                start = pos + 1;
            }
        }
        if start < chunk.len() {
            tokens.push(&chunk[start..]);
        }
    }

    tokens
}

/// Converts infix boolean queries into postfix form (shunting-yard)
pub struct QueryParser {
    pub normalizer: Arc<dyn Normalizer>,
    pub max_query_length: usize,
}

enum Stacked {
    Op(Operator),
    LeftParen,
}

impl QueryParser {
    pub fn new(normalizer: Arc<dyn Normalizer>, max_query_length: usize) -> Self {
        QueryParser {
            normalizer,
            max_query_length,
        }
    }

    /// Length check, tokenization and conversion of one query line
    pub fn parse(&self, query: &str) -> Result<Vec<QueryToken>> {
        let length = query.chars().count();
        if length > self.max_query_length {
            return Err(Error::new(
                ErrorKind::QueryTooLong,
                format!("query has {} characters, limit is {}", length, self.max_query_length),
            ));
        }

        self.to_postfix(&tokenize(query))
    }

    /// Operators leave the stack only for strictly higher precedence, so
    /// equal-precedence chains (`a AND b AND c`) nest to the right.
    pub fn to_postfix(&self, tokens: &[&str]) -> Result<Vec<QueryToken>> {
        let mut output = Vec::with_capacity(tokens.len());
        let mut stack: Vec<Stacked> = Vec::new();

        for &raw in tokens {
            match InfixToken::classify(raw) {
                InfixToken::Word(word) => self.push_operand(word, &mut output),
                InfixToken::Op(op) => {
                    while let Some(Stacked::Op(top)) = stack.last() {
                        if top.precedence() <= op.precedence() {
                            break;
                        }
                        output.push(QueryToken::Op(*top));
                        stack.pop();
                    }
                    stack.push(Stacked::Op(op));
                }
                InfixToken::LeftParen => stack.push(Stacked::LeftParen),
                InfixToken::RightParen => loop {
                    match stack.pop() {
                        Some(Stacked::Op(op)) => output.push(QueryToken::Op(op)),
                        Some(Stacked::LeftParen) => break,
                        None => return Err(unbalanced("')' without matching '('")),
                    }
                },
            }
        }

        while let Some(stacked) = stack.pop() {
            match stacked {
                Stacked::Op(op) => output.push(QueryToken::Op(op)),
                Stacked::LeftParen => return Err(unbalanced("'(' is never closed")),
            }
        }

        Ok(output)
    }

    /// A word the normalizer splits (`e-mail` -> `e`, `mail`) becomes the
    /// conjunction of its terms. Falls back to the lower-cased word if
    /// normalization drops everything.
    fn push_operand(&self, word: &str, output: &mut Vec<QueryToken>) {
        let mut terms = self.normalizer.normalize(word);
        if terms.is_empty() {
            terms.push(word.to_lowercase());
        }

        let joins = terms.len() - 1;
        output.extend(terms.into_iter().map(QueryToken::Operand));
        output.extend(std::iter::repeat_n(QueryToken::Op(Operator::And), joins));
    }
}

fn unbalanced(context: &str) -> Error {
    Error::new(ErrorKind::UnbalancedParentheses, context.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::Analyzer;

    fn parser() -> QueryParser {
        QueryParser::new(Arc::new(Analyzer::standard_english()), 64)
    }

    fn postfix(query: &str) -> String {
        parser().parse(query).unwrap()
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_tokenize_separates_parentheses() {
        assert_eq!(tokenize("(sat OR cat) AND NOT dog"),
                   vec!["(", "sat", "OR", "cat", ")", "AND", "NOT", "dog"]);
        assert_eq!(tokenize("((a))b"), vec!["(", "(", "a", ")", ")", "b"]);
        assert_eq!(tokenize("  \t "), Vec::<&str>::new());
    }

    #[test]
    fn test_precedence() {
        assert_eq!(postfix("a OR b AND c"), "a b c AND OR");
        assert_eq!(postfix("a AND b OR c"), "a b AND c OR");
        assert_eq!(postfix("NOT a AND b"), "a NOT b AND");
        assert_eq!(postfix("a AND NOT b"), "a b NOT AND");
        assert_eq!(postfix("a AND b AND c"), "a b c AND AND");
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(postfix("(sat OR cat) AND NOT dog"), "sat cat OR dog NOT AND");
        assert_eq!(postfix("a AND (b OR (c AND d))"), "a b c d AND OR AND");
        assert_eq!(postfix("NOT (a OR b)"), "a b OR NOT");
    }

    #[test]
    fn test_operands_are_normalized() {
        assert_eq!(postfix("Cats AND DOGS"), "cat dog AND");
        // Lower-case keywords are ordinary terms
        assert_eq!(postfix("cats and dogs"), "cat and dog");
        assert_eq!(postfix("?!"), "?!");
    }

    #[test]
    fn test_split_operand_becomes_conjunction() {
        assert_eq!(postfix("e-mail"), "e mail AND");
        assert_eq!(postfix("e-mail OR cat"), "e mail AND cat OR");
        assert_eq!(postfix("NOT e-mail"), "e mail AND NOT");
        assert_eq!(postfix("state-of-the-art"), "state of the art AND AND AND");
    }

    #[test]
    fn test_unbalanced_parentheses() {
        for query in ["(sat AND dog", "sat AND dog)", "((a)", ")("] {
            let err = parser().parse(query).unwrap_err();
            assert_eq!(err.kind, ErrorKind::UnbalancedParentheses, "{}", query);
        }
    }

    #[test]
    fn test_query_too_long() {
        let query = "cat OR ".repeat(20);
        let err = parser().parse(&query).unwrap_err();
        assert_eq!(err.kind, ErrorKind::QueryTooLong);
        assert!(parser().parse("cat OR dog").is_ok());
    }
}
