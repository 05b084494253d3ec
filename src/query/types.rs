use std::fmt;
use crate::core::types::Term;

/// Boolean operators, case-sensitive uppercase keywords in query text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Not,
    And,
    Or,
}

impl Operator {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "NOT" => Some(Operator::Not),
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            _ => None,
        }
    }

    /// NOT > AND > OR
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Not => 2,
            Operator::And => 1,
            Operator::Or => 0,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Operator::Not => 1,
            Operator::And | Operator::Or => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let keyword = match self {
            Operator::Not => "NOT",
            Operator::And => "AND",
            Operator::Or => "OR",
        };
        f.write_str(keyword)
    }
}

/// Token of an infix query as written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixToken<'a> {
    Word(&'a str),
    Op(Operator),
    LeftParen,
    RightParen,
}

impl<'a> InfixToken<'a> {
    pub fn classify(raw: &'a str) -> Self {
        match raw {
            "(" => InfixToken::LeftParen,
            ")" => InfixToken::RightParen,
            _ => Operator::from_keyword(raw)
                .map(InfixToken::Op)
                .unwrap_or(InfixToken::Word(raw)),
        }
    }
}

/// Token of a postfix (RPN) query; operands are already normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    Operand(Term),
    Op(Operator),
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QueryToken::Operand(term) => f.write_str(term),
            QueryToken::Op(op) => write!(f, "{}", op),
        }
    }
}
