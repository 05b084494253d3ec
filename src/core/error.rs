use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    InvalidArgument,
    BlockNotFound,
    MalformedPostings,
    UnbalancedParentheses,
    QueryTooLong,
    InvalidQuery,
    Internal,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn malformed_postings(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::MalformedPostings, context.into())
    }

    /// Errors that only invalidate the query being evaluated.
    /// A batch keeps going after these; everything else aborts the run.
    pub fn is_query_local(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MalformedPostings
                | ErrorKind::UnbalancedParentheses
                | ErrorKind::QueryTooLong
                | ErrorKind::InvalidQuery
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: format!("JSON error: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_local_classification() {
        assert!(Error::malformed_postings("bad line").is_query_local());
        assert!(Error::new(ErrorKind::QueryTooLong, String::new()).is_query_local());
        assert!(Error::new(ErrorKind::UnbalancedParentheses, String::new()).is_query_local());
        assert!(!Error::new(ErrorKind::BlockNotFound, String::new()).is_query_local());

        let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(io.kind, ErrorKind::Io);
        assert!(!io.is_query_local());
    }
}
