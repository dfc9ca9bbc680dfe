use super::Error;

/// Error when a query is malformed.
#[derive(Debug)]
pub(super) struct QuerySyntax {
    message: Box<str>,
}

impl std::error::Error for QuerySyntax {}

impl core::fmt::Display for QuerySyntax {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid query: {}", self.message)
    }
}

impl Error {
    /// Creates a query syntax error.
    pub fn query_syntax(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::QuerySyntax(QuerySyntax {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a query syntax error.
    pub fn is_query_syntax(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::QuerySyntax(_))
    }
}
