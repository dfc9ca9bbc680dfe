use super::Error;

/// Error when a connection URL cannot be used by the driver it was given to.
#[derive(Debug)]
pub(super) struct InvalidConnectionUrl {
    message: Box<str>,
}

impl std::error::Error for InvalidConnectionUrl {}

impl core::fmt::Display for InvalidConnectionUrl {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid connection URL: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid connection URL error.
    pub fn invalid_connection_url(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidConnectionUrl(
            InvalidConnectionUrl {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an invalid connection URL error.
    pub fn is_invalid_connection_url(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidConnectionUrl(_))
    }
}
