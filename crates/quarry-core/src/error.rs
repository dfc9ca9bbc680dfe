mod adhoc;
mod driver;
mod invalid_connection_url;
mod invalid_schema;
mod missing_variable;
mod query_not_supported;
mod query_syntax;
mod too_complex_query;

use adhoc::AdhocError;
use driver::DriverError;
use invalid_connection_url::InvalidConnectionUrl;
use invalid_schema::InvalidSchema;
use missing_variable::MissingVariable;
use query_not_supported::QueryNotSupported;
use query_syntax::QuerySyntax;
use std::sync::Arc;
use too_complex_query::TooComplexQuery;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while building, compiling, planning or executing
/// queries and migrations.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let inner = match consequent.inner {
            None => ErrorInner {
                kind: ErrorKind::Unknown,
                cause: None,
            },
            Some(inner) => Arc::try_unwrap(inner).unwrap_or_else(|shared| ErrorInner {
                kind: ErrorKind::Anyhow(anyhow::anyhow!("{}", shared.kind)),
                cause: shared.cause.clone(),
            }),
        };

        // `self` goes at the end of any chain the consequent already carries
        let cause = match inner.cause {
            None => self,
            Some(existing) => self.context_impl(existing),
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind: inner.kind,
                cause: Some(cause),
            })),
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Driver(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Driver(DriverError),
    InvalidConnectionUrl(InvalidConnectionUrl),
    InvalidSchema(InvalidSchema),
    MissingVariable(MissingVariable),
    QueryNotSupported(QueryNotSupported),
    QuerySyntax(QuerySyntax),
    TooComplexQuery(TooComplexQuery),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            InvalidConnectionUrl(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            MissingVariable(err) => core::fmt::Display::fmt(err, f),
            QueryNotSupported(err) => core::fmt::Display::fmt(err, f),
            QuerySyntax(err) => core::fmt::Display::fmt(err, f),
            TooComplexQuery(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown quarry error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = Error::from_args(format_args!("root cause"));
        let mid = Error::from_args(format_args!("middle context"));
        let top = Error::from_args(format_args!("top context"));

        let chained = root.context(mid).context(top);
        assert_eq!(
            chained.to_string(),
            "top context: middle context: root cause"
        );
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn missing_variable_names_the_variable() {
        let err = Error::missing_variable("user_id");
        assert!(err.is_missing_variable());
        assert_eq!(err.to_string(), "missing query variable `user_id`");
    }

    #[test]
    fn too_complex_query_with_context() {
        let err = Error::too_complex_query("XOR cannot be decomposed")
            .context(err!("planning select on `users`"));

        assert_eq!(
            err.to_string(),
            "planning select on `users`: query too complex: XOR cannot be decomposed"
        );
    }

    #[test]
    fn kinds_are_distinguishable() {
        assert!(Error::query_syntax("no collection").is_query_syntax());
        assert!(Error::query_not_supported("join not supported").is_query_not_supported());
        assert!(Error::invalid_schema("two primary indexes").is_invalid_schema());
        assert!(!Error::invalid_schema("two primary indexes").is_query_syntax());
    }

    #[test]
    fn driver_error_walks_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = Error::driver(io);
        assert!(err.is_driver());
        assert_eq!(err.to_string(), "disk full");
    }
}
