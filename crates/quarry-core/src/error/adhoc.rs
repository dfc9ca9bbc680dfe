use super::Error;

/// An error built from a format string with no more specific kind.
#[derive(Debug)]
pub(super) struct AdhocError {
    message: Box<str>,
}

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates an ad-hoc error from format arguments. Prefer the [`err!`]
    /// and [`bail!`] macros.
    ///
    /// [`err!`]: crate::err
    /// [`bail!`]: crate::bail
    #[doc(hidden)]
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        let message = match args.as_str() {
            Some(s) => s.into(),
            None => args.to_string().into(),
        };
        Error::from(super::ErrorKind::Adhoc(AdhocError { message }))
    }
}
