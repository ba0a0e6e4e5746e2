use core::fmt::{self, Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The requested survey does not exist.
    NotFound,
    /// The requested survey exists, but the user has already answered it.
    /// Kept distinct from [`Error::NotFound`] so callers can redirect instead
    /// of showing a missing-survey page.
    AlreadyAnswered,
    /// No authenticated user id is available for a user-scoped operation.
    Unauthenticated,
    /// The document store failed underneath us.
    Backend(store::Error),
}

impl From<store::Error> for Error {
    fn from(err: store::Error) -> Self {
        Self::Backend(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "Survey not found.",
            Self::AlreadyAnswered => "You have already answered this survey.",
            Self::Unauthenticated => "No user is currently logged in.",
            Self::Backend(err) => return err.fmt(f),
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
