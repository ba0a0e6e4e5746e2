use core::fmt::{self, Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The backend could not be reached or rejected the call.
    Unavailable,
    /// A stored document does not have the expected shape.
    Data,
    /// A transaction touched a document outside its declared scope.
    Scope,
}

impl From<serde_json::Error> for Error {
    fn from(_: serde_json::Error) -> Self {
        Self::Data
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unavailable => "The document store is unavailable.",
            Self::Data => "Unexpected document shape in the store.",
            Self::Scope => "Transaction touched a document outside its scope.",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
