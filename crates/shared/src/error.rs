#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("malformed generated content: {0}")]
    Parse(String),

    #[error("{0}")]
    EmptyInput(String),

    #[error("no artifact returned: {0}")]
    EmptyResult(String),

    #[error("no city identified at this location")]
    NotFound,

    #[error("a request for `{0}` is already in flight")]
    DuplicateRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Validation errors are raised synchronously at the point of input,
    /// everything else comes back from a collaborator.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<time::error::Parse> for Error {
    fn from(value: time::error::Parse) -> Self {
        Self::Validation(value.to_string())
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Generation(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Generation(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! validation {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Validation(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Validation(format!($fmt, $($arg)*)))
    };
}
