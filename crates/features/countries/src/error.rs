use atlas_database::DatabaseError;
use std::borrow::Cow;

pub const EMPTY_NAME_MESSAGE: &str = "Country name cannot be empty.";
pub const DUPLICATE_NAME_MESSAGE: &str = "Country with this name already exists.";
pub const DUPLICATE_OTHER_NAME_MESSAGE: &str = "Another country with this name already exists.";
pub const NOT_FOUND_MESSAGE: &str = "Country not found";

/// Failures of the country slice.
///
/// `Validation`, `Conflict` and `NotFound` display their message verbatim: it is what
/// the client receives.
#[atlas_derive::atlas_error]
pub enum CountryError {
    #[error("{message}")]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Country store error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal country error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CountryError {
    pub(crate) const fn empty_name() -> Self {
        Self::Validation { message: Cow::Borrowed(EMPTY_NAME_MESSAGE), context: None }
    }

    pub(crate) const fn duplicate(message: &'static str) -> Self {
        Self::Conflict { message: Cow::Borrowed(message), context: None }
    }

    pub(crate) const fn not_found() -> Self {
        Self::NotFound { message: Cow::Borrowed(NOT_FOUND_MESSAGE), context: None }
    }

    /// Maps a store failure, turning a unique-index violation into `Conflict`.
    pub(crate) fn from_store(err: DatabaseError, duplicate_message: &'static str) -> Self {
        if err.is_unique_violation() {
            return Self::Conflict {
                message: Cow::Borrowed(duplicate_message),
                context: Some("unique index".into()),
            };
        }
        Self::from(err)
    }
}

#[cfg(feature = "server")]
impl From<CountryError> for atlas_kernel::server::ApiError {
    fn from(err: CountryError) -> Self {
        match err {
            CountryError::Validation { message, .. } | CountryError::Conflict { message, .. } => {
                Self::BadRequest { message, context: None }
            }
            CountryError::NotFound { message, .. } => Self::NotFound { message, context: None },
            other @ (CountryError::Database { .. } | CountryError::Internal { .. }) => {
                Self::Internal { message: other.to_string().into(), context: None }
            }
        }
    }
}
