use std::borrow::Cow;

/// A specialized [`CacheError`] enum of this crate.
#[atlas_derive::atlas_error]
pub enum CacheError {
    /// Cached payload could not be encoded or decoded.
    #[error("Cache serialization error{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The backend could not be reached.
    #[error("Cache backend unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal cache error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
