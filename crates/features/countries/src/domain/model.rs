use crate::error::CountryError;
use serde::{Deserialize, Serialize};

/// A stored country; `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub name: String,
}

impl Country {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// A validated country name.
///
/// The text is kept exactly as supplied; only the emptiness check looks at the
/// trimmed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryName(String);

impl CountryName {
    /// # Errors
    /// [`CountryError::Validation`] when the name is empty or whitespace only.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CountryError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CountryError::empty_name());
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used for uniqueness.
    #[must_use]
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for CountryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EMPTY_NAME_MESSAGE;

    #[test]
    fn blank_names_are_rejected() {
        for raw in ["", " ", "   ", "\t\n"] {
            let err = CountryName::parse(raw).expect_err("blank name");
            assert!(matches!(err, CountryError::Validation { .. }));
            assert_eq!(err.to_string(), EMPTY_NAME_MESSAGE);
        }
    }

    #[test]
    fn names_are_kept_verbatim() {
        let name = CountryName::parse(" Chile ").expect("valid");
        assert_eq!(name.as_str(), " Chile ");
    }

    #[test]
    fn key_ignores_case() {
        let upper = CountryName::parse("CHILE").expect("valid");
        let lower = CountryName::parse("chile").expect("valid");
        assert_eq!(upper.key(), lower.key());
        assert_eq!(CountryName::parse("Åland").expect("valid").key(), "åland");
    }
}
