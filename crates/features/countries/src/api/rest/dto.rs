use crate::domain::model::Country;
use atlas_derive::api_model;
use atlas_kernel::server::ApiError;

/// Returned when a create or update body has no `name`.
pub const NAME_REQUIRED_MESSAGE: &str = "Country name is required.";

/// A country as exposed over HTTP.
#[api_model]
pub struct CountryDto {
    /// Store-assigned identifier
    pub id: String,
    pub name: String,
}

impl From<Country> for CountryDto {
    fn from(country: Country) -> Self {
        Self { id: country.id, name: country.name }
    }
}

/// Body of `POST /countries` and `PUT /countries/{id}`.
///
/// Extra fields (such as an echoed `id`) are ignored.
#[api_model(deny_unknown_fields = false)]
pub struct CountryPayload {
    #[schema(example = "Chile")]
    pub name: Option<String>,
}

impl CountryPayload {
    /// # Errors
    /// [`ApiError::BadRequest`] when `name` is missing or `null`.
    pub fn into_name(self) -> Result<String, ApiError> {
        self.name.ok_or_else(|| ApiError::bad_request(NAME_REQUIRED_MESSAGE))
    }
}
