use super::dto::{CountryDto, CountryPayload};
use crate::Countries;
use crate::error::NOT_FOUND_MESSAGE;
use atlas_derive::api_handler;
use atlas_kernel::domain::constants::COUNTRIES_TAG;
use atlas_kernel::server::{ApiError, ErrorBody};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

#[api_handler(
    get,
    path = "/countries",
    responses(
        (status = OK, description = "All countries", body = [CountryDto]),
        (status = INTERNAL_SERVER_ERROR, description = "Unexpected failure", body = ErrorBody),
    ),
    tag = COUNTRIES_TAG,
)]
pub(super) async fn list_countries(
    Extension(service): Extension<Arc<Countries>>,
) -> Result<Json<Vec<CountryDto>>, ApiError> {
    let countries = service.list().await?;
    Ok(Json(countries.into_iter().map(CountryDto::from).collect()))
}

#[api_handler(
    get,
    path = "/countries/{id}",
    params(("id" = String, Path, description = "Country id")),
    responses(
        (status = OK, description = "The country", body = CountryDto),
        (status = NOT_FOUND, description = "Unknown id", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Unexpected failure", body = ErrorBody),
    ),
    tag = COUNTRIES_TAG,
)]
pub(super) async fn get_country(
    Extension(service): Extension<Arc<Countries>>,
    Path(id): Path<String>,
) -> Result<Json<CountryDto>, ApiError> {
    service
        .get(&id)
        .await?
        .map(|country| Json(country.into()))
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))
}

#[api_handler(
    post,
    path = "/countries",
    request_body = CountryPayload,
    responses(
        (status = CREATED, description = "Country created", body = CountryDto),
        (status = BAD_REQUEST, description = "Missing, empty or duplicate name", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Unexpected failure", body = ErrorBody),
    ),
    tag = COUNTRIES_TAG,
)]
pub(super) async fn create_country(
    Extension(service): Extension<Arc<Countries>>,
    payload: Result<Json<CountryPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<CountryDto>), ApiError> {
    let Json(payload) = payload?;
    let country = service.create(&payload.into_name()?).await?;
    Ok((StatusCode::CREATED, Json(country.into())))
}

#[api_handler(
    put,
    path = "/countries/{id}",
    params(("id" = String, Path, description = "Country id")),
    request_body = CountryPayload,
    responses(
        (status = OK, description = "Country renamed", body = CountryDto),
        (status = BAD_REQUEST, description = "Missing, empty or duplicate name", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown id", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Unexpected failure", body = ErrorBody),
    ),
    tag = COUNTRIES_TAG,
)]
pub(super) async fn update_country(
    Extension(service): Extension<Arc<Countries>>,
    Path(id): Path<String>,
    payload: Result<Json<CountryPayload>, JsonRejection>,
) -> Result<Json<CountryDto>, ApiError> {
    let Json(payload) = payload?;
    let country = service.update(&id, &payload.into_name()?).await?;
    Ok(Json(country.into()))
}

#[api_handler(
    delete,
    path = "/countries/{id}",
    params(("id" = String, Path, description = "Country id")),
    responses(
        (status = NO_CONTENT, description = "Country deleted"),
        (status = NOT_FOUND, description = "Unknown id", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Unexpected failure", body = ErrorBody),
    ),
    tag = COUNTRIES_TAG,
)]
pub(super) async fn delete_country(
    Extension(service): Extension<Arc<Countries>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
