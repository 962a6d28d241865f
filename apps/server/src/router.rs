use atlas_countries::Countries;
use atlas_countries::api::rest::routes as countries;
use atlas_kernel::server::ApiState;
use atlas_kernel::server::router::system_router;
use axum::Router;
use axum::http::StatusCode;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "Atlas", description = "Country registry API"))]
struct ApiDoc;

#[allow(unreachable_pub)]
pub fn init(state: ApiState, countries: Arc<Countries>) -> Router {
    let request_timeout = state.config.server.request_timeout();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(system_router())
        .merge(countries::router(countries))
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api-docs", api_doc);

    // Outermost last: trace sees every request, CORS answers preflights before the deadline applies.
    Router::new()
        .merge(openapi_routes)
        .merge(scalar_routes)
        .layer(TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
