use super::handlers;
use crate::Countries;
use axum::Extension;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Country routes, documented for `OpenAPI`, with `service` injected as an extension.
pub fn router<S>(service: Arc<Countries>) -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
{
    OpenApiRouter::<S>::new()
        .routes(routes!(handlers::list_countries, handlers::create_country))
        .routes(routes!(
            handlers::get_country,
            handlers::update_country,
            handlers::delete_country
        ))
        .layer(Extension(service))
}
