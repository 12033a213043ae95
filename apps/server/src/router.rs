use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};
use zelo::server::ApiState;

#[derive(OpenApi)]
#[openapi(info(title = "Zelopack calculators", description = "Production and laboratory formulas"))]
struct ApiDoc;

#[allow(unreachable_pub)]
/// Builds the application router: system routes, the calculators slice and the
/// Scalar API reference at `/api`.
pub fn init(state: ApiState) -> Router {
    let api = ApiDoc::openapi();

    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(zelo::server::system_router())
        .merge(zelo::server::router::calculators_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    Router::new().merge(openapi_routes).merge(scalar_routes)
}
