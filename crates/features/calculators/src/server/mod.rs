//! HTTP surface of the calculators slice.

mod error;
mod handlers;

pub use error::{ApiError, ErrorBody};

use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use zelo_kernel::server::ApiState;

/// Routes for calculation, the catalogue and the conversion factors.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::calculate_handler))
        .routes(routes!(handlers::catalog_handler))
        .routes(routes!(handlers::get_factors_handler, handlers::put_factors_handler))
}
