use super::error::{ApiError, ErrorBody};
use crate::binder::{CalculationReport, CalculationRequest, calculate};
use crate::catalog::{self, Descriptor};
use crate::Calculators;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use std::collections::BTreeMap;
use zelo_derive::{api_handler, api_model};
use zelo_domain::constants::{CALCULATORS_TAG, FACTORS_TAG};
use zelo_factors::LoadedFactors;
use zelo_kernel::server::ApiState;

#[api_model(deny_unknown_fields = false)]
#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub(super) struct CatalogQuery {
    /// Search text; at least two characters. Omit to list everything.
    q: Option<String>,
}

/// Active conversion factors and where they came from.
#[api_model]
pub(super) struct FactorsResponse {
    factors: BTreeMap<String, f64>,
    /// `defaults`, `file`, `remote` or `manual`.
    origin: String,
    /// Why the configured source was not used, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

impl From<LoadedFactors> for FactorsResponse {
    fn from(loaded: LoadedFactors) -> Self {
        Self {
            factors: loaded.factors.to_map(),
            origin: loaded.origin.to_string(),
            warning: loaded.warning,
        }
    }
}

#[api_handler(
    post,
    path = "/api/calculate",
    request_body = CalculationRequest,
    responses(
        (status = OK, description = "Calculation result", body = CalculationReport),
        (status = BAD_REQUEST, description = "Malformed JSON body", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid input", body = ErrorBody),
    ),
    tag = CALCULATORS_TAG,
)]
pub(super) async fn calculate_handler(
    State(state): State<ApiState>,
    body: Result<Json<CalculationRequest>, JsonRejection>,
) -> Result<Json<CalculationReport>, ApiError> {
    let Json(request) = body?;
    let slice = state.try_get_slice::<Calculators>()?;
    let factors = slice.factors.factors();
    Ok(Json(calculate(&request, &factors)?))
}

#[api_handler(
    get,
    path = "/api/calculators",
    params(CatalogQuery),
    responses((status = OK, description = "Calculator catalogue", body = Vec<Descriptor>)),
    tag = CALCULATORS_TAG,
)]
pub(super) async fn catalog_handler(Query(query): Query<CatalogQuery>) -> Json<Vec<Descriptor>> {
    Json(match query.q.as_deref() {
        Some(q) => catalog::search(q),
        None => catalog::all().collect(),
    })
}

#[api_handler(
    get,
    path = "/api/conversion-factors",
    responses((status = OK, description = "Active conversion factors", body = FactorsResponse)),
    tag = FACTORS_TAG,
)]
pub(super) async fn get_factors_handler(
    State(state): State<ApiState>,
) -> Result<Json<FactorsResponse>, ApiError> {
    let slice = state.try_get_slice::<Calculators>()?;
    Ok(Json(slice.factors.snapshot().into()))
}

#[api_handler(
    put,
    path = "/api/conversion-factors",
    request_body = BTreeMap<String, f64>,
    responses(
        (status = OK, description = "Factors replaced", body = FactorsResponse),
        (status = BAD_REQUEST, description = "Malformed JSON body", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid factor", body = ErrorBody),
    ),
    tag = FACTORS_TAG,
)]
pub(super) async fn put_factors_handler(
    State(state): State<ApiState>,
    body: Result<Json<BTreeMap<String, f64>>, JsonRejection>,
) -> Result<Json<FactorsResponse>, ApiError> {
    let Json(overrides) = body?;
    let slice = state.try_get_slice::<Calculators>()?;
    slice.factors.replace(&overrides).await?;
    Ok(Json(slice.factors.snapshot().into()))
}
