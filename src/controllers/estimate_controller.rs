use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::error::EstimateError;
use crate::models::api::{
    ErrorResponse, EstimateInputs, EstimateRequest, EstimateResponse, ResolveRequest,
};
use crate::models::estimate::{HomeType, ResolvedParameters, SupplierSelection};
use crate::services::{assessment, resolver};
use crate::shared_state::AppState;

impl IntoResponse for EstimateError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            field: Some(self.field().to_owned()),
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

/// POST /api/resolve
/// Resolve reference parameters
///
/// Maps a postcode, supplier and home type to regional yield, default export
/// rate and recommended minimum panel count. Unmatched values resolve to
/// fixed UK-average fallbacks; this endpoint does not fail on unknown input.
#[utoipa::path(
    post,
    path = "/api/resolve",
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Resolved reference parameters", body = ResolvedParameters)
    )
)]
pub async fn resolve_parameters(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Json<ResolvedParameters> {
    let supplier = SupplierSelection::from_label(req.supplier.as_deref());
    let home_type = req.home_type.as_deref().and_then(HomeType::from_label);
    Json(resolver::resolve(
        &state.tables(),
        &req.postcode,
        &supplier,
        home_type,
    ))
}

/// POST /api/estimate
/// Estimate the return of a solar installation
///
/// Resolves reference data for the submitted form, runs the estimate and
/// attaches a structured assessment. A `payback_years` of 0 means the payback
/// cannot be calculated because the annual benefit is not positive.
#[utoipa::path(
    post,
    path = "/api/estimate",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Estimate for the submitted inputs", body = EstimateResponse),
        (status = 422, description = "A field violates its precondition", body = ErrorResponse)
    )
)]
pub async fn estimate(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, EstimateError> {
    let inputs = EstimateInputs::try_from(req).inspect_err(|e| {
        warn!(field = e.field(), error = %e, "rejected estimate request");
    })?;

    let tables = state.tables();
    let resolved = resolver::resolve_for_property(&tables, &inputs.property, &inputs.supplier);

    let result = state
        .estimator
        .estimate(
            &inputs.property,
            &inputs.usage,
            &inputs.tariff,
            &inputs.system,
            &resolved,
        )
        .inspect_err(|e| {
            warn!(field = e.field(), error = %e, "rejected estimate request");
        })?;

    let assessment =
        assessment::assess(&result, &inputs.usage, &inputs.system, resolved.min_panels);

    info!(
        region = %resolved.region,
        panels = inputs.system.panel_count,
        kwp = result.system_size_kwp,
        payback_years = result.payback_years,
        "estimate served"
    );

    Ok(Json(EstimateResponse {
        timestamp: chrono::Utc::now(),
        inputs,
        resolved,
        result,
        assessment,
    }))
}
