use axum::{extract::State, Json};
use tracing::info;

use crate::config::PresentationConfig;
use crate::models::reference::{HomeTypeRow, ReferenceSummary, RegionRow, SupplierRow};
use crate::shared_state::AppState;

/// GET /api/reference/regions
/// List postcode areas and their regional yield
#[utoipa::path(
    get,
    path = "/api/reference/regions",
    responses(
        (status = 200, description = "Regional yield table", body = Vec<RegionRow>)
    )
)]
pub async fn list_regions(State(state): State<AppState>) -> Json<Vec<RegionRow>> {
    Json(state.tables().regions.rows().to_vec())
}

/// GET /api/reference/suppliers
/// List export suppliers and their SEG rates
///
/// Feeds the supplier drop-down. The form adds the "Select your supplier"
/// and "I don't know" entries itself.
#[utoipa::path(
    get,
    path = "/api/reference/suppliers",
    responses(
        (status = 200, description = "Supplier export rate table", body = Vec<SupplierRow>)
    )
)]
pub async fn list_suppliers(State(state): State<AppState>) -> Json<Vec<SupplierRow>> {
    Json(state.tables().suppliers.rows().to_vec())
}

/// GET /api/reference/home-types
/// List home types with recommended panel counts
#[utoipa::path(
    get,
    path = "/api/reference/home-types",
    responses(
        (status = 200, description = "Home type table", body = Vec<HomeTypeRow>)
    )
)]
pub async fn list_home_types(State(state): State<AppState>) -> Json<Vec<HomeTypeRow>> {
    Json(state.tables().home_types.rows().to_vec())
}

/// POST /api/reference/reload
/// Reload the reference tables
///
/// Re-reads the configured table files and replaces the tables in use in one
/// step. Files that fail to load fall back to the built-in rows.
#[utoipa::path(
    post,
    path = "/api/reference/reload",
    responses(
        (status = 200, description = "Row counts of the reloaded tables", body = ReferenceSummary)
    )
)]
pub async fn reload_reference(State(state): State<AppState>) -> Json<ReferenceSummary> {
    let summary = state.reload_tables();
    info!(
        regions = summary.regions,
        suppliers = summary.suppliers,
        home_types = summary.home_types,
        "reference tables reloaded"
    );
    Json(summary)
}

/// GET /api/presentation
/// Front-end settings
///
/// Flags only the form page reads, such as whether to inject the analytics
/// snippet.
#[utoipa::path(
    get,
    path = "/api/presentation",
    responses(
        (status = 200, description = "Presentation settings", body = PresentationConfig)
    )
)]
pub async fn get_presentation(State(state): State<AppState>) -> Json<PresentationConfig> {
    Json(state.presentation.as_ref().clone())
}
