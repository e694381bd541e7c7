use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::estimate_controller::{estimate, resolve_parameters};
use crate::controllers::reference_controller::{
    get_presentation, list_home_types, list_regions, list_suppliers, reload_reference,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Estimation
        .route("/resolve",                 post(resolve_parameters))
        .route("/estimate",                post(estimate))
        // Reference tables
        .route("/reference/regions",       get(list_regions))
        .route("/reference/suppliers",     get(list_suppliers))
        .route("/reference/home-types",    get(list_home_types))
        .route("/reference/reload",        post(reload_reference))
        // Front end
        .route("/presentation",            get(get_presentation))
        .with_state(state)
}
