use utoipa::OpenApi;
use crate::controllers::{estimate_controller, reference_controller};
use crate::models::{api, estimate, reference};
use crate::services::assessment;
use crate::config;

#[derive(OpenApi)]
#[openapi(
    paths(
        estimate_controller::resolve_parameters,
        estimate_controller::estimate,
        reference_controller::list_regions,
        reference_controller::list_suppliers,
        reference_controller::list_home_types,
        reference_controller::reload_reference,
        reference_controller::get_presentation
    ),
    components(
        schemas(
            api::EstimateRequest,
            api::ResolveRequest,
            api::EstimateResponse,
            api::ErrorResponse,
            estimate::Orientation,
            estimate::HomeType,
            estimate::EstimationResult,
            estimate::ResolvedParameters,
            reference::RegionRow,
            reference::SupplierRow,
            reference::HomeTypeRow,
            assessment::Assessment,
            config::PresentationConfig
        )
    ),
    tags(
        (name = "solar-roi", description = "Solar ROI Estimation API")
    )
)]
pub struct ApiDoc;
