use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EstimateError;
use crate::models::estimate::{
    EstimationResult, HomeType, HotWaterSystem, Orientation, PropertyProfile,
    ResolvedParameters, SupplierSelection, SystemConfig, TariffProfile, UsageProfile,
};
use crate::services::assessment::Assessment;

// ─── Requests ────────────────────────────────────────────────────────────────

/// Raw form submission. Labels are kept as strings so a bad value can be
/// reported against its field instead of failing the whole body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EstimateRequest {
    #[serde(default)]
    pub postcode: String,
    #[schema(example = "South")]
    pub orientation: String,
    #[serde(default)]
    pub shading: bool,
    #[schema(example = "Semi-detached")]
    pub home_type: Option<String>,

    #[schema(example = 3500.0)]
    pub annual_consumption_kwh: f64,
    #[serde(default)]
    pub has_ev: bool,
    #[schema(example = "Gas boiler")]
    pub hot_water_system: Option<String>,
    #[serde(default)]
    pub home_during_day: bool,

    /// p/kWh
    #[schema(example = 24.5)]
    pub day_rate: f64,
    /// p/kWh, defaults to the day rate
    pub night_rate: Option<f64>,
    /// p/kWh, overrides the supplier default
    pub export_rate: Option<f64>,
    /// Supplier display name, "Select your supplier" or "I don't know"
    pub supplier: Option<String>,

    /// Signed so a negative count is reported as invalid input.
    #[schema(example = 10)]
    pub panel_count: i64,
    #[schema(example = 460.0)]
    pub panel_wattage_w: f64,
    #[serde(default)]
    pub battery: bool,
}

/// Typed inputs of one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EstimateInputs {
    pub property: PropertyProfile,
    pub usage: UsageProfile,
    pub tariff: TariffProfile,
    pub supplier: SupplierSelection,
    pub system: SystemConfig,
}

impl TryFrom<EstimateRequest> for EstimateInputs {
    type Error = EstimateError;

    fn try_from(req: EstimateRequest) -> Result<Self, Self::Error> {
        let orientation = req.orientation.parse::<Orientation>()?;
        let panel_count = u32::try_from(req.panel_count).map_err(|_| {
            EstimateError::invalid(
                "panel_count",
                format!("{} is not a valid panel count", req.panel_count),
            )
        })?;
        // Form-level checks; the estimator itself never reads these two.
        if !(req.annual_consumption_kwh.is_finite() && req.annual_consumption_kwh > 0.0) {
            return Err(EstimateError::invalid(
                "annual_consumption_kwh",
                format!("{} must be greater than zero", req.annual_consumption_kwh),
            ));
        }
        if let Some(rate) = req.night_rate.filter(|r| !(r.is_finite() && *r >= 0.0)) {
            return Err(EstimateError::invalid(
                "night_rate",
                format!("{rate} must not be negative"),
            ));
        }

        Ok(Self {
            property: PropertyProfile {
                postcode: req.postcode,
                orientation,
                shading: req.shading,
                home_type: req.home_type.as_deref().and_then(HomeType::from_label),
            },
            usage: UsageProfile {
                annual_consumption_kwh: req.annual_consumption_kwh,
                has_ev: req.has_ev,
                hot_water: req
                    .hot_water_system
                    .as_deref()
                    .and_then(HotWaterSystem::from_label),
                home_during_day: req.home_during_day,
            },
            tariff: TariffProfile {
                day_rate: req.day_rate,
                night_rate: req.night_rate.unwrap_or(req.day_rate),
                export_rate: req.export_rate,
            },
            supplier: SupplierSelection::from_label(req.supplier.as_deref()),
            system: SystemConfig {
                panel_count,
                panel_wattage_w: req.panel_wattage_w,
                battery: req.battery,
            },
        })
    }
}

/// What the form needs to pre-fill regional yield, export rate and panel
/// count before the user submits.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ResolveRequest {
    pub postcode: String,
    pub supplier: Option<String>,
    pub home_type: Option<String>,
}

// ─── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct EstimateResponse {
    pub timestamp: DateTime<Utc>,
    pub inputs: EstimateInputs,
    pub resolved: ResolvedParameters,
    pub result: EstimationResult,
    pub assessment: Assessment,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub field: Option<String>,
}
