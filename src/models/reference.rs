use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Postcode area → regional yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegionRow {
    /// Leading letters of the postcode ("SW", "M")
    pub prefix: String,
    pub region: String,
    /// kWh per kWp per year
    pub yield_kwh_per_kwp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupplierRow {
    pub supplier: String,
    /// Smart Export Guarantee rate (p/kWh)
    pub export_rate: f64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HomeTypeRow {
    pub home_type: String,
    pub min_panels: u32,
    pub typical_kwp: f64,
    #[serde(default)]
    pub notes: String,
}

/// Row counts of the tables currently in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReferenceSummary {
    pub regions: usize,
    pub suppliers: usize,
    pub home_types: usize,
}
