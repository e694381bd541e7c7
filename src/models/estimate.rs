use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EstimateError;

// ─── Property ────────────────────────────────────────────────────────────────

/// Main roof direction, relative to due south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Orientation {
    #[serde(rename = "South")]
    South,
    #[serde(rename = "South-East")]
    SouthEast,
    #[serde(rename = "South-West")]
    SouthWest,
    #[serde(rename = "East")]
    East,
    #[serde(rename = "West")]
    West,
    #[serde(rename = "North-East")]
    NorthEast,
    #[serde(rename = "North-West")]
    NorthWest,
    #[serde(rename = "North")]
    North,
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::South,
        Orientation::SouthEast,
        Orientation::SouthWest,
        Orientation::East,
        Orientation::West,
        Orientation::NorthEast,
        Orientation::NorthWest,
        Orientation::North,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Orientation::South => "South",
            Orientation::SouthEast => "South-East",
            Orientation::SouthWest => "South-West",
            Orientation::East => "East",
            Orientation::West => "West",
            Orientation::NorthEast => "North-East",
            Orientation::NorthWest => "North-West",
            Orientation::North => "North",
        }
    }

    /// Generation multiplier for a roof facing this way.
    pub fn factor(self) -> f64 {
        match self {
            Orientation::South => 1.0,
            Orientation::SouthEast | Orientation::SouthWest => 0.95,
            Orientation::East | Orientation::West => 0.85,
            Orientation::NorthEast | Orientation::NorthWest => 0.70,
            Orientation::North => 0.6,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Orientation {
    type Err = EstimateError;

    /// Accepts the display labels, case-insensitively, with `_` or a space
    /// standing in for the hyphen ("south west", "SOUTH_WEST").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        Self::ALL
            .into_iter()
            .find(|o| o.label().eq_ignore_ascii_case(&key))
            .ok_or_else(|| {
                EstimateError::invalid("orientation", format!("unrecognised roof direction {s:?}"))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum HomeType {
    #[serde(rename = "Detached")]
    Detached,
    #[serde(rename = "Semi-detached")]
    SemiDetached,
    #[serde(rename = "Terrace")]
    Terrace,
    #[serde(rename = "Flat")]
    Flat,
    #[serde(rename = "Bungalow")]
    Bungalow,
}

impl HomeType {
    pub const ALL: [HomeType; 5] = [
        HomeType::Detached,
        HomeType::SemiDetached,
        HomeType::Terrace,
        HomeType::Flat,
        HomeType::Bungalow,
    ];

    /// Label used as the key of the home-type reference table.
    pub fn label(self) -> &'static str {
        match self {
            HomeType::Detached => "Detached",
            HomeType::SemiDetached => "Semi-detached",
            HomeType::Terrace => "Terrace",
            HomeType::Flat => "Flat",
            HomeType::Bungalow => "Bungalow",
        }
    }

    /// `None` means "unspecified"; home type only feeds a lookup with a
    /// fallback, so an unknown label is not an input error.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|h| h.label().eq_ignore_ascii_case(label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PropertyProfile {
    /// Free-form, may be empty.
    pub postcode: String,
    pub orientation: Orientation,
    pub shading: bool,
    pub home_type: Option<HomeType>,
}

// ─── Usage ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum HotWaterSystem {
    #[serde(rename = "Gas boiler")]
    GasBoiler,
    #[serde(rename = "Electric immersion")]
    ElectricImmersion,
    #[serde(rename = "Heat pump")]
    HeatPump,
}

impl HotWaterSystem {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "gas boiler" => Some(HotWaterSystem::GasBoiler),
            "electric immersion" => Some(HotWaterSystem::ElectricImmersion),
            "heat pump" => Some(HotWaterSystem::HeatPump),
            _ => None,
        }
    }
}

/// Household consumption profile.
///
/// Only `home_during_day` feeds the estimate. `has_ev` and `hot_water` are
/// carried through untouched for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UsageProfile {
    pub annual_consumption_kwh: f64,
    pub has_ev: bool,
    pub hot_water: Option<HotWaterSystem>,
    pub home_during_day: bool,
}

// ─── Tariff ──────────────────────────────────────────────────────────────────

/// Rates in pence per kWh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TariffProfile {
    pub day_rate: f64,
    /// Collected but not used by the estimate.
    pub night_rate: f64,
    /// User override; the supplier default from the resolver applies when absent.
    pub export_rate: Option<f64>,
}

pub const NO_SUPPLIER_SELECTED: &str = "Select your supplier";
pub const UNKNOWN_SUPPLIER: &str = "I don't know";

/// Export supplier as picked on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SupplierSelection {
    NotSelected,
    Unknown,
    Named(String),
}

impl SupplierSelection {
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            None | Some("") | Some(NO_SUPPLIER_SELECTED) => SupplierSelection::NotSelected,
            Some(UNKNOWN_SUPPLIER) => SupplierSelection::Unknown,
            Some(name) => SupplierSelection::Named(name.to_owned()),
        }
    }
}

// ─── System ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SystemConfig {
    pub panel_count: u32,
    pub panel_wattage_w: f64,
    pub battery: bool,
}

// ─── Resolved reference parameters ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResolvedParameters {
    pub region: String,
    /// kWh per kWp per year
    pub regional_yield: f64,
    /// Supplier export rate before any user override (p/kWh)
    pub default_export_rate: f64,
    /// Recommended minimum panel count for the home type
    pub min_panels: u32,
}

// ─── Result ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostBreakdown {
    /// Fixed installation baseline (£)
    pub fixed: f64,
    /// Variable per-panel component (£)
    pub panels: f64,
    /// Battery addition (£), zero without a battery
    pub battery: f64,
    pub total: f64,
}

/// Derived physical and financial metrics for one input set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EstimationResult {
    pub system_size_kwp: f64,
    pub regional_yield: f64,
    pub orientation_factor: f64,
    pub shading_factor: f64,
    pub annual_generation_kwh: f64,
    pub self_use_fraction: f64,
    pub export_fraction: f64,
    pub self_used_kwh: f64,
    pub exported_kwh: f64,
    /// Rates actually applied (p/kWh)
    pub day_rate: f64,
    pub export_rate: f64,
    pub self_use_savings: f64,
    pub export_income: f64,
    pub total_annual_benefit: f64,
    pub installation_cost: CostBreakdown,
    /// Years; `0.0` when the annual benefit is not positive (see
    /// [`EstimationResult::payback_calculable`]).
    pub payback_years: f64,
}

impl EstimationResult {
    /// A zero `payback_years` is a sentinel, not an immediate payback.
    pub fn payback_calculable(&self) -> bool {
        self.total_annual_benefit > 0.0
    }
}
