use serde::Serialize;
use utoipa::ToSchema;

use crate::models::estimate::{EstimationResult, SystemConfig, UsageProfile};

/// Export rate (p/kWh) below which storing surplus beats exporting it.
const BATTERY_WORTHWHILE_BELOW: f64 = 15.0;
const GREAT_EXPORT_RATE: f64 = 20.0;
const DECENT_EXPORT_RATE: f64 = 15.0;
const EXCELLENT_PAYBACK_YEARS: f64 = 7.0;
const GOOD_PAYBACK_YEARS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaybackRating {
    Excellent,
    Good,
    Long,
    /// Annual benefit is not positive.
    NotCalculable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatteryAdvice {
    /// Low export rate and a battery is planned.
    GoodChoice,
    /// Low export rate, no battery.
    Consider,
    /// Decent export rate and a battery is planned.
    NotEssential,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportRating {
    Great,
    Decent,
    Low,
}

/// Structured verdicts the front end turns into recommendation text.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Assessment {
    /// Generation as a share of annual consumption (%)
    pub coverage_percent: f64,
    pub payback: PaybackRating,
    pub battery: BatteryAdvice,
    pub export: ExportRating,
    pub below_recommended_panels: bool,
}

pub fn payback_rating(result: &EstimationResult) -> PaybackRating {
    if !result.payback_calculable() {
        PaybackRating::NotCalculable
    } else if result.payback_years < EXCELLENT_PAYBACK_YEARS {
        PaybackRating::Excellent
    } else if result.payback_years < GOOD_PAYBACK_YEARS {
        PaybackRating::Good
    } else {
        PaybackRating::Long
    }
}

pub fn battery_advice(export_rate: f64, battery: bool) -> BatteryAdvice {
    match (export_rate < BATTERY_WORTHWHILE_BELOW, battery) {
        (true, true) => BatteryAdvice::GoodChoice,
        (true, false) => BatteryAdvice::Consider,
        (false, true) => BatteryAdvice::NotEssential,
        (false, false) => BatteryAdvice::Optional,
    }
}

pub fn export_rating(export_rate: f64) -> ExportRating {
    if export_rate >= GREAT_EXPORT_RATE {
        ExportRating::Great
    } else if export_rate >= DECENT_EXPORT_RATE {
        ExportRating::Decent
    } else {
        ExportRating::Low
    }
}

pub fn assess(
    result: &EstimationResult,
    usage: &UsageProfile,
    system: &SystemConfig,
    min_panels: u32,
) -> Assessment {
    let coverage_percent = if usage.annual_consumption_kwh > 0.0 {
        result.annual_generation_kwh / usage.annual_consumption_kwh * 100.0
    } else {
        0.0
    };

    Assessment {
        coverage_percent,
        payback: payback_rating(result),
        battery: battery_advice(result.export_rate, system.battery),
        export: export_rating(result.export_rate),
        below_recommended_panels: system.panel_count < min_panels,
    }
}
