//! ============================================================
//!  Solar return-on-investment estimate
//!
//!  Pipeline (each step only reads earlier outputs):
//!   1. System size      – kWp = panels × watts / 1000
//!   2. Generation       – kWp × regional yield × orientation × shading
//!   3. Self-use share   – base + daytime occupancy + battery, capped once
//!   4. Energy split     – self-used + exported sums back to generation exactly
//!   5. Annual benefit   – savings at day rate + export income (p → £)
//!   6. Installation     – fixed / per-panel model + battery
//!   7. Payback          – cost ÷ benefit, 0 when benefit ≤ 0
//! ============================================================

use tracing::debug;

use crate::config::{CostModel, EstimatorSettings};
use crate::error::EstimateError;
use crate::models::estimate::{
    CostBreakdown, EstimationResult, Orientation, PropertyProfile, ResolvedParameters,
    SystemConfig, TariffProfile, UsageProfile,
};

pub fn system_size_kwp(panel_count: u32, panel_wattage_w: f64) -> f64 {
    f64::from(panel_count) * panel_wattage_w / 1000.0
}

#[derive(Debug, Clone, Default)]
pub struct RoiEstimator {
    settings: EstimatorSettings,
}

impl RoiEstimator {
    pub fn new(settings: EstimatorSettings) -> Self {
        Self { settings }
    }

    pub fn shading_factor(&self, shading: bool) -> f64 {
        if shading { self.settings.shading_factor } else { 1.0 }
    }

    pub fn annual_generation_kwh(
        &self,
        system_size_kwp: f64,
        regional_yield: f64,
        orientation: Orientation,
        shading: bool,
    ) -> f64 {
        system_size_kwp * regional_yield * orientation.factor() * self.shading_factor(shading)
    }

    /// Share of generation used on site. The cap applies to the full sum,
    /// never to a partial one.
    pub fn self_use_fraction(&self, home_during_day: bool, battery: bool) -> f64 {
        let s = &self.settings;
        let mut fraction = s.base_self_use;
        if home_during_day {
            fraction += s.home_during_day_boost;
        }
        if battery {
            fraction += s.battery_boost;
        }
        fraction.min(s.self_use_cap)
    }

    pub fn installation_cost(&self, panel_count: u32, battery: bool) -> CostBreakdown {
        let (fixed, panels) = match self.settings.cost_model {
            CostModel::PerPanel {
                fixed_cost,
                cost_per_panel,
            } => (fixed_cost, f64::from(panel_count) * cost_per_panel),
            CostModel::Fixed { install_cost } => (install_cost, 0.0),
        };
        let battery = if battery { self.settings.battery_cost } else { 0.0 };
        CostBreakdown {
            fixed,
            panels,
            battery,
            total: fixed + panels + battery,
        }
    }

    /// Runs the whole pipeline for one input set.
    ///
    /// Fails only on caller contract violations; the inputs are expected to
    /// be range-checked by the form already.
    pub fn estimate(
        &self,
        property: &PropertyProfile,
        usage: &UsageProfile,
        tariff: &TariffProfile,
        system: &SystemConfig,
        resolved: &ResolvedParameters,
    ) -> Result<EstimationResult, EstimateError> {
        validate(tariff, system, resolved)?;

        let system_size_kwp = system_size_kwp(system.panel_count, system.panel_wattage_w);
        let orientation_factor = property.orientation.factor();
        let shading_factor = self.shading_factor(property.shading);
        let annual_generation_kwh = self.annual_generation_kwh(
            system_size_kwp,
            resolved.regional_yield,
            property.orientation,
            property.shading,
        );

        let self_use_fraction = self.self_use_fraction(usage.home_during_day, system.battery);
        let export_fraction = 1.0 - self_use_fraction;

        let (self_used_kwh, exported_kwh) =
            split_generation(annual_generation_kwh, self_use_fraction);

        let export_rate = tariff.export_rate.unwrap_or(resolved.default_export_rate);
        let self_use_savings = self_used_kwh * (tariff.day_rate / 100.0);
        let export_income = exported_kwh * (export_rate / 100.0);
        let total_annual_benefit = self_use_savings + export_income;

        let installation_cost = self.installation_cost(system.panel_count, system.battery);
        let payback_years = payback_years(installation_cost.total, total_annual_benefit);

        debug!(
            region = %resolved.region,
            system_size_kwp,
            annual_generation_kwh,
            self_use_fraction,
            total_annual_benefit,
            payback_years,
            "estimate computed"
        );

        Ok(EstimationResult {
            system_size_kwp,
            regional_yield: resolved.regional_yield,
            orientation_factor,
            shading_factor,
            annual_generation_kwh,
            self_use_fraction,
            export_fraction,
            self_used_kwh,
            exported_kwh,
            day_rate: tariff.day_rate,
            export_rate,
            self_use_savings,
            export_income,
            total_annual_benefit,
            installation_cost,
            payback_years,
        })
    }
}

/// Splits generation into (self-used, exported) so the two parts sum back to
/// `generation` exactly.
///
/// The share that is at least `g / 2` is computed first; `g` minus that
/// share is then exact, so the pair has no rounding drift.
fn split_generation(generation: f64, self_use_fraction: f64) -> (f64, f64) {
    if self_use_fraction >= 0.5 {
        let self_used = generation * self_use_fraction;
        (self_used, generation - self_used)
    } else {
        let exported = generation - generation * self_use_fraction;
        (generation - exported, exported)
    }
}

/// `0.0` stands for "not calculable" when there is no positive benefit.
pub fn payback_years(install_cost: f64, total_annual_benefit: f64) -> f64 {
    if total_annual_benefit > 0.0 {
        install_cost / total_annual_benefit
    } else {
        0.0
    }
}

/// Only the values the pipeline reads are checked; consumption, night rate
/// and the other pass-through fields are never inspected here.
fn validate(
    tariff: &TariffProfile,
    system: &SystemConfig,
    resolved: &ResolvedParameters,
) -> Result<(), EstimateError> {
    if system.panel_count == 0 {
        return Err(EstimateError::invalid("panel_count", "must be at least 1"));
    }
    positive("panel_wattage_w", system.panel_wattage_w)?;
    positive("regional_yield", resolved.regional_yield)?;
    non_negative("day_rate", tariff.day_rate)?;
    non_negative("default_export_rate", resolved.default_export_rate)?;
    if let Some(rate) = tariff.export_rate {
        non_negative("export_rate", rate)?;
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), EstimateError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EstimateError::invalid(field, format!("{value} must be greater than zero")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), EstimateError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EstimateError::invalid(field, format!("{value} must not be negative")))
    }
}
