//! Turns postcode, supplier and home-type selections into numeric
//! parameters. Every lookup has a fixed fallback; nothing here fails.

use tracing::debug;

use crate::models::estimate::{HomeType, PropertyProfile, ResolvedParameters, SupplierSelection};
use crate::services::reference_data::ReferenceTables;

/// UK average yield (kWh per kWp per year).
pub const BASE_YIELD: f64 = 950.0;
pub const FALLBACK_REGION: &str = "UK Average";
/// Export rate assumed before a supplier is picked (p/kWh).
pub const DEFAULT_SEG_RATE: f64 = 21.0;
/// Lowest rate a Smart Export Guarantee licensee can offer (p/kWh).
pub const MINIMUM_SEG_RATE: f64 = 4.0;
pub const DEFAULT_MIN_PANELS: u32 = 8;

/// Postcode area: the leading run of one or two letters, upper-cased, after
/// removing all whitespace. `None` when the postcode does not start with a
/// letter.
pub fn postcode_area(postcode: &str) -> Option<String> {
    let area: String = postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .take_while(|c| c.is_ascii_alphabetic())
        .take(2)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if area.is_empty() { None } else { Some(area) }
}

/// Region name and yield for a postcode, exact match on the area prefix.
pub fn resolve_regional_yield(tables: &ReferenceTables, postcode: &str) -> (String, f64) {
    let found = postcode_area(postcode)
        .and_then(|area| tables.regions.get(&area))
        .map(|row| (row.region.clone(), row.yield_kwh_per_kwp));

    found.unwrap_or_else(|| {
        debug!(postcode, "no regional yield for postcode, using UK average");
        (FALLBACK_REGION.to_owned(), BASE_YIELD)
    })
}

pub fn resolve_seg_rate(tables: &ReferenceTables, supplier: &SupplierSelection) -> f64 {
    match supplier {
        SupplierSelection::NotSelected => DEFAULT_SEG_RATE,
        SupplierSelection::Unknown => MINIMUM_SEG_RATE,
        SupplierSelection::Named(name) => match tables.suppliers.get(name) {
            Some(row) => row.export_rate,
            None => {
                debug!(supplier = %name, "unlisted supplier, using default export rate");
                DEFAULT_SEG_RATE
            }
        },
    }
}

pub fn resolve_min_panels_for_home_type(
    tables: &ReferenceTables,
    home_type: Option<HomeType>,
) -> u32 {
    home_type
        .and_then(|h| tables.home_types.get(h.label()))
        .map_or(DEFAULT_MIN_PANELS, |row| row.min_panels)
}

/// Resolves everything the estimator needs from the reference tables.
pub fn resolve(
    tables: &ReferenceTables,
    postcode: &str,
    supplier: &SupplierSelection,
    home_type: Option<HomeType>,
) -> ResolvedParameters {
    let (region, regional_yield) = resolve_regional_yield(tables, postcode);
    ResolvedParameters {
        region,
        regional_yield,
        default_export_rate: resolve_seg_rate(tables, supplier),
        min_panels: resolve_min_panels_for_home_type(tables, home_type),
    }
}

/// [`resolve`] for a property profile, reading postcode and home type from it.
pub fn resolve_for_property(
    tables: &ReferenceTables,
    property: &PropertyProfile,
    supplier: &SupplierSelection,
) -> ResolvedParameters {
    resolve(tables, &property.postcode, supplier, property.home_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::estimate::Orientation;

    fn uk_average() -> (String, f64) {
        (FALLBACK_REGION.to_owned(), BASE_YIELD)
    }

    #[test]
    fn area_is_leading_letters() {
        assert_eq!(postcode_area("SW1A 1AA").as_deref(), Some("SW"));
        assert_eq!(postcode_area("M1 1AE").as_deref(), Some("M"));
        assert_eq!(postcode_area("  sw1a1aa ").as_deref(), Some("SW"));
        assert_eq!(postcode_area("Ec 1a").as_deref(), Some("EC"));
        assert_eq!(postcode_area("123"), None);
        assert_eq!(postcode_area(""), None);
        assert_eq!(postcode_area("   "), None);
    }

    #[test]
    fn area_is_at_most_two_letters() {
        assert_eq!(postcode_area("ABCDE").as_deref(), Some("AB"));
    }

    #[test]
    fn known_prefixes_resolve() {
        let tables = ReferenceTables::builtin();
        let (region, yield_) = resolve_regional_yield(&tables, "sw1a 1aa");
        assert_eq!(region, "London");
        assert_eq!(yield_, 1010.0);

        let (region, yield_) = resolve_regional_yield(&tables, "M1 1AE");
        assert_eq!(region, "North West England");
        assert_eq!(yield_, 950.0);

        let (region, _) = resolve_regional_yield(&tables, "TR18 4AA");
        assert_eq!(region, "South West England");
    }

    #[test]
    fn unmatched_postcodes_fall_back() {
        let tables = ReferenceTables::builtin();
        assert_eq!(resolve_regional_yield(&tables, ""), uk_average());
        assert_eq!(resolve_regional_yield(&tables, "123"), uk_average());
        assert_eq!(resolve_regional_yield(&tables, "ZZ9 9ZZ"), uk_average());
    }

    #[test]
    fn empty_tables_fall_back() {
        let tables = ReferenceTables::empty();
        assert_eq!(resolve_regional_yield(&tables, "SW1A 1AA"), uk_average());
        assert_eq!(
            resolve_seg_rate(&tables, &SupplierSelection::Named("Octopus Energy".into())),
            DEFAULT_SEG_RATE
        );
        assert_eq!(
            resolve_min_panels_for_home_type(&tables, Some(HomeType::Detached)),
            DEFAULT_MIN_PANELS
        );
    }

    #[test]
    fn seg_rate_sentinels() {
        let tables = ReferenceTables::builtin();
        assert_eq!(resolve_seg_rate(&tables, &SupplierSelection::NotSelected), 21.0);
        assert_eq!(resolve_seg_rate(&tables, &SupplierSelection::Unknown), 4.0);
        assert_eq!(
            resolve_seg_rate(&tables, &SupplierSelection::Named("Nobody Power".into())),
            21.0
        );
    }

    #[test]
    fn seg_rate_is_exact_match() {
        let tables = ReferenceTables::builtin();
        let listed = SupplierSelection::Named("Octopus Energy".into());
        assert_eq!(resolve_seg_rate(&tables, &listed), 15.0);

        let wrong_case = SupplierSelection::Named("octopus energy".into());
        assert_eq!(resolve_seg_rate(&tables, &wrong_case), DEFAULT_SEG_RATE);
    }

    #[test]
    fn supplier_labels_map_to_selection() {
        assert_eq!(SupplierSelection::from_label(None), SupplierSelection::NotSelected);
        assert_eq!(SupplierSelection::from_label(Some("")), SupplierSelection::NotSelected);
        assert_eq!(
            SupplierSelection::from_label(Some("Select your supplier")),
            SupplierSelection::NotSelected
        );
        assert_eq!(
            SupplierSelection::from_label(Some("I don't know")),
            SupplierSelection::Unknown
        );
        assert_eq!(
            SupplierSelection::from_label(Some("EDF")),
            SupplierSelection::Named("EDF".into())
        );
    }

    #[test]
    fn min_panels_by_home_type() {
        let tables = ReferenceTables::builtin();
        assert_eq!(resolve_min_panels_for_home_type(&tables, Some(HomeType::Detached)), 12);
        assert_eq!(resolve_min_panels_for_home_type(&tables, Some(HomeType::Flat)), 4);
        assert_eq!(resolve_min_panels_for_home_type(&tables, None), DEFAULT_MIN_PANELS);
    }

    #[test]
    fn resolve_without_selections_uses_defaults() {
        let tables = ReferenceTables::builtin();
        let resolved = resolve(&tables, "", &SupplierSelection::NotSelected, None);
        assert_eq!(resolved.region, FALLBACK_REGION);
        assert_eq!(resolved.regional_yield, BASE_YIELD);
        assert_eq!(resolved.default_export_rate, DEFAULT_SEG_RATE);
        assert_eq!(resolved.min_panels, DEFAULT_MIN_PANELS);
    }

    #[test]
    fn resolve_combines_all_lookups() {
        let tables = ReferenceTables::builtin();
        let property = PropertyProfile {
            postcode: "BS1 4DJ".into(),
            orientation: Orientation::South,
            shading: false,
            home_type: Some(HomeType::Terrace),
        };
        let resolved = resolve_for_property(&tables, &property, &SupplierSelection::Unknown);
        assert_eq!(
            resolved,
            ResolvedParameters {
                region: "South West England".into(),
                regional_yield: 1050.0,
                default_export_rate: MINIMUM_SEG_RATE,
                min_panels: 8,
            }
        );
    }
}
