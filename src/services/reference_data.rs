//! Reference tables: regional yield, supplier export rates, home types.
//!
//! Each table is loaded once into an immutable, indexed form. A table that
//! cannot be read or parsed is replaced by its built-in rows, and individual
//! rows with unusable values are skipped, so resolution never fails because
//! of reference data.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::ReferenceSources;
use crate::error::ReferenceDataError;
use crate::models::reference::{HomeTypeRow, ReferenceSummary, RegionRow, SupplierRow};

const BUILTIN_REGIONS: &str = include_str!("../../data/regions.json");
const BUILTIN_SUPPLIERS: &str = include_str!("../../data/suppliers.json");
const BUILTIN_HOME_TYPES: &str = include_str!("../../data/home_types.json");

/// A row that can be indexed by a string key and checked for usable values.
pub trait ReferenceRow: DeserializeOwned {
    fn key(&self) -> String;
    fn is_usable(&self) -> bool;
}

impl ReferenceRow for RegionRow {
    /// Prefixes are matched upper-cased.
    fn key(&self) -> String {
        self.prefix.trim().to_ascii_uppercase()
    }

    fn is_usable(&self) -> bool {
        let prefix = self.prefix.trim();
        !prefix.is_empty()
            && prefix.len() <= 2
            && prefix.chars().all(|c| c.is_ascii_alphabetic())
            && self.yield_kwh_per_kwp.is_finite()
            && self.yield_kwh_per_kwp > 0.0
    }
}

impl ReferenceRow for SupplierRow {
    fn key(&self) -> String {
        self.supplier.clone()
    }

    fn is_usable(&self) -> bool {
        !self.supplier.is_empty() && self.export_rate.is_finite() && self.export_rate >= 0.0
    }
}

impl ReferenceRow for HomeTypeRow {
    fn key(&self) -> String {
        self.home_type.clone()
    }

    fn is_usable(&self) -> bool {
        !self.home_type.is_empty() && self.min_panels > 0
    }
}

/// One indexed table. Rows keep their file order for listing.
#[derive(Debug, Clone)]
pub struct Table<R> {
    rows: Vec<R>,
    index: HashMap<String, usize>,
}

impl<R: ReferenceRow + Clone> Table<R> {
    fn from_rows(name: &str, parsed: Vec<R>) -> Result<Self, ReferenceDataError> {
        let mut rows = Vec::with_capacity(parsed.len());
        let mut index = HashMap::with_capacity(parsed.len());

        for row in parsed {
            if !row.is_usable() {
                warn!(table = name, key = %row.key(), "skipping unusable reference row");
                continue;
            }
            let key = row.key();
            if index.contains_key(&key) {
                warn!(table = name, key = %key, "duplicate reference row, keeping the first");
                continue;
            }
            index.insert(key, rows.len());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(ReferenceDataError::Empty {
                name: name.to_owned(),
            });
        }
        Ok(Self { rows, index })
    }

    fn parse(name: &str, json: &str) -> Result<Self, ReferenceDataError> {
        let parsed: Vec<R> =
            serde_json::from_str(json).map_err(|source| ReferenceDataError::Parse {
                name: name.to_owned(),
                source,
            })?;
        Self::from_rows(name, parsed)
    }

    fn read(name: &str, path: &Path) -> Result<Self, ReferenceDataError> {
        let json = std::fs::read_to_string(path).map_err(|source| ReferenceDataError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(name, &json)
    }

    /// Configured file if any, else the embedded rows. Never fails.
    fn load(name: &str, path: Option<&Path>, builtin: &str) -> Self {
        if let Some(path) = path {
            match Self::read(name, path) {
                Ok(table) => {
                    info!(table = name, path = %path.display(), rows = table.len(), "loaded reference table");
                    return table;
                }
                Err(e) => {
                    warn!(table = name, error = %e, "falling back to built-in reference table");
                }
            }
        }
        Self::parse(name, builtin).unwrap_or_else(|e| {
            warn!(table = name, error = %e, "built-in reference table unusable, lookups will use fallbacks");
            Self::empty()
        })
    }

    fn empty() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&R> {
        self.index.get(key).and_then(|&i| self.rows.get(i))
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The three reference tables. Immutable once built; replaced wholesale on
/// reload.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub regions: Table<RegionRow>,
    pub suppliers: Table<SupplierRow>,
    pub home_types: Table<HomeTypeRow>,
}

impl ReferenceTables {
    pub fn load(sources: &ReferenceSources) -> Self {
        Self {
            regions: Table::load("regions", sources.regions_path.as_deref(), BUILTIN_REGIONS),
            suppliers: Table::load(
                "suppliers",
                sources.suppliers_path.as_deref(),
                BUILTIN_SUPPLIERS,
            ),
            home_types: Table::load(
                "home_types",
                sources.home_types_path.as_deref(),
                BUILTIN_HOME_TYPES,
            ),
        }
    }

    #[cfg(test)]
    pub fn builtin() -> Self {
        Self::load(&ReferenceSources::default())
    }

    /// No rows at all; every lookup resolves to its fallback.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            regions: Table::empty(),
            suppliers: Table::empty(),
            home_types: Table::empty(),
        }
    }

    pub fn summary(&self) -> ReferenceSummary {
        ReferenceSummary {
            regions: self.regions.len(),
            suppliers: self.suppliers.len(),
            home_types: self.home_types.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_populated() {
        let tables = ReferenceTables::builtin();
        assert!(!tables.regions.is_empty());
        assert!(!tables.suppliers.is_empty());
        assert_eq!(tables.home_types.len(), 5);

        let sw = tables.regions.get("SW").unwrap();
        assert_eq!(sw.region, "London");
        let m = tables.regions.get("M").unwrap();
        assert_eq!(m.yield_kwh_per_kwp, 950.0);
    }

    #[test]
    fn region_keys_are_upper_cased() {
        let json = r#"[{ "prefix": "ls", "region": "Leeds", "yield_kwh_per_kwp": 930.0 }]"#;
        let table: Table<RegionRow> = Table::parse("regions", json).unwrap();
        assert!(table.get("LS").is_some());
        assert!(table.get("ls").is_none());
    }

    #[test]
    fn unusable_rows_are_skipped() {
        let json = r#"[
            { "prefix": "AB", "region": "Aberdeen", "yield_kwh_per_kwp": 820.0 },
            { "prefix": "XY", "region": "Broken", "yield_kwh_per_kwp": 0.0 },
            { "prefix": "A1", "region": "Digits", "yield_kwh_per_kwp": 900.0 },
            { "prefix": "AB", "region": "Duplicate", "yield_kwh_per_kwp": 1.0 }
        ]"#;
        let table: Table<RegionRow> = Table::parse("regions", json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("AB").unwrap().region, "Aberdeen");
        assert!(table.get("XY").is_none());
    }

    #[test]
    fn negative_export_rate_is_skipped() {
        let json = r#"[
            { "supplier": "Good", "export_rate": 12.0 },
            { "supplier": "Bad", "export_rate": -3.0, "notes": "typo" }
        ]"#;
        let table: Table<SupplierRow> = Table::parse("suppliers", json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("Good").unwrap().notes, "");
    }

    #[test]
    fn table_with_no_usable_rows_is_an_error() {
        let json = r#"[{ "home_type": "Castle", "min_panels": 0, "typical_kwp": 9.0 }]"#;
        let err = Table::<HomeTypeRow>::parse("home_types", json).unwrap_err();
        assert!(matches!(err, ReferenceDataError::Empty { .. }));
    }

    #[test]
    fn malformed_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.json");
        std::fs::write(&path, "{ definitely not a table").unwrap();

        let sources = ReferenceSources {
            regions_path: Some(path),
            ..ReferenceSources::default()
        };
        let tables = ReferenceTables::load(&sources);
        assert_eq!(tables.regions.len(), ReferenceTables::builtin().regions.len());
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let sources = ReferenceSources {
            suppliers_path: Some("/nonexistent/suppliers.json".into()),
            ..ReferenceSources::default()
        };
        let tables = ReferenceTables::load(&sources);
        assert!(tables.suppliers.get("Octopus Energy").is_some());
    }

    #[test]
    fn configured_file_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home_types.json");
        std::fs::write(
            &path,
            r#"[{ "home_type": "Detached", "min_panels": 14, "typical_kwp": 6.4, "notes": "" }]"#,
        )
        .unwrap();

        let sources = ReferenceSources {
            home_types_path: Some(path),
            ..ReferenceSources::default()
        };
        let tables = ReferenceTables::load(&sources);
        assert_eq!(tables.home_types.len(), 1);
        assert_eq!(tables.home_types.get("Detached").unwrap().min_panels, 14);
        assert_eq!(
            tables.summary(),
            ReferenceSummary {
                regions: tables.regions.len(),
                suppliers: tables.suppliers.len(),
                home_types: 1,
            }
        );
    }
}
