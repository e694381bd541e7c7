use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub reference: ReferenceSources,
    pub estimator: EstimatorSettings,
    pub presentation: PresentationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8501 }
    }
}

/// Optional files replacing the built-in reference tables.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ReferenceSources {
    pub regions_path: Option<PathBuf>,
    pub suppliers_path: Option<PathBuf>,
    pub home_types_path: Option<PathBuf>,
}

/// How the installation cost is built up.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostModel {
    /// `fixed_cost + panel_count * cost_per_panel`
    PerPanel { fixed_cost: f64, cost_per_panel: f64 },
    /// One flat price regardless of system size.
    Fixed { install_cost: f64 },
}

/// Named constants of the estimate. The defaults are the reference set.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, ToSchema)]
#[serde(default)]
pub struct EstimatorSettings {
    pub base_self_use: f64,
    pub home_during_day_boost: f64,
    pub battery_boost: f64,
    pub self_use_cap: f64,
    /// Generation multiplier when the roof is shaded.
    pub shading_factor: f64,
    pub battery_cost: f64,
    pub cost_model: CostModel,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            base_self_use: 0.45,
            home_during_day_boost: 0.10,
            battery_boost: 0.25,
            self_use_cap: 0.90,
            shading_factor: 0.9,
            battery_cost: 3500.0,
            cost_model: CostModel::PerPanel {
                fixed_cost: 2000.0,
                cost_per_panel: 365.0,
            },
        }
    }
}

impl EstimatorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fractions = [
            ("base_self_use", self.base_self_use),
            ("home_during_day_boost", self.home_during_day_boost),
            ("battery_boost", self.battery_boost),
            ("self_use_cap", self.self_use_cap),
            ("shading_factor", self.shading_factor),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidSetting {
                    field,
                    reason: format!("{value} is outside [0, 1]"),
                });
            }
        }
        if self.base_self_use > self.self_use_cap {
            return Err(ConfigError::InvalidSetting {
                field: "self_use_cap",
                reason: format!(
                    "cap {} is below the base self-use {}",
                    self.self_use_cap, self.base_self_use
                ),
            });
        }

        let (fixed, per_panel) = match self.cost_model {
            CostModel::PerPanel {
                fixed_cost,
                cost_per_panel,
            } => (fixed_cost, cost_per_panel),
            CostModel::Fixed { install_cost } => (install_cost, 0.0),
        };
        let costs = [
            ("battery_cost", self.battery_cost),
            ("cost_model.fixed_cost", fixed),
            ("cost_model.cost_per_panel", per_panel),
        ];
        for (field, value) in costs {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSetting {
                    field,
                    reason: format!("{value} is not a non-negative amount"),
                });
            }
        }
        Ok(())
    }
}

/// Settings consumed only by the form front end.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
#[serde(default)]
pub struct PresentationConfig {
    pub static_dir: String,
    /// Injects the analytics snippet into the form page.
    pub analytics_enabled: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            static_dir: "static".to_owned(),
            analytics_enabled: false,
        }
    }
}

impl Config {
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&content, path)
    }

    fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_owned(),
                source,
            })?;
        config.estimator.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = Config::from_json("{}", Path::new("config.json")).unwrap();
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.estimator, EstimatorSettings::default());
        assert!(!config.presentation.analytics_enabled);
        assert!(config.reference.regions_path.is_none());
    }

    #[test]
    fn partial_estimator_section_keeps_other_defaults() {
        let json = r#"{
            "estimator": {
                "battery_boost": 0.3,
                "cost_model": { "kind": "fixed", "install_cost": 5654.26 }
            },
            "presentation": { "analytics_enabled": true }
        }"#;
        let config = Config::from_json(json, Path::new("config.json")).unwrap();
        assert_eq!(config.estimator.battery_boost, 0.3);
        assert_eq!(config.estimator.base_self_use, 0.45);
        assert_eq!(
            config.estimator.cost_model,
            CostModel::Fixed {
                install_cost: 5654.26
            }
        );
        assert!(config.presentation.analytics_enabled);
        assert_eq!(config.presentation.static_dir, "static");
    }

    #[test]
    fn out_of_range_fraction_is_rejected() {
        let json = r#"{ "estimator": { "self_use_cap": 1.5 } }"#;
        let err = Config::from_json(json, Path::new("config.json")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                field: "self_use_cap",
                ..
            }
        ));
    }

    #[test]
    fn base_above_cap_is_rejected() {
        let json = r#"{ "estimator": { "base_self_use": 0.8, "self_use_cap": 0.7 } }"#;
        assert!(Config::from_json(json, Path::new("config.json")).is_err());
    }

    #[test]
    fn negative_cost_is_rejected() {
        let json = r#"{ "estimator": { "cost_model": { "kind": "per_panel", "fixed_cost": -1.0, "cost_per_panel": 300.0 } } }"#;
        let err = Config::from_json(json, Path::new("config.json")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                field: "cost_model.fixed_cost",
                ..
            }
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Config::from_json("{ not json", Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config.server.port, 8501);
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "server": { "port": 9000 } }"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 9000);
    }
}
