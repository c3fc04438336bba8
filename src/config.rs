//! TOML-based dispatch configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level dispatch configuration parsed from TOML.
///
/// All fields have defaults matching the reference installation. Load from
/// TOML with [`DispatchConfig::from_toml_file`] or use
/// [`DispatchConfig::reference`] for the built-in default. The struct is never
/// mutated by a simulation run, so one value can be shared between runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Miner load parameters.
    #[serde(default)]
    pub miner: MinerConfig,
    /// Price thresholds.
    #[serde(default)]
    pub prices: PriceConfig,
    /// Slot classification and discharge planning.
    #[serde(default)]
    pub planning: PlanningConfig,
    /// Charging rules.
    #[serde(default)]
    pub charging: ChargingConfig,
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Usable capacity (kWh). The battery starts every day full.
    pub capacity_kwh: f64,
    /// Lowest state of charge discharge may reach (kWh).
    pub soc_min_kwh: f64,
    /// Efficiency applied when charging and when discharging (0.0–1.0).
    pub efficiency: f64,
    /// Charge and discharge power limit (kW).
    pub power_limit_kw: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 30.0,
            soc_min_kwh: 1.5,
            efficiency: 0.95,
            power_limit_kw: 15.0,
        }
    }
}

/// Miner load parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MinerConfig {
    /// Constant miner power draw (kW).
    pub target_kw: f64,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self { target_kw: 20.0 }
    }
}

/// Price thresholds (currency per MWh).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    /// Night slots priced above this are planned for battery discharge.
    pub night_threshold: f64,
    /// Default PV cost price; daytime slots priced above it allow PV charging.
    pub pv_threshold: f64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            night_threshold: 55.0,
            pv_threshold: 55.0,
        }
    }
}

/// Slot classification and discharge planning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanningConfig {
    /// Number of highest-priced night slots used when no night slot is expensive.
    pub fallback_slots: usize,
    /// First daytime hour (inclusive).
    pub day_start_hour: usize,
    /// Last daytime hour (exclusive).
    pub day_end_hour: usize,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            fallback_slots: 8,
            day_start_hour: 8,
            day_end_hour: 20,
        }
    }
}

/// Which charging source is tried first in a daytime slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargePriority {
    /// Grid charging whenever there is headroom; PV charging is never reached.
    #[default]
    GridFirst,
    /// PV surplus first, grid only when the slot cannot charge from PV.
    PvFirst,
}

impl fmt::Display for ChargePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridFirst => f.write_str("grid_first"),
            Self::PvFirst => f.write_str("pv_first"),
        }
    }
}

/// Charging rules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChargingConfig {
    /// Charging source order.
    pub priority: ChargePriority,
    /// Count the miner's grid draw in daytime slots the battery did not supply.
    pub count_daytime_miner_grid: bool,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl DispatchConfig {
    /// Returns the reference installation: 30 kWh battery, 20 kW miner.
    pub fn reference() -> Self {
        Self::default()
    }

    /// Returns the corrected preset: PV surplus charges before the grid, and the
    /// miner's daytime grid draw is accounted for.
    pub fn corrected() -> Self {
        Self {
            charging: ChargingConfig {
                priority: ChargePriority::PvFirst,
                count_daytime_miner_grid: true,
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["reference", "corrected"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "reference" => Ok(Self::reference()),
            "corrected" => Ok(Self::corrected()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| {
            errors.push(ConfigError {
                field: field.into(),
                message: message.into(),
            });
        };

        let bat = &self.battery;
        if !(bat.capacity_kwh > 0.0) {
            push("battery.capacity_kwh", "must be > 0");
        }
        if !(0.0..bat.capacity_kwh).contains(&bat.soc_min_kwh) {
            push("battery.soc_min_kwh", "must be in [0, battery.capacity_kwh)");
        }
        if !(bat.efficiency > 0.0 && bat.efficiency <= 1.0) {
            push("battery.efficiency", "must be in (0.0, 1.0]");
        }
        if !(bat.power_limit_kw > 0.0) {
            push("battery.power_limit_kw", "must be > 0");
        }

        if !(self.miner.target_kw >= 0.0) {
            push("miner.target_kw", "must be >= 0");
        }

        let prices = &self.prices;
        if !prices.night_threshold.is_finite() {
            push("prices.night_threshold", "must be a finite number");
        }
        if !prices.pv_threshold.is_finite() {
            push("prices.pv_threshold", "must be a finite number");
        }

        let plan = &self.planning;
        if plan.fallback_slots == 0 {
            push("planning.fallback_slots", "must be > 0");
        }
        if plan.day_start_hour >= plan.day_end_hour {
            push("planning.day_start_hour", "must be < planning.day_end_hour");
        }
        if plan.day_end_hour > 24 {
            push("planning.day_end_hour", "must be <= 24");
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_preset_valid() {
        let cfg = DispatchConfig::reference();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "reference should be valid: {errors:?}");
    }

    #[test]
    fn reference_matches_installation() {
        let cfg = DispatchConfig::reference();
        assert_eq!(cfg.battery.capacity_kwh, 30.0);
        assert_eq!(cfg.battery.soc_min_kwh, 1.5);
        assert_eq!(cfg.battery.efficiency, 0.95);
        assert_eq!(cfg.battery.power_limit_kw, 15.0);
        assert_eq!(cfg.miner.target_kw, 20.0);
        assert_eq!(cfg.prices.night_threshold, 55.0);
        assert_eq!(cfg.prices.pv_threshold, 55.0);
        assert_eq!(cfg.charging.priority, ChargePriority::GridFirst);
        assert!(!cfg.charging.count_daytime_miner_grid);
    }

    #[test]
    fn from_preset_unknown() {
        let err = DispatchConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in DispatchConfig::PRESETS {
            let cfg = DispatchConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[battery]
capacity_kwh = 40.0
soc_min_kwh = 2.0
efficiency = 0.9
power_limit_kw = 10.0

[miner]
target_kw = 12.5

[prices]
night_threshold = 70.0
pv_threshold = 40.0

[planning]
fallback_slots = 6
day_start_hour = 7
day_end_hour = 19

[charging]
priority = "pv_first"
count_daytime_miner_grid = true
"#;
        let cfg = DispatchConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.battery.capacity_kwh), Some(40.0));
        assert_eq!(cfg.as_ref().map(|c| c.planning.fallback_slots), Some(6));
        assert_eq!(
            cfg.as_ref().map(|c| c.charging.priority),
            Some(ChargePriority::PvFirst)
        );
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[miner]
target_kw = 10.0
"#;
        let cfg = DispatchConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.miner.target_kw), Some(10.0));
        assert_eq!(cfg.as_ref().map(|c| c.battery.capacity_kwh), Some(30.0));
        assert_eq!(cfg.as_ref().map(|c| c.planning.day_end_hour), Some(20));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
capacity_kwh = 30.0
bogus_field = true
"#;
        assert!(DispatchConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_priority_rejected() {
        let toml = r#"
[charging]
priority = "solar_only"
"#;
        assert!(DispatchConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_soc_min_above_capacity() {
        let mut cfg = DispatchConfig::reference();
        cfg.battery.soc_min_kwh = 30.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.soc_min_kwh"));
    }

    #[test]
    fn validation_catches_zero_efficiency() {
        let mut cfg = DispatchConfig::reference();
        cfg.battery.efficiency = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.efficiency"));
    }

    #[test]
    fn validation_catches_inverted_day() {
        let mut cfg = DispatchConfig::reference();
        cfg.planning.day_start_hour = 20;
        cfg.planning.day_end_hour = 8;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "planning.day_start_hour"));
    }

    #[test]
    fn validation_reports_every_problem() {
        let mut cfg = DispatchConfig::reference();
        cfg.battery.capacity_kwh = 0.0;
        cfg.planning.fallback_slots = 0;
        cfg.miner.target_kw = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.capacity_kwh"));
        assert!(errors.iter().any(|e| e.field == "planning.fallback_slots"));
        assert!(errors.iter().any(|e| e.field == "miner.target_kw"));
    }
}
