use crate::error::{Et0Error, Result};
use crate::logic::dispatcher::{DispatchSettings, DEFAULT_CONFIRM_THRESHOLD, DEFAULT_TIMEOUT_MS};
use crate::models::{BalanceInputs, CurrentDepthMode};
use dialoguer::{Input, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub dispatch: DispatchConfig,
    pub balance: BalanceConfig,
}

/// Station metadata used when `compute` is not given `--z` / `--lat`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub elevation_m: Option<f64>,
    pub latitude_deg: Option<f64>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Default Site".into(),
            elevation_m: None,
            latitude_deg: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub timeout_ms: u64,
    pub confirm_threshold: usize,
    /// Methods run by `compute` when neither `--methods` nor `--all` is given.
    pub default_methods: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            confirm_threshold: DEFAULT_CONFIRM_THRESHOLD,
            default_methods: vec![
                "pm_fao56".into(),
                "hargreaves".into(),
                "priestley_taylor".into(),
            ],
        }
    }
}

impl DispatchConfig {
    pub fn settings(&self) -> DispatchSettings {
        DispatchSettings {
            timeout: Duration::from_millis(self.timeout_ms),
            confirm_threshold: self.confirm_threshold,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub current_depth_mode: CurrentDepthMode,
    pub crop: CropConfig,
    pub soil: SoilConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CropConfig {
    pub name: String,
    pub stage: String,
    pub kc: f64,
    pub root_depth_cm: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            name: "Reference grass".into(),
            stage: "Mid-season".into(),
            kc: 1.0,
            root_depth_cm: 50.0,
        }
    }
}

/// Volumetric fractions.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SoilConfig {
    pub field_capacity: f64,
    pub wilting_point: f64,
    pub irrigation_threshold: f64,
}

impl Default for SoilConfig {
    fn default() -> Self {
        Self {
            field_capacity: 0.30,
            wilting_point: 0.10,
            irrigation_threshold: 0.20,
        }
    }
}

impl BalanceConfig {
    /// Combines the configured crop and soil with today's readings.
    pub fn inputs(&self, current_moisture: f64, precipitation_mm: f64) -> BalanceInputs {
        BalanceInputs {
            current_moisture,
            field_capacity: self.soil.field_capacity,
            wilting_point: self.soil.wilting_point,
            irrigation_threshold: self.soil.irrigation_threshold,
            kc: self.crop.kc,
            root_depth_cm: self.crop.root_depth_cm,
            precipitation_mm,
            crop_name: self.crop.name.clone(),
            crop_stage: self.crop.stage.clone(),
        }
    }
}

fn input_err(e: dialoguer::Error) -> Et0Error {
    Et0Error::Config(format!("Input error: {}", e))
}

impl Config {
    /// Loads `--config` if given, otherwise the first file found in the
    /// standard locations. Falls back to defaults when there is none.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(Et0Error::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::warn!("No config file found, using built-in defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!("Loading config from {}", config_path.display());
        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| Et0Error::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Et0Error::Config(format!("Failed to parse config: {}", e)))
    }

    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("et0ops").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Default path for writing new config files (~/.config/et0ops/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Et0Error::Config("Cannot determine config directory".into()))?
            .join("et0ops");
        Ok(config_dir.join("config.yaml"))
    }

    /// Prompts for site, crop and soil settings and writes the result.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let defaults = Self::default();

        println!();
        println!("Site");
        let site_name: String = Input::new()
            .with_prompt("  Site name")
            .default(defaults.site.name.clone())
            .interact_text()
            .map_err(input_err)?;

        let elevation_m: f64 = Input::new()
            .with_prompt("  Elevation (m)")
            .default(0.0)
            .interact_text()
            .map_err(input_err)?;

        let latitude_deg: f64 = Input::new()
            .with_prompt("  Latitude (decimal degrees)")
            .default(0.0)
            .validate_with(|v: &f64| {
                if (-90.0..=90.0).contains(v) {
                    Ok(())
                } else {
                    Err("latitude must be between -90 and 90")
                }
            })
            .interact_text()
            .map_err(input_err)?;

        println!();
        println!("Crop");
        let crop_name: String = Input::new()
            .with_prompt("  Crop")
            .default(defaults.balance.crop.name.clone())
            .interact_text()
            .map_err(input_err)?;

        let crop_stage: String = Input::new()
            .with_prompt("  Growth stage")
            .default(defaults.balance.crop.stage.clone())
            .interact_text()
            .map_err(input_err)?;

        let kc: f64 = Input::new()
            .with_prompt("  Crop coefficient (Kc)")
            .default(defaults.balance.crop.kc)
            .interact_text()
            .map_err(input_err)?;

        let root_depth_cm: f64 = Input::new()
            .with_prompt("  Root depth (cm)")
            .default(defaults.balance.crop.root_depth_cm)
            .interact_text()
            .map_err(input_err)?;

        println!();
        println!("Soil (volumetric fractions, 0-1)");
        let field_capacity: f64 = Input::new()
            .with_prompt("  Field capacity")
            .default(defaults.balance.soil.field_capacity)
            .interact_text()
            .map_err(input_err)?;

        let wilting_point: f64 = Input::new()
            .with_prompt("  Permanent wilting point")
            .default(defaults.balance.soil.wilting_point)
            .interact_text()
            .map_err(input_err)?;

        let irrigation_threshold: f64 = Input::new()
            .with_prompt("  Irrigation threshold")
            .default(defaults.balance.soil.irrigation_threshold)
            .interact_text()
            .map_err(input_err)?;

        let modes = [
            CurrentDepthMode::RemainingAfterEtc,
            CurrentDepthMode::DeficitSurplus,
        ];
        let mode_idx = Select::new()
            .with_prompt("  Current water depth")
            .items(&[
                "Remaining after today's crop use",
                "Depletion with separate deficit/surplus",
            ])
            .default(0)
            .interact()
            .map_err(input_err)?;

        println!();

        let config = Config {
            site: SiteConfig {
                name: site_name,
                elevation_m: Some(elevation_m),
                latitude_deg: Some(latitude_deg),
            },
            dispatch: defaults.dispatch,
            balance: BalanceConfig {
                current_depth_mode: modes[mode_idx],
                crop: CropConfig {
                    name: crop_name,
                    stage: crop_stage,
                    kc,
                    root_depth_cm,
                },
                soil: SoilConfig {
                    field_capacity,
                    wilting_point,
                    irrigation_threshold,
                },
            },
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| Et0Error::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# et0ops configuration\n# Generated by `et0ops init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| Et0Error::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            match std::env::var(var_name) {
                Ok(value) => result = result.replace(placeholder, &value),
                Err(_) => tracing::warn!("Environment variable {} is not set", var_name),
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.dispatch.timeout_ms, 5000);
        assert_eq!(config.dispatch.confirm_threshold, 15);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r#"
site:
  name: Uccle
  elevation_m: 100
  latitude_deg: 50.8
balance:
  current_depth_mode: deficit_surplus
  crop:
    kc: 1.15
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.site.name, "Uccle");
        assert_eq!(config.site.latitude_deg, Some(50.8));
        assert_eq!(
            config.balance.current_depth_mode,
            CurrentDepthMode::DeficitSurplus
        );
        assert_eq!(config.balance.crop.kc, 1.15);
        assert_eq!(config.balance.crop.root_depth_cm, 50.0);
        assert_eq!(config.balance.soil, SoilConfig::default());
        assert_eq!(config.dispatch, DispatchConfig::default());
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("ET0OPS_TEST_SITE", "Wageningen");
        let config = Config::from_yaml("site:\n  name: ${ET0OPS_TEST_SITE}\n").unwrap();
        assert_eq!(config.site.name, "Wageningen");
    }

    #[test]
    fn unset_variables_are_left_in_place() {
        let out = Config::substitute_env_vars("name: ${ET0OPS_TEST_DEFINITELY_UNSET}").unwrap();
        assert_eq!(out, "name: ${ET0OPS_TEST_DEFINITELY_UNSET}");
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        assert!(matches!(
            Config::from_yaml("dispatch: [unterminated"),
            Err(Et0Error::Config(_))
        ));
    }

    #[test]
    fn missing_override_path_is_an_error() {
        let result = Config::load(Some(PathBuf::from("/nonexistent/et0ops.yaml")));
        assert!(matches!(result, Err(Et0Error::Config(_))));
    }

    #[test]
    fn dispatch_settings_from_config() {
        let dispatch = DispatchConfig {
            timeout_ms: 250,
            confirm_threshold: 3,
            default_methods: Vec::new(),
        };
        let settings = dispatch.settings();
        assert_eq!(settings.timeout, Duration::from_millis(250));
        assert_eq!(settings.confirm_threshold, 3);
    }

    #[test]
    fn balance_inputs_take_crop_and_soil() {
        let inputs = BalanceConfig::default().inputs(0.15, 2.5);
        assert_eq!(inputs.current_moisture, 0.15);
        assert_eq!(inputs.precipitation_mm, 2.5);
        assert_eq!(inputs.field_capacity, 0.30);
        assert_eq!(inputs.kc, 1.0);
        assert_eq!(inputs.crop_name, "Reference grass");
    }
}
