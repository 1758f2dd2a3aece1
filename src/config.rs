use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    TelemetryError,
    telemetry::TelemetryFilter,
    writer::{ExportFormat, HeaderNaming},
};

const CONFIG_DIR_NAME: &str = "telemetry-toolkit";
const CONFIG_FILE_NAME: &str = "config.json";

const HIGH_SPEED_KMH: f64 = 35.;
const HEAVY_BRAKING_BAR: f64 = 50.;
const FAST_BRAKING_SPEED_KMH: f64 = 30.;
const FAST_BRAKING_BAR: f64 = 40.;
const HIGH_RPM: f64 = 7000.;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterPreset {
    HighSpeed,
    HeavyBraking,
    FastBraking,
    HighRpm,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FilterPresets {
    pub high_speed: TelemetryFilter,
    pub heavy_braking: TelemetryFilter,
    pub fast_braking: TelemetryFilter,
    pub high_rpm: TelemetryFilter,
}

impl Default for FilterPresets {
    fn default() -> Self {
        Self {
            high_speed: TelemetryFilter::new().with_min_speed_kmh(HIGH_SPEED_KMH),
            heavy_braking: TelemetryFilter::new().with_min_brake_pressure_bar(HEAVY_BRAKING_BAR),
            fast_braking: TelemetryFilter::new()
                .with_min_speed_kmh(FAST_BRAKING_SPEED_KMH)
                .with_min_brake_pressure_bar(FAST_BRAKING_BAR),
            high_rpm: TelemetryFilter::new().with_min_rpm(HIGH_RPM),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub presets: FilterPresets,
    pub export_format: ExportFormat,
    pub header_naming: HeaderNaming,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            presets: FilterPresets::default(),
            export_format: ExportFormat::Csv,
            header_naming: HeaderNaming::Canonical,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf, TelemetryError> {
        Ok(dirs::config_dir()
            .ok_or(TelemetryError::NoConfigDir)?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    pub fn from_file(path: &Path) -> Result<Self, TelemetryError> {
        let file =
            std::fs::File::open(path).map_err(|e| TelemetryError::ConfigIOError { source: e })?;
        let config: Self = serde_json::from_reader(file)
            .map_err(|e| TelemetryError::ConfigSerializeError { source: e })?;
        config.validate()?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reads the config from the user's config directory, `None` when nothing was saved yet.
    pub fn from_local_file() -> Result<Option<Self>, TelemetryError> {
        let config_path = match dirs::config_dir() {
            Some(dir) => dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
            None => return Ok(None),
        };

        if config_path.exists() {
            Self::from_file(&config_path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), TelemetryError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TelemetryError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| TelemetryError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| TelemetryError::ConfigSerializeError { source: e })
    }

    /// Writes the default config to `config_path`. An existing file is only replaced with
    /// `force`; returns whether anything was written.
    pub fn write_default(config_path: &Path, force: bool) -> Result<bool, TelemetryError> {
        if config_path.exists() && !force {
            return Ok(false);
        }
        Self::default().save_to(config_path)?;
        Ok(true)
    }

    pub fn filter_for(&self, preset: FilterPreset) -> &TelemetryFilter {
        match preset {
            FilterPreset::HighSpeed => &self.presets.high_speed,
            FilterPreset::HeavyBraking => &self.presets.heavy_braking,
            FilterPreset::FastBraking => &self.presets.fast_braking,
            FilterPreset::HighRpm => &self.presets.high_rpm,
        }
    }

    fn validate(&self) -> Result<(), TelemetryError> {
        let presets = [
            ("presets.high_speed", &self.presets.high_speed),
            ("presets.heavy_braking", &self.presets.heavy_braking),
            ("presets.fast_braking", &self.presets.fast_braking),
            ("presets.high_rpm", &self.presets.high_rpm),
        ];
        for (field, filter) in presets {
            let bounds = [
                filter.min_speed_kmh,
                filter.min_brake_pressure_bar,
                filter.min_rpm,
            ];
            if bounds.into_iter().flatten().any(|b| b < 0.) {
                return Err(TelemetryError::InvalidConfig {
                    field: field.to_string(),
                    reason: "thresholds must not be negative".to_string(),
                });
            }
        }
        Ok(())
    }
}
