// Library interface for telemetry-toolkit
// The binary and the integration tests both go through these modules

pub mod config;
pub mod errors;
pub mod telemetry;
pub mod writer;

// Re-export commonly used types
pub use config::{AppConfig, FilterPreset};
pub use errors::TelemetryError;
pub use telemetry::{Column, DerivedTelemetry, SeriesStats, TelemetryFilter, TelemetryRecord};
pub use writer::{ExportFormat, ExportOptions, HeaderNaming};
