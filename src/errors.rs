// Error types for telemetry-toolkit

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum TelemetryError {
    // Errors for the deriver and the record boundary
    #[snafu(display("Invalid telemetry input: {reason}"))]
    InvalidInput { reason: String },
    #[snafu(display("Unknown telemetry column: {name}"))]
    UnknownColumn { name: String },

    // Errors raised by the CSV source, passed through as-is
    #[snafu(display("Error reading telemetry source"))]
    TelemetrySource { source: csv::Error },

    // Errors for the telemetry writer
    #[snafu(display("Error writing telemetry file"))]
    WriterError { source: io::Error },
    #[snafu(display("Error writing telemetry CSV"))]
    CsvWriterError { source: csv::Error },
    #[snafu(display("Error serializing telemetry record"))]
    JsonWriterError { source: serde_json::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
    #[snafu(display("Invalid config: {field} - {reason}"))]
    InvalidConfig { field: String, reason: String },
}

impl TelemetryError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        TelemetryError::InvalidInput {
            reason: reason.into(),
        }
    }
}
