pub mod column;
pub mod deriver;
pub mod loader;
pub mod sample;
pub mod selection;

use serde::{Deserialize, Serialize};

use crate::TelemetryError;

pub use column::Column;
pub use deriver::derive;
pub use loader::{load_telemetry_csv, read_telemetry_csv};
pub use sample::sample_session;
pub use selection::{SeriesStats, TelemetryFilter};

/// A single sampled instant of vehicle sensor data, as read from the source table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Sample time in seconds. Expected to be non-decreasing across a session.
    pub time_s: f64,
    /// Vehicle speed, km/h
    pub speed_kmh: f64,
    /// Distance traveled, meters
    pub distance_m: f64,
    /// Brake line pressure, bar
    pub brake_pressure_bar: f64,
    /// Engine RPM
    pub rpm: f64,
    /// Lateral acceleration in g. 0 when the source has no such channel.
    pub lateral_g: f64,
    /// Longitudinal acceleration in g. 0 when the source has no such channel.
    pub longitudinal_g: f64,
}

impl TelemetryRecord {
    /// Builds a record with no g-force channels.
    pub fn new(
        time_s: f64,
        speed_kmh: f64,
        distance_m: f64,
        brake_pressure_bar: f64,
        rpm: f64,
    ) -> Self {
        Self {
            time_s,
            speed_kmh,
            distance_m,
            brake_pressure_bar,
            rpm,
            ..Default::default()
        }
    }

    pub fn with_g_forces(mut self, lateral_g: f64, longitudinal_g: f64) -> Self {
        self.lateral_g = lateral_g;
        self.longitudinal_g = longitudinal_g;
        self
    }

    fn required_fields(&self) -> [(&'static str, f64); 5] {
        [
            ("time_s", self.time_s),
            ("speed_kmh", self.speed_kmh),
            ("distance_m", self.distance_m),
            ("brake_pressure_bar", self.brake_pressure_bar),
            ("rpm", self.rpm),
        ]
    }

    /// Rejects records where a required channel is not a finite number.
    /// `row` is the 1-based position used in the error message.
    pub(crate) fn validate(&self, row: usize) -> Result<(), TelemetryError> {
        for (field, value) in self.required_fields() {
            if !value.is_finite() {
                return Err(TelemetryError::invalid_input(format!(
                    "row {row}: field {field} is not a finite number ({value})"
                )));
            }
        }
        Ok(())
    }
}

/// A telemetry record together with the channels derived from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedTelemetry {
    #[serde(flatten)]
    pub record: TelemetryRecord,
    /// Speed converted to m/s
    pub speed_ms: f64,
    /// Combined lateral and longitudinal acceleration, g
    pub total_g: f64,
    /// Sample time in minutes
    pub time_minutes: f64,
    /// Seconds since the first sample of the sequence
    pub time_relative: f64,
}
