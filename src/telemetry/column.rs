use std::{fmt, str::FromStr};

use crate::TelemetryError;

use super::DerivedTelemetry;

/// Named channels of a derived telemetry record, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    TimeS,
    SpeedKmh,
    DistanceM,
    BrakePressureBar,
    Rpm,
    LateralG,
    LongitudinalG,
    SpeedMs,
    TotalG,
    TimeMinutes,
    TimeRelative,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::TimeS,
        Column::SpeedKmh,
        Column::DistanceM,
        Column::BrakePressureBar,
        Column::Rpm,
        Column::LateralG,
        Column::LongitudinalG,
        Column::SpeedMs,
        Column::TotalG,
        Column::TimeMinutes,
        Column::TimeRelative,
    ];

    /// Header name as found in source files.
    pub fn name(&self) -> &'static str {
        match self {
            Column::TimeS => "time_s",
            Column::SpeedKmh => "speed_kmh",
            Column::DistanceM => "distance_m",
            Column::BrakePressureBar => "brake_pressure_bar",
            Column::Rpm => "rpm",
            Column::LateralG => "lateral_g",
            Column::LongitudinalG => "longitudinal_g",
            Column::SpeedMs => "speed_ms",
            Column::TotalG => "total_g",
            Column::TimeMinutes => "time_minutes",
            Column::TimeRelative => "time_relative",
        }
    }

    /// Descriptive header name used for human-facing exports.
    pub fn renamed(&self) -> &'static str {
        match self {
            Column::SpeedKmh => "velocity_kmh",
            Column::TimeS => "timestamp_seconds",
            Column::DistanceM => "position_meters",
            other => other.name(),
        }
    }

    pub fn value(&self, telemetry: &DerivedTelemetry) -> f64 {
        let record = &telemetry.record;
        match self {
            Column::TimeS => record.time_s,
            Column::SpeedKmh => record.speed_kmh,
            Column::DistanceM => record.distance_m,
            Column::BrakePressureBar => record.brake_pressure_bar,
            Column::Rpm => record.rpm,
            Column::LateralG => record.lateral_g,
            Column::LongitudinalG => record.longitudinal_g,
            Column::SpeedMs => telemetry.speed_ms,
            Column::TotalG => telemetry.total_g,
            Column::TimeMinutes => telemetry.time_minutes,
            Column::TimeRelative => telemetry.time_relative,
        }
    }

    /// Parses a comma separated list of column names, e.g. `distance_m,time_s`.
    /// At least one column must be named.
    pub fn parse_list(names: &str) -> Result<Vec<Column>, TelemetryError> {
        let columns = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Column::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            return Err(TelemetryError::invalid_input(format!("no column names in {names:?}")));
        }
        Ok(columns)
    }
}

impl FromStr for Column {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|column| column.name() == s || column.renamed() == s)
            .ok_or_else(|| TelemetryError::UnknownColumn {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
