use std::ops::Range;

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use super::{Column, DerivedTelemetry};

/// All values of one channel, in record order.
pub fn select_column(records: &[DerivedTelemetry], column: Column) -> Vec<f64> {
    records.iter().map(|r| column.value(r)).collect()
}

/// Row-major values for a subset of channels.
pub fn select_columns(records: &[DerivedTelemetry], columns: &[Column]) -> Vec<Vec<f64>> {
    records
        .iter()
        .map(|r| columns.iter().map(|c| c.value(r)).collect())
        .collect()
}

/// Positional row selection. Out of range bounds are clamped rather than rejected.
pub fn slice_rows(records: &[DerivedTelemetry], rows: Range<usize>) -> &[DerivedTelemetry] {
    let end = rows.end.min(records.len());
    let start = rows.start.min(end);
    &records[start..end]
}

/// Conjunction of strict lower bounds. A bound left as `None` does not filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFilter {
    #[serde(default)]
    pub min_speed_kmh: Option<f64>,
    #[serde(default)]
    pub min_brake_pressure_bar: Option<f64>,
    #[serde(default)]
    pub min_rpm: Option<f64>,
}

impl TelemetryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_speed_kmh(mut self, speed_kmh: f64) -> Self {
        self.min_speed_kmh = Some(speed_kmh);
        self
    }

    pub fn with_min_brake_pressure_bar(mut self, brake_pressure_bar: f64) -> Self {
        self.min_brake_pressure_bar = Some(brake_pressure_bar);
        self
    }

    pub fn with_min_rpm(mut self, rpm: f64) -> Self {
        self.min_rpm = Some(rpm);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.min_speed_kmh.is_none()
            && self.min_brake_pressure_bar.is_none()
            && self.min_rpm.is_none()
    }

    pub fn matches(&self, telemetry: &DerivedTelemetry) -> bool {
        let record = &telemetry.record;
        let above = |bound: Option<f64>, value: f64| bound.is_none_or(|b| value > b);

        above(self.min_speed_kmh, record.speed_kmh)
            && above(self.min_brake_pressure_bar, record.brake_pressure_bar)
            && above(self.min_rpm, record.rpm)
    }
}

/// Records passing the filter, order preserved.
pub fn filter_records(
    records: &[DerivedTelemetry],
    filter: &TelemetryFilter,
) -> Vec<DerivedTelemetry> {
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}

/// Summary statistics of one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1). Undefined for a single value.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (min, max) = match values.iter().copied().minmax_by(f64::total_cmp) {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(min, max) => (min, max),
        };

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (sum_sq / (count - 1) as f64).sqrt()
        });

        Some(Self {
            count,
            mean,
            std,
            min,
            max,
        })
    }

    pub fn for_column(records: &[DerivedTelemetry], column: Column) -> Option<Self> {
        Self::from_values(&select_column(records, column))
    }
}
