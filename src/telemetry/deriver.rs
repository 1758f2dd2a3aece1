use log::{debug, warn};
use uom::si::f64::{Time, Velocity};
use uom::si::time::{minute, second};
use uom::si::velocity::{kilometer_per_hour, meter_per_second};

use crate::TelemetryError;

use super::{DerivedTelemetry, TelemetryRecord};

/// Derives speed in m/s, combined g, time in minutes and time relative to the first
/// sample for every record of a session.
///
/// The whole sequence is validated before any record is derived, so the result is
/// either complete or an error. The input is left untouched.
pub fn derive(records: &[TelemetryRecord]) -> Result<Vec<DerivedTelemetry>, TelemetryError> {
    let first = records.first().ok_or_else(|| {
        TelemetryError::invalid_input("telemetry sequence is empty, no reference time_s")
    })?;

    for (idx, record) in records.iter().enumerate() {
        record.validate(idx + 1)?;
    }

    if let Some(idx) = records
        .windows(2)
        .position(|pair| pair[1].time_s < pair[0].time_s)
    {
        warn!(
            "time_s decreases at row {} ({} -> {}), time_relative will go negative",
            idx + 2,
            records[idx].time_s,
            records[idx + 1].time_s
        );
    }

    let reference_time_s = first.time_s;
    let derived = records
        .iter()
        .map(|record| derive_record(record, reference_time_s))
        .collect::<Vec<_>>();

    debug!(
        "Derived {} telemetry records, reference time {}s",
        derived.len(),
        reference_time_s
    );
    Ok(derived)
}

fn derive_record(record: &TelemetryRecord, reference_time_s: f64) -> DerivedTelemetry {
    let speed = Velocity::new::<kilometer_per_hour>(record.speed_kmh);
    let time = Time::new::<second>(record.time_s);

    DerivedTelemetry {
        record: record.clone(),
        speed_ms: speed.get::<meter_per_second>(),
        total_g: record.lateral_g.hypot(record.longitudinal_g),
        time_minutes: time.get::<minute>(),
        time_relative: record.time_s - reference_time_s,
    }
}
