use super::TelemetryRecord;

const SPEED_KMH: [f64; 5] = [10., 35., 50., 80., 120.];
const DISTANCE_M: [f64; 5] = [0., 100., 200., 300., 400.];
const TIME_S: [f64; 5] = [0., 1., 2., 3., 4.];
const BRAKE_PRESSURE_BAR: [f64; 5] = [0., 10., 20., 30., 40.];
const RPM: [f64; 5] = [1000., 3000., 5000., 7000., 9000.];

/// A short hand-written session, handy for trying the tool without a log file.
pub fn sample_session() -> Vec<TelemetryRecord> {
    (0..SPEED_KMH.len())
        .map(|i| {
            TelemetryRecord::new(
                TIME_S[i],
                SPEED_KMH[i],
                DISTANCE_M[i],
                BRAKE_PRESSURE_BAR[i],
                RPM[i],
            )
        })
        .collect()
}
