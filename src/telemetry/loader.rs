use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::TelemetryError;

use super::TelemetryRecord;

/// One CSV row as it comes off the file. Every channel is optional here so that
/// missing cells can be reported by name rather than as a generic parse failure.
#[derive(Debug, Deserialize)]
struct RawTelemetryRow {
    #[serde(default)]
    time_s: Option<f64>,
    #[serde(default)]
    speed_kmh: Option<f64>,
    #[serde(default)]
    distance_m: Option<f64>,
    #[serde(default)]
    brake_pressure_bar: Option<f64>,
    #[serde(default)]
    rpm: Option<f64>,
    #[serde(default)]
    lateral_g: Option<f64>,
    #[serde(default)]
    longitudinal_g: Option<f64>,
}

impl RawTelemetryRow {
    fn into_record(self, row: usize) -> Result<TelemetryRecord, TelemetryError> {
        let required = |value: Option<f64>, field: &str| {
            value.ok_or_else(|| {
                TelemetryError::invalid_input(format!("row {row}: missing required field {field}"))
            })
        };

        // "NaN" and "inf" parse as floats, so empty cells are the only defaulted ones
        let optional = |value: Option<f64>, field: &str| match value {
            Some(v) if !v.is_finite() => Err(TelemetryError::invalid_input(format!(
                "row {row}: field {field} is not a finite number ({v})"
            ))),
            v => Ok(v.unwrap_or(0.)),
        };

        let record = TelemetryRecord {
            time_s: required(self.time_s, "time_s")?,
            speed_kmh: required(self.speed_kmh, "speed_kmh")?,
            distance_m: required(self.distance_m, "distance_m")?,
            brake_pressure_bar: required(self.brake_pressure_bar, "brake_pressure_bar")?,
            rpm: required(self.rpm, "rpm")?,
            lateral_g: optional(self.lateral_g, "lateral_g")?,
            longitudinal_g: optional(self.longitudinal_g, "longitudinal_g")?,
        };
        record.validate(row)?;
        Ok(record)
    }
}

/// Loads a telemetry CSV file. The first line must be a header naming the channels.
pub fn load_telemetry_csv(source_file: &Path) -> Result<Vec<TelemetryRecord>, TelemetryError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(source_file)
        .map_err(|e| TelemetryError::TelemetrySource { source: e })?;
    let records = read_rows(reader)?;
    info!("Loaded {:?}, found {} telemetry records", source_file, records.len());
    Ok(records)
}

/// Reads telemetry CSV from any reader, for example stdin or an in-memory buffer.
pub fn read_telemetry_csv(source: impl Read) -> Result<Vec<TelemetryRecord>, TelemetryError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    read_rows(reader)
}

fn read_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<TelemetryRecord>, TelemetryError> {
    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<RawTelemetryRow>().enumerate() {
        let row_no = idx + 1;
        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                // type mismatches are bad input, everything else belongs to the source
                if let csv::ErrorKind::Deserialize { err, .. } = e.kind() {
                    return Err(TelemetryError::invalid_input(format!("row {row_no}: {err}")));
                }
                return Err(TelemetryError::TelemetrySource { source: e });
            }
        };
        records.push(raw.into_record(row_no)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_with_optional_channels() {
        let csv = "time_s,speed_kmh,distance_m,brake_pressure_bar,rpm,lateral_g,longitudinal_g\n\
                   0.0,10,0,0,1000,0.3,0.4\n\
                   0.1,12,0.3,0,1200,,-0.1\n";
        let records = read_telemetry_csv(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lateral_g, 0.3);
        assert_eq!(records[0].longitudinal_g, 0.4);
        assert_eq!(records[1].lateral_g, 0.);
        assert_eq!(records[1].longitudinal_g, -0.1);
    }

    #[test]
    fn test_missing_optional_columns_default_to_zero() {
        let csv = "rpm,time_s,speed_kmh,brake_pressure_bar,distance_m,gear\n\
                   1000,0,10,0,0,1\n";
        let records = read_telemetry_csv(csv.as_bytes()).unwrap();

        assert_eq!(records, vec![TelemetryRecord::new(0., 10., 0., 0., 1000.)]);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "time_s,speed_kmh,distance_m,rpm\n0,10,0,1000\n";
        match read_telemetry_csv(csv.as_bytes()) {
            Err(TelemetryError::InvalidInput { reason }) => {
                assert!(reason.contains("brake_pressure_bar"), "{reason}");
            }
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_required_cell() {
        let csv = "time_s,speed_kmh,distance_m,brake_pressure_bar,rpm\n\
                   0,10,0,0,1000\n\
                   1,,100,10,3000\n";
        match read_telemetry_csv(csv.as_bytes()) {
            Err(TelemetryError::InvalidInput { reason }) => {
                assert!(reason.contains("row 2"), "{reason}");
                assert!(reason.contains("speed_kmh"), "{reason}");
            }
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_cell() {
        let csv = "time_s,speed_kmh,distance_m,brake_pressure_bar,rpm\n\
                   0,fast,0,0,1000\n";
        match read_telemetry_csv(csv.as_bytes()) {
            Err(TelemetryError::InvalidInput { reason }) => {
                assert!(reason.contains("row 1"), "{reason}");
            }
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_infinite_required_cell() {
        let csv = "time_s,speed_kmh,distance_m,brake_pressure_bar,rpm\n\
                   0,inf,0,0,1000\n";
        match read_telemetry_csv(csv.as_bytes()) {
            Err(TelemetryError::InvalidInput { reason }) => {
                assert!(reason.contains("row 1"), "{reason}");
                assert!(reason.contains("speed_kmh"), "{reason}");
            }
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_optional_cell() {
        let csv = "time_s,speed_kmh,distance_m,brake_pressure_bar,rpm,lateral_g,longitudinal_g\n\
                   0,10,0,0,1000,0.2,0.1\n\
                   1,35,100,10,3000,NaN,0.1\n";
        match read_telemetry_csv(csv.as_bytes()) {
            Err(TelemetryError::InvalidInput { reason }) => {
                assert!(reason.contains("row 2"), "{reason}");
                assert!(reason.contains("lateral_g"), "{reason}");
            }
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }

        let csv = "time_s,speed_kmh,distance_m,brake_pressure_bar,rpm,longitudinal_g\n\
                   0,10,0,0,1000,-inf\n";
        match read_telemetry_csv(csv.as_bytes()) {
            Err(TelemetryError::InvalidInput { reason }) => {
                assert!(reason.contains("longitudinal_g"), "{reason}");
            }
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_rows_are_source_errors() {
        let csv = "time_s,speed_kmh,distance_m,brake_pressure_bar,rpm\n\
                   0,10,0,0,1000,7\n";
        match read_telemetry_csv(csv.as_bytes()) {
            Err(TelemetryError::TelemetrySource { .. }) => {}
            other => panic!("Expected TelemetrySource error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_loads_no_records() {
        let records = read_telemetry_csv("".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "time_s, speed_kmh, distance_m, brake_pressure_bar, rpm").unwrap();
        writeln!(file, "0, 10, 0, 0, 1000").unwrap();
        writeln!(file, "1, 35, 100, 10, 3000").unwrap();
        file.flush().unwrap();

        let records = load_telemetry_csv(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].speed_kmh, 35.);
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_telemetry_csv(&dir.path().join("sensor_data.csv"));
        match result {
            Err(TelemetryError::TelemetrySource { .. }) => {}
            other => panic!("Expected TelemetrySource error, got {:?}", other),
        }
    }
}
