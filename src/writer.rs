use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use clap::ValueEnum;
use log::info;
use serde::{Deserialize, Serialize};
use serde_jsonlines::JsonLinesWriter;

use crate::{
    TelemetryError,
    telemetry::{Column, DerivedTelemetry},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    #[value(name = "jsonl")]
    JsonLines,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderNaming {
    /// Same names as the source file
    #[default]
    Canonical,
    /// `velocity_kmh`, `timestamp_seconds`, `position_meters`
    Renamed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// CSV only. JSON lines always carry every channel.
    pub columns: Vec<Column>,
    /// CSV only.
    pub naming: HeaderNaming,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            columns: Column::ALL.to_vec(),
            naming: HeaderNaming::Canonical,
        }
    }
}

pub fn write_csv(
    writer: impl Write,
    records: &[DerivedTelemetry],
    columns: &[Column],
    naming: HeaderNaming,
) -> Result<(), TelemetryError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let header = columns.iter().map(|c| match naming {
        HeaderNaming::Canonical => c.name(),
        HeaderNaming::Renamed => c.renamed(),
    });
    csv_writer
        .write_record(header)
        .map_err(|e| TelemetryError::CsvWriterError { source: e })?;

    for record in records {
        csv_writer
            .write_record(columns.iter().map(|c| c.value(record).to_string()))
            .map_err(|e| TelemetryError::CsvWriterError { source: e })?;
    }
    csv_writer
        .flush()
        .map_err(|e| TelemetryError::WriterError { source: e })
}

pub fn write_jsonl(writer: impl Write, records: &[DerivedTelemetry]) -> Result<(), TelemetryError> {
    let mut jsonl_writer = JsonLinesWriter::new(writer);
    for record in records {
        jsonl_writer
            .write(record)
            .map_err(|e| TelemetryError::WriterError { source: e })?;
    }
    jsonl_writer
        .flush()
        .map_err(|e| TelemetryError::WriterError { source: e })
}

pub fn write_telemetry(
    writer: impl Write,
    records: &[DerivedTelemetry],
    options: &ExportOptions,
) -> Result<(), TelemetryError> {
    match options.format {
        ExportFormat::Csv => write_csv(writer, records, &options.columns, options.naming),
        ExportFormat::JsonLines => write_jsonl(writer, records),
    }
}

pub fn export_telemetry(
    file: &Path,
    records: &[DerivedTelemetry],
    options: &ExportOptions,
) -> Result<(), TelemetryError> {
    let telemetry_file = File::create(file).map_err(|e| TelemetryError::WriterError { source: e })?;
    write_telemetry(BufWriter::new(telemetry_file), records, options)?;
    info!("Wrote {} telemetry records to {:?}", records.len(), file);
    Ok(())
}
