use crate::error::Result;
use crate::models::ExportMetadata;
use crate::processors::point_builder::PointBuilder;
use crate::readers::ExportReader;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct FieldReadings {
    pub field: String,
    pub readings: usize,
}

/// What an import of a single export would write, without writing it.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub file: String,
    pub module: String,
    pub metadata: ExportMetadata,
    pub coordinates_valid: bool,
    pub rows_processed: usize,
    pub rows_dropped: usize,
    pub points: usize,
    pub fields: Vec<FieldReadings>,
    pub first_reading: Option<DateTime<Utc>>,
    pub last_reading: Option<DateTime<Utc>>,
}

impl InspectReport {
    pub fn summary(&self) -> String {
        let mut text = format!(
            "File: {}\nModule: {}\nRows processed: {}\nRows dropped: {}\nPoints: {}",
            self.file, self.module, self.rows_processed, self.rows_dropped, self.points
        );

        if let Some(ref station) = self.metadata.station_name {
            text.push_str(&format!("\nExported station: {}", station));
        }
        if let Some(ref module_type) = self.metadata.module_type {
            text.push_str(&format!("\nModule type: {}", module_type));
        }
        if !self.coordinates_valid {
            text.push_str("\nCoordinates: out of range");
        }
        if let (Some(first), Some(last)) = (self.first_reading, self.last_reading) {
            text.push_str(&format!(
                "\nTime range: {} → {}",
                first.format("%Y-%m-%d %H:%M:%S"),
                last.format("%Y-%m-%d %H:%M:%S")
            ));
        }

        text.push_str("\nReadings per field:");
        for field in &self.fields {
            text.push_str(&format!("\n  {:<20} {}", field.field, field.readings));
        }
        text
    }
}

/// Dry analysis of exports using the same row rules as the importer
pub struct ExportInspector {
    builder: PointBuilder,
}

impl ExportInspector {
    pub fn new(builder: PointBuilder) -> Self {
        Self { builder }
    }

    pub fn inspect_file(&self, path: &Path) -> Result<InspectReport> {
        let reader = ExportReader::open(path)?;
        self.inspect_reader(reader, &path.display().to_string())
    }

    pub fn inspect_reader<R: Read>(
        &self,
        mut reader: ExportReader<R>,
        name: &str,
    ) -> Result<InspectReport> {
        let context = reader.read_header()?;

        let mut fields: Vec<FieldReadings> = context
            .fields
            .iter()
            .map(|field| FieldReadings {
                field: field.clone(),
                readings: 0,
            })
            .collect();
        let mut rows_processed = 0;
        let mut rows_dropped = 0;
        let mut points = 0;
        let mut first: Option<i64> = None;
        let mut last: Option<i64> = None;

        for record in reader.rows() {
            let row = record?;
            let Some(timestamp) = self.builder.row_timestamp(&row) else {
                rows_dropped += 1;
                continue;
            };
            rows_processed += 1;

            for (index, _) in self.builder.readings(&row, &context) {
                points += 1;
                fields[index].readings += 1;
                first = Some(first.map_or(timestamp, |t| t.min(timestamp)));
                last = Some(last.map_or(timestamp, |t| t.max(timestamp)));
            }
        }

        let coordinates_valid = context.metadata.validate().is_ok();
        Ok(InspectReport {
            file: name.to_string(),
            module: context.module,
            metadata: context.metadata,
            coordinates_valid,
            rows_processed,
            rows_dropped,
            points,
            fields,
            first_reading: first.and_then(|t| DateTime::from_timestamp(t, 0)),
            last_reading: last.and_then(|t| DateTime::from_timestamp(t, 0)),
        })
    }
}

impl Default for ExportInspector {
    fn default() -> Self {
        Self::new(PointBuilder::new())
    }
}
