use crate::models::{ExportContext, Point};
use crate::utils::constants::{DATA_OFFSET, DEFAULT_STATION_NAME, MIN_DATA_COLUMNS};
use csv::StringRecord;

/// Turns data rows into points, one per populated reading.
pub struct PointBuilder {
    station: String,
}

impl PointBuilder {
    pub fn new() -> Self {
        Self::with_station(DEFAULT_STATION_NAME)
    }

    pub fn with_station(station: &str) -> Self {
        Self {
            station: station.to_string(),
        }
    }

    /// Timestamp of a well-formed row, `None` for rows that must be dropped.
    ///
    /// A row is well-formed when it has at least three cells and its first
    /// cell is an integer number of epoch seconds.
    pub fn row_timestamp(&self, row: &StringRecord) -> Option<i64> {
        if row.len() < MIN_DATA_COLUMNS {
            return None;
        }
        row.get(0)?.trim().parse::<i64>().ok()
    }

    /// Populated readings of a row as `(field index, value)`, in field order.
    ///
    /// Cells that are empty, missing or not a finite number produce nothing;
    /// the remaining readings of the row are unaffected.
    pub fn readings<'a>(
        &self,
        row: &'a StringRecord,
        context: &ExportContext,
    ) -> impl Iterator<Item = (usize, f64)> + 'a {
        (0..context.fields.len()).filter_map(move |index| {
            parse_reading(row.get(DATA_OFFSET + index)?).map(|value| (index, value))
        })
    }

    /// Points for one well-formed row, in field order.
    pub fn points<'a>(
        &'a self,
        row: &'a StringRecord,
        timestamp: i64,
        context: &'a ExportContext,
    ) -> impl Iterator<Item = Point> + 'a {
        self.readings(row, context).map(move |(index, value)| {
            Point::new(
                context.fields[index].clone(),
                self.station.clone(),
                context.module.clone(),
                value,
                timestamp,
            )
        })
    }

    /// Validate a row and collect its points; empty for malformed rows
    pub fn build_points(&self, row: &StringRecord, context: &ExportContext) -> Vec<Point> {
        match self.row_timestamp(row) {
            Some(timestamp) => self.points(row, timestamp, context).collect(),
            None => Vec::new(),
        }
    }
}

impl Default for PointBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Readings are always stored as floats, whatever the measurement.
fn parse_reading(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    // NaN and infinities parse but have no line protocol representation
    cell.parse::<f64>().ok().filter(|value| value.is_finite())
}
