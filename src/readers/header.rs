use crate::error::{ProcessingError, Result};
use crate::models::{ExportContext, ExportMetadata};
use crate::utils::constants::{DATA_OFFSET, HEADER_ROWS, MODULE_NAME_COLUMN};
use csv::StringRecord;

/// Interpret the three header rows of a Netatmo export.
///
/// Row 1 holds column labels and is ignored. Row 2 is the metadata row
/// (`station;lon;lat;module;type`) and row 3 names the measurements from
/// column 2 onward, in the same order as the readings in every data row.
pub fn interpret_header(rows: &[StringRecord]) -> Result<ExportContext> {
    if rows.len() < HEADER_ROWS {
        return Err(ProcessingError::InvalidHeader(format!(
            "expected {} header rows, found {}",
            HEADER_ROWS,
            rows.len()
        )));
    }

    let metadata_row = &rows[1];
    let module = metadata_row
        .get(MODULE_NAME_COLUMN)
        .map(unquote)
        .ok_or_else(|| {
            ProcessingError::InvalidHeader(format!(
                "metadata row has {} columns, module name expected in column {}",
                metadata_row.len(),
                MODULE_NAME_COLUMN
            ))
        })?;

    let fields = rows[2]
        .iter()
        .skip(DATA_OFFSET)
        .map(str::to_string)
        .collect();

    Ok(ExportContext::new(module, fields, parse_metadata(metadata_row)))
}

/// Strip surrounding quote characters left over after CSV unquoting
fn unquote(cell: &str) -> String {
    cell.trim_matches('"').to_string()
}

fn parse_metadata(row: &StringRecord) -> ExportMetadata {
    let text = |index: usize| {
        row.get(index)
            .map(unquote)
            .filter(|value| !value.is_empty())
    };
    let number = |index: usize| row.get(index).and_then(|cell| unquote(cell).trim().parse::<f64>().ok());

    ExportMetadata {
        station_name: text(0),
        longitude: number(1),
        latitude: number(2),
        module_type: text(4),
    }
}
