use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-file context read once from the header block of an export.
///
/// Built by the header interpreter and passed by reference to every row
/// that follows; it never changes while the file is being imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportContext {
    pub module: String,
    pub fields: Vec<String>,
    pub metadata: ExportMetadata,
}

impl ExportContext {
    pub fn new(module: String, fields: Vec<String>, metadata: ExportMetadata) -> Self {
        Self {
            module,
            fields,
            metadata,
        }
    }
}

/// Remaining cells of the metadata row: `station;lon;lat;module;type`.
///
/// Informational only; the station tag written on points comes from
/// configuration, not from here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ExportMetadata {
    pub station_name: Option<String>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    pub module_type: Option<String>,
}
