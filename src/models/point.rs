use serde::{Deserialize, Serialize};

/// One reading destined for the time-series store.
///
/// Every point carries exactly two tags (station and module) and a single
/// float field named `value`. Timestamps are epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub measurement: String,
    pub station: String,
    pub module: String,
    pub value: f64,
    pub timestamp: i64,
}

impl Point {
    pub fn new(
        measurement: String,
        station: String,
        module: String,
        value: f64,
        timestamp: i64,
    ) -> Self {
        Self {
            measurement,
            station,
            module,
            value,
            timestamp,
        }
    }
}
