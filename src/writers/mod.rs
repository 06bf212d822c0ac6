pub mod file_writer;
pub mod influx_writer;
pub mod line_protocol;

pub use file_writer::LineProtocolFileWriter;
pub use influx_writer::{classify_response, InfluxWriter};
pub use line_protocol::{encode_batch, encode_point};

use crate::error::Result;
use crate::models::Point;

/// Result of a write the run can survive.
///
/// Failures that must stop the run are returned as errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Accepted,
    /// The store refused the batch because its value types clash with data
    /// already stored. The batch is lost.
    Conflict { message: String },
}

/// Destination for batches of points.
pub trait PointSink {
    /// Write the whole batch as one request.
    fn write(&mut self, points: &[Point]) -> Result<WriteOutcome>;

    /// Flush anything buffered once the run is over.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
