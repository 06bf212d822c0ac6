use crate::error::{ProcessingError, Result};
use crate::models::Point;
use crate::writers::line_protocol::encode_point;
use crate::writers::{PointSink, WriteOutcome};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Dry-run sink that writes line protocol to a file or stdout instead of
/// sending it to a server. Every batch is accepted.
pub struct LineProtocolFileWriter {
    out: BufWriter<Box<dyn Write>>,
    lines_written: usize,
}

impl LineProtocolFileWriter {
    /// `-` selects stdout
    pub fn create(path: &Path) -> Result<Self> {
        let out: Box<dyn Write> = if path == Path::new("-") {
            Box::new(std::io::stdout())
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Box::new(File::create(path)?)
        };
        Ok(Self::from_writer(out))
    }

    pub fn from_writer(out: Box<dyn Write>) -> Self {
        Self {
            out: BufWriter::new(out),
            lines_written: 0,
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }
}

impl PointSink for LineProtocolFileWriter {
    fn write(&mut self, points: &[Point]) -> Result<WriteOutcome> {
        for point in points {
            writeln!(self.out, "{}", encode_point(point)).map_err(ProcessingError::Output)?;
        }
        self.lines_written += points.len();
        Ok(WriteOutcome::Accepted)
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().map_err(ProcessingError::Output)
    }
}
