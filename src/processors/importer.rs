use crate::config::ImportSettings;
use crate::error::Result;
use crate::processors::batch::PointBatch;
use crate::processors::point_builder::PointBuilder;
use crate::readers::ExportReader;
use crate::utils::constants::{DEFAULT_BATCH_SIZE, DEFAULT_PROGRESS_INTERVAL};
use crate::utils::progress::ProgressOutput;
use crate::writers::{PointSink, WriteOutcome};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Counts for one imported file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSummary {
    pub rows_processed: usize,
    pub points_built: usize,
    pub points_written: usize,
    pub points_skipped: usize,
    pub batches_written: usize,
    pub batches_skipped: usize,
}

/// Counts for a whole run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files_imported: usize,
    pub files_failed: Vec<(PathBuf, String)>,
    pub totals: FileSummary,
}

impl RunSummary {
    fn add(&mut self, file: &FileSummary) {
        self.files_imported += 1;
        self.totals.rows_processed += file.rows_processed;
        self.totals.points_built += file.points_built;
        self.totals.points_written += file.points_written;
        self.totals.points_skipped += file.points_skipped;
        self.totals.batches_written += file.batches_written;
        self.totals.batches_skipped += file.batches_skipped;
    }

    pub fn summary(&self) -> String {
        let mut text = format!(
            "Files imported: {}\nFiles skipped: {}\nRows processed: {}\nPoints written: {}\nPoints discarded (type conflicts): {}\nBatches written: {}\nBatches skipped: {}",
            self.files_imported,
            self.files_failed.len(),
            self.totals.rows_processed,
            self.totals.points_written,
            self.totals.points_skipped,
            self.totals.batches_written,
            self.totals.batches_skipped,
        );
        for (path, reason) in &self.files_failed {
            text.push_str(&format!("\n  - {}: {}", path.display(), reason));
        }
        text
    }
}

/// Loads export files into a [`PointSink`], one file at a time.
pub struct ExportImporter {
    builder: PointBuilder,
    batch_size: usize,
    progress_interval: usize,
}

impl ExportImporter {
    pub fn new() -> Self {
        Self {
            builder: PointBuilder::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self::new()
            .with_station(&settings.station)
            .with_batch_size(settings.batch_size)
            .with_progress_interval(settings.progress_interval)
    }

    pub fn with_station(mut self, station: &str) -> Self {
        self.builder = PointBuilder::with_station(station);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval.max(1);
        self
    }

    /// Import every file in order.
    ///
    /// A file that cannot be read or has a broken header is reported and
    /// skipped. Write failures other than type conflicts end the run.
    pub fn import_all(
        &self,
        files: &[PathBuf],
        sink: &mut dyn PointSink,
        progress: Option<&dyn ProgressOutput>,
    ) -> Result<RunSummary> {
        let mut run = RunSummary::default();

        for path in files {
            let name = display_name(path);
            report(progress, &format!("Importing {} …", name));
            if let Some(p) = progress {
                p.set_message(&name);
            }

            match self.import_file(path, sink, progress) {
                Ok(summary) => run.add(&summary),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report(progress, &format!("  ✗  skipped {}: {}", name, e));
                    run.files_failed.push((path.clone(), e.to_string()));
                }
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        sink.finish()?;
        Ok(run)
    }

    pub fn import_file(
        &self,
        path: &Path,
        sink: &mut dyn PointSink,
        progress: Option<&dyn ProgressOutput>,
    ) -> Result<FileSummary> {
        let reader = ExportReader::open(path)?;
        self.import_reader(reader, &display_name(path), sink, progress)
    }

    /// Run the pipeline over an already opened export.
    pub fn import_reader<R: Read>(
        &self,
        mut reader: ExportReader<R>,
        name: &str,
        sink: &mut dyn PointSink,
        progress: Option<&dyn ProgressOutput>,
    ) -> Result<FileSummary> {
        let context = reader.read_header()?;
        debug!(
            "{}: module '{}', fields {:?}",
            name, context.module, context.fields
        );

        let mut summary = FileSummary::default();
        let mut batch = PointBatch::new(self.batch_size);

        for record in reader.rows() {
            let row = record?;
            let Some(timestamp) = self.builder.row_timestamp(&row) else {
                continue;
            };

            summary.rows_processed += 1;
            if summary.rows_processed % self.progress_interval == 0 {
                debug!("{}: processed {} rows", name, summary.rows_processed);
                report(
                    progress,
                    &format!("  processed {} rows...", summary.rows_processed),
                );
            }

            for point in self.builder.points(&row, timestamp, &context) {
                summary.points_built += 1;
                if batch.push(point) {
                    self.flush(&mut batch, sink, &mut summary, false, progress)?;
                }
            }
        }

        if !batch.is_empty() {
            self.flush(&mut batch, sink, &mut summary, true, progress)?;
        }

        info!(
            "{}: {} rows, {} points written, {} batches skipped",
            name, summary.rows_processed, summary.points_written, summary.batches_skipped
        );
        report(
            progress,
            &format!("  → finished {} rows from {}", summary.rows_processed, name),
        );
        Ok(summary)
    }

    /// Write the batch and clear it, whatever the outcome.
    fn flush(
        &self,
        batch: &mut PointBatch,
        sink: &mut dyn PointSink,
        summary: &mut FileSummary,
        is_final: bool,
        progress: Option<&dyn ProgressOutput>,
    ) -> Result<()> {
        let size = batch.len();
        let outcome = sink.write(batch.points());
        batch.clear();

        match outcome? {
            WriteOutcome::Accepted => {
                debug!("Flushed {} points", size);
                summary.batches_written += 1;
                summary.points_written += size;
            }
            WriteOutcome::Conflict { message } => {
                let which = if is_final { "final batch" } else { "batch" };
                warn!(
                    "Skipping {} at ~{} rows due to type conflict: {}",
                    which, summary.rows_processed, message
                );
                report(
                    progress,
                    &format!(
                        "  ⚠  Skipping {} at ~{} rows due to type conflict",
                        which, summary.rows_processed
                    ),
                );
                summary.batches_skipped += 1;
                summary.points_skipped += size;
            }
        }
        Ok(())
    }
}

impl Default for ExportImporter {
    fn default() -> Self {
        Self::new()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn report(progress: Option<&dyn ProgressOutput>, message: &str) {
    if let Some(p) = progress {
        p.println(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use crate::models::Point;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fmt::Write as _;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "Timestamp;Timezone;;;\n\"Home\";13.40;52.52;\"Indoor\";NAMain\nTimestamp;Timezone;Temperature\n";

    /// Records every batch it receives and answers from a script.
    #[derive(Default)]
    struct RecordingSink {
        batches: Vec<Vec<Point>>,
        script: VecDeque<Result<WriteOutcome>>,
        finished: bool,
    }

    impl RecordingSink {
        fn scripted(script: Vec<Result<WriteOutcome>>) -> Self {
            Self {
                script: script.into(),
                ..Self::default()
            }
        }

        fn sizes(&self) -> Vec<usize> {
            self.batches.iter().map(Vec::len).collect()
        }
    }

    impl PointSink for RecordingSink {
        fn write(&mut self, points: &[Point]) -> Result<WriteOutcome> {
            self.batches.push(points.to_vec());
            self.script
                .pop_front()
                .unwrap_or(Ok(WriteOutcome::Accepted))
        }

        fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    /// Collects printed progress lines.
    #[derive(Default)]
    struct RecordingOutput {
        lines: RefCell<Vec<String>>,
    }

    impl ProgressOutput for RecordingOutput {
        fn println(&self, message: &str) {
            self.lines.borrow_mut().push(message.to_string());
        }
    }

    fn conflict() -> Result<WriteOutcome> {
        Ok(WriteOutcome::Conflict {
            message: "field type conflict".to_string(),
        })
    }

    fn export(rows: usize) -> String {
        let mut data = HEADER.to_string();
        for i in 0..rows {
            writeln!(data, "{};tz;{}.5", 1_700_000_000 + i * 300, i % 30).unwrap();
        }
        data
    }

    fn import(data: &str, importer: &ExportImporter, sink: &mut RecordingSink) -> Result<FileSummary> {
        importer.import_reader(ExportReader::from_reader(data.as_bytes()), "test.csv", sink, None)
    }

    #[test]
    fn test_header_only_file() -> Result<()> {
        let mut sink = RecordingSink::default();
        let summary = import(HEADER, &ExportImporter::new(), &mut sink)?;

        assert_eq!(summary, FileSummary::default());
        assert!(sink.batches.is_empty());
        Ok(())
    }

    #[test]
    fn test_flush_at_threshold_and_remainder() -> Result<()> {
        let mut sink = RecordingSink::default();
        let summary = import(&export(1500), &ExportImporter::new(), &mut sink)?;

        assert_eq!(sink.sizes(), vec![1000, 500]);
        assert_eq!(summary.rows_processed, 1500);
        assert_eq!(summary.points_written, 1500);
        assert_eq!(summary.batches_written, 2);
        Ok(())
    }

    #[test]
    fn test_exact_multiple_has_no_empty_final_flush() -> Result<()> {
        let mut sink = RecordingSink::default();
        import(&export(2000), &ExportImporter::new(), &mut sink)?;

        assert_eq!(sink.sizes(), vec![1000, 1000]);
        Ok(())
    }

    #[test]
    fn test_batches_split_inside_a_row() -> Result<()> {
        let data = "a\nb;c;d;Outdoor\nTimestamp;Timezone;Temperature;Humidity;Pressure\n\
1700000000;tz;1;2;3\n1700000300;tz;4;5;6\n1700000600;tz;7;;9\n";
        let importer = ExportImporter::new().with_batch_size(4);
        let mut sink = RecordingSink::default();
        let summary = import(data, &importer, &mut sink)?;

        assert_eq!(sink.sizes(), vec![4, 4]);
        assert_eq!(summary.points_built, 8);
        assert_eq!(sink.batches[1][0].measurement, "Humidity");
        assert!(sink
            .batches
            .iter()
            .flatten()
            .all(|p| p.module == "Outdoor"));
        Ok(())
    }

    #[test]
    fn test_conflict_skips_batch_and_continues() -> Result<()> {
        let importer = ExportImporter::new().with_batch_size(10);
        let mut sink = RecordingSink::scripted(vec![conflict()]);
        let summary = import(&export(25), &importer, &mut sink)?;

        assert_eq!(sink.sizes(), vec![10, 10, 5]);
        assert_eq!(summary.batches_skipped, 1);
        assert_eq!(summary.points_skipped, 10);
        assert_eq!(summary.batches_written, 2);
        assert_eq!(summary.points_written, 15);
        Ok(())
    }

    #[test]
    fn test_conflict_on_final_batch() -> Result<()> {
        let importer = ExportImporter::new().with_batch_size(10);
        let mut sink = RecordingSink::scripted(vec![Ok(WriteOutcome::Accepted), conflict()]);
        let summary = import(&export(15), &importer, &mut sink)?;

        assert_eq!(sink.sizes(), vec![10, 5]);
        assert_eq!(summary.batches_skipped, 1);
        assert_eq!(summary.points_written, 10);
        Ok(())
    }

    #[test]
    fn test_write_error_aborts_file() {
        let importer = ExportImporter::new().with_batch_size(10);
        let mut sink = RecordingSink::scripted(vec![Err(ProcessingError::WriteRejected {
            status: 500,
            message: "internal error".to_string(),
        })]);

        let result = import(&export(25), &importer, &mut sink);
        assert!(matches!(
            result,
            Err(ProcessingError::WriteRejected { status: 500, .. })
        ));
        assert_eq!(sink.sizes(), vec![10]);
    }

    #[test]
    fn test_malformed_rows_not_counted() -> Result<()> {
        let data = format!(
            "{}1700000000;tz;20.5\nshort;row\nbad-ts;tz;21.0\n\n1700000600;tz;\n1700000900;tz;n/a\n",
            HEADER
        );
        let mut sink = RecordingSink::default();
        let summary = import(&data, &ExportImporter::new(), &mut sink)?;

        assert_eq!(summary.rows_processed, 3);
        assert_eq!(summary.points_built, 1);
        assert_eq!(sink.sizes(), vec![1]);
        Ok(())
    }

    #[test]
    fn test_progress_counts_only_well_formed_rows() -> Result<()> {
        let mut data = HEADER.to_string();
        for i in 0..1000 {
            writeln!(data, "{};tz;{}.5", 1_700_000_000 + i * 300, i % 30).unwrap();
            if i % 7 == 0 {
                data.push_str("short;row\n");
            }
            if i % 11 == 0 {
                data.push_str("not-a-time;tz;20.0\n");
            }
        }

        let output = RecordingOutput::default();
        let mut sink = RecordingSink::default();
        let summary = ExportImporter::new().import_reader(
            ExportReader::from_reader(data.as_bytes()),
            "test.csv",
            &mut sink,
            Some(&output as &dyn ProgressOutput),
        )?;

        let lines = output.lines.borrow();
        let processed: Vec<&str> = lines
            .iter()
            .map(String::as_str)
            .filter(|line| line.contains("processed"))
            .collect();
        assert_eq!(summary.rows_processed, 1000);
        assert_eq!(
            processed,
            vec!["  processed 500 rows...", "  processed 1000 rows..."]
        );
        Ok(())
    }

    #[test]
    fn test_import_all_skips_broken_files() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let good = temp_dir.path().join("a_indoor.csv");
        let broken = temp_dir.path().join("b_broken.csv");
        let missing = temp_dir.path().join("c_missing.csv");
        std::fs::File::create(&good)?.write_all(export(3).as_bytes())?;
        std::fs::File::create(&broken)?.write_all(b"Timestamp;Timezone\n")?;

        let mut sink = RecordingSink::default();
        let run = ExportImporter::new().import_all(
            &[good, broken.clone(), missing.clone()],
            &mut sink,
            None,
        )?;

        assert_eq!(run.files_imported, 1);
        assert_eq!(run.files_failed.len(), 2);
        assert_eq!(run.files_failed[0].0, broken);
        assert_eq!(run.files_failed[1].0, missing);
        assert_eq!(run.totals.points_written, 3);
        assert!(sink.finished);
        Ok(())
    }

    #[test]
    fn test_import_all_stops_on_fatal_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let first = temp_dir.path().join("a.csv");
        let second = temp_dir.path().join("b.csv");
        std::fs::File::create(&first)?.write_all(export(3).as_bytes())?;
        std::fs::File::create(&second)?.write_all(export(3).as_bytes())?;

        let mut sink = RecordingSink::scripted(vec![Err(ProcessingError::WriteRejected {
            status: 401,
            message: "unauthorized access".to_string(),
        })]);
        let result = ExportImporter::new().import_all(&[first, second], &mut sink, None);

        assert!(result.is_err());
        assert_eq!(sink.batches.len(), 1);
        assert!(!sink.finished);
        Ok(())
    }

    #[test]
    fn test_summary_lists_failed_files() {
        let mut run = RunSummary::default();
        run.add(&FileSummary {
            rows_processed: 10,
            points_written: 20,
            ..FileSummary::default()
        });
        run.files_failed
            .push((PathBuf::from("data/bad.csv"), "Invalid export header".to_string()));

        let text = run.summary();
        assert!(text.contains("Files imported: 1"));
        assert!(text.contains("Points written: 20"));
        assert!(text.contains("data/bad.csv: Invalid export header"));
    }
}
