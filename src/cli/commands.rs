use crate::cli::args::{Cli, Commands};
use crate::config::ImporterConfig;
use crate::processors::{ExportImporter, ExportInspector, PointBuilder};
use crate::utils::discover_exports;
use crate::utils::progress::{ProgressOutput, ProgressReporter};
use crate::writers::{InfluxWriter, LineProtocolFileWriter, PointSink};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

pub fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli);

    match cli.command {
        Commands::Import { folder, dry_run } => {
            // Dry runs only need the import settings, so a missing config is fine
            let (settings, mut sink) = match dry_run {
                Some(ref target) => {
                    let settings = ImporterConfig::load_optional(&cli.config).with_context(|| {
                        format!("Failed to load config {}", cli.config.display())
                    })?;
                    let writer: Box<dyn PointSink> =
                        Box::new(LineProtocolFileWriter::create(target).with_context(|| {
                            format!("Failed to open dry-run output {}", target.display())
                        })?);
                    (settings, writer)
                }
                None => {
                    let config = ImporterConfig::load(&cli.config).with_context(|| {
                        format!("Failed to load config {}", cli.config.display())
                    })?;
                    info!("Writing to {} (bucket: {})", config.influx.url, config.influx.bucket);
                    let writer: Box<dyn PointSink> = Box::new(
                        InfluxWriter::new(&config.influx)
                            .context("Failed to create InfluxDB client")?,
                    );
                    (config.import, writer)
                }
            };

            let files = discover_exports(&folder)
                .with_context(|| format!("Failed to list exports in {}", folder.display()))?;
            info!("Found {} export files in {}", files.len(), folder.display());

            let progress = import_progress(files.len() as u64, dry_run.as_deref(), cli.quiet);
            let importer = ExportImporter::from_settings(&settings);
            let summary = importer
                .import_all(&files, sink.as_mut(), Some(&progress as &dyn ProgressOutput))
                .context("Import aborted")?;

            progress.finish_with_message("All exports processed");
            progress.println("Done.");
            progress.println(&format!("\n{}", summary.summary()));
        }

        Commands::Inspect { file, json } => {
            let settings = ImporterConfig::load_optional(&cli.config)
                .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
            let inspector = ExportInspector::new(PointBuilder::with_station(&settings.station));
            let report = inspector
                .inspect_file(&file)
                .with_context(|| format!("Failed to inspect {}", file.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.summary());
            }
        }
    }

    Ok(())
}

/// Line protocol on stdout must not be interleaved with progress output
fn import_progress(total_files: u64, dry_run: Option<&Path>, quiet: bool) -> ProgressReporter {
    let to_stdout = dry_run.is_some_and(|target| target == Path::new("-"));
    if quiet || to_stdout {
        ProgressReporter::new(total_files, "", true)
    } else if total_files > 1 {
        ProgressReporter::new(total_files, "Importing exports...", false)
    } else {
        ProgressReporter::plain()
    }
}

/// Set up structured logging on stderr
fn setup_logging(cli: &Cli) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = cli.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("netatmo_importer={}", log_level)));

    // try_init so repeated runs in one process (tests) do not panic
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}
