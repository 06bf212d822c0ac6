pub mod batch;
pub mod importer;
pub mod inspector;
pub mod point_builder;

pub use batch::PointBatch;
pub use importer::{ExportImporter, FileSummary, RunSummary};
pub use inspector::{ExportInspector, FieldReadings, InspectReport};
pub use point_builder::PointBuilder;
