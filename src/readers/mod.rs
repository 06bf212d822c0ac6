pub mod export_reader;
pub mod header;

pub use export_reader::ExportReader;
pub use header::interpret_header;
