pub mod export;
pub mod point;

pub use export::{ExportContext, ExportMetadata};
pub use point::Point;
