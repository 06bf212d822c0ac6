pub mod constants;
pub mod discovery;
pub mod progress;

pub use constants::*;
pub use discovery::discover_exports;
pub use progress::{ProgressOutput, ProgressReporter};
