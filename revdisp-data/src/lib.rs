//! Parameter tables and recorded reference results for `revdisp-core`.

pub mod builtin;
pub mod loader;
pub mod recording;

pub use builtin::{builtin_source, builtin_store};
pub use loader::{ParameterRow, ParameterTableLoader, TableLoaderError};
pub use recording::{RecordedCase, RecordedOracle, Recording, RecordingError};
