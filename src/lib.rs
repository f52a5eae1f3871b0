// Library exports for the CLI and integration tests
pub mod cli;
pub mod config_file;
pub mod error;
pub mod image_processing;
pub mod output;
pub mod ratio;
pub mod utils;

// Re-export commonly used types
pub use cli::{Args, OutMode, SourceLang};
pub use error::{BadgeError, Result};
pub use image_processing::{Bitmap, ProcessingConfig, ProcessingEngine, ProcessingResult};
pub use ratio::{resolve_dimensions, Dimensions, Ratio};
