pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::AoaError;
pub use generator::workflow::{launch, launch_with};
