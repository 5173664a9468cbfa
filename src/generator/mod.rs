pub mod catalog;
pub mod context;
pub mod outlet;
pub mod preprocess;
pub mod progress;
pub mod prompt;
pub mod template;
pub mod workflow;
