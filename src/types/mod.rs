pub mod project_data;

pub use project_data::ProjectData;
