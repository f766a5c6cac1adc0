//! Data transfer objects passed from services to templates.

pub mod detail;
pub mod list;
