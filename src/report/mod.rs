//! Dashboard report generation.

pub mod builder;
pub mod format;
pub mod generator;

pub use builder::{build_dashboard, DashboardOptions};
pub use generator::{generate_json_report, generate_markdown_report, write_report};
