//! CLI library for testing purposes

pub mod summary;
pub mod validation;

pub use summary::{print_summary, write_report_json};
pub use validation::{parse_mode, validate_file_name, validate_input_dir};
