pub mod export;
pub mod reader;

pub use export::{default_output_path, export_result_csv, write_report_json, write_result_csv};
pub use reader::{parse_dataset, read_dataset, validate_file_extension};
