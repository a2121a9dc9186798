//! CAR file manifests.
//!
//! The upload stage leaves a `car.json` in the input directory describing
//! every CAR file. Task creation stamps those records and writes them back
//! out as JSON and CSV manifests in the output directory.

mod dirs;
mod io;
mod types;

pub use dirs::{check_input_dir, create_output_dir};
pub use io::{read_file_descs, write_csv, write_file_descs, write_json};
pub use types::FileDescriptor;

/// Name of the manifest produced by the upload stage.
pub const JSON_FILE_NAME_BY_UPLOAD: &str = "car.json";

/// Suffix of the JSON manifest written for a task.
pub const JSON_FILE_NAME_BY_TASK: &str = "-metadata.json";

/// Suffix of the CSV manifest written for a task.
pub const CSV_FILE_NAME_BY_TASK: &str = "-metadata.csv";
