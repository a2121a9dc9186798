//! Task assembly: configuration checks, task identity and descriptor
//! stamping.

mod builder;
mod types;
mod validator;

pub use builder::{build_task, stamp_file_descs, url_join};
pub use types::{Task, TaskType};
pub use validator::{
    default_task_name, log_task_settings, validate_task_config, ValidatedTask,
};
