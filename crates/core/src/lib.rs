pub mod config;
pub mod distribution;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod submit;
pub mod task;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, BidMode, Config, ConfigError, DealConfig,
    LotusConfig, SanitizedConfig, StorageServerType, SwanApiConfig, TaskConfig,
};
pub use distribution::{DealProposal, DealSender, DistributionError, LotusDealSender};
pub use error::{ErrorCategory, TaskError};
pub use manifest::FileDescriptor;
pub use pipeline::{TaskCreator, TaskOutcome};
pub use submit::{
    submit_task, SubmitError, SubmitOutcome, SwanClient, SwanConnector, SwanHttpConnector,
    SwanResponse, TaskSubmitter,
};
pub use task::{Task, TaskType};
