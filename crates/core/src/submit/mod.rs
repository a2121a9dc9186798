//! Task submission to the Swan coordination service.
//!
//! `submit_task` always writes the `<task name>.csv` snapshot. In offline
//! mode it stops there; online it opens a session through a `SwanConnector`
//! and uploads the task with the snapshot attached.

mod step;
mod swan;
mod types;

pub use step::{submit_task, SubmitOutcome};
pub use swan::{SwanClient, SwanHttpConnector};
pub use types::*;
