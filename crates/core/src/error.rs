//! Error types for task creation.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::distribution::DistributionError;
use crate::submit::SubmitError;

/// Broad failure category, for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or inconsistent task configuration.
    Config,
    /// Reading or writing local files.
    Io,
    /// Sending deals to storage providers.
    Distribution,
    /// Establishing or using the remote session.
    Session,
    /// The remote service answered with a non-success status.
    Rejected,
}

/// Errors that can occur while creating a task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A required setting is missing or inconsistent.
    #[error("Invalid task configuration ({field}): {reason}")]
    Config { field: &'static str, reason: String },

    /// The max price is not a valid non-negative decimal.
    #[error("Invalid max price {value:?}: {reason}")]
    InvalidMaxPrice { value: String, reason: String },

    /// File system operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest could not be encoded or decoded.
    #[error("Invalid manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },

    /// The deal sender failed.
    #[error("Failed to send deals: {0}")]
    Distribution(#[from] DistributionError),

    /// The remote session could not be established or the request failed.
    #[error("Swan session error: {0}")]
    Session(#[from] SubmitError),

    /// The remote service rejected the task.
    #[error("Task rejected by Swan, status: {status}, message: {message}")]
    Rejected { status: String, message: String },
}

impl TaskError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a manifest encoding/decoding error for the given path.
    pub fn manifest(path: impl AsRef<Path>, reason: impl Display) -> Self {
        Self::Manifest {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Returns the failure category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } | Self::InvalidMaxPrice { .. } => ErrorCategory::Config,
            Self::Io { .. } | Self::Manifest { .. } => ErrorCategory::Io,
            Self::Distribution(_) => ErrorCategory::Distribution,
            Self::Session(_) => ErrorCategory::Session,
            Self::Rejected { .. } => ErrorCategory::Rejected,
        }
    }
}
