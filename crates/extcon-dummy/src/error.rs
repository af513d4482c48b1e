//! Error types for the dummy extcon device

use extcon_core::InputError;
use thiserror::Error;

/// Device node problems detected at attach
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No device node to attach to
    #[error("no device node provided")]
    MissingNode,

    /// Device node is meant for another driver
    #[error("device node is not compatible: {0}")]
    NotCompatible(String),
}

/// Debug filesystem errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DebugFsError {
    /// Directory already exists
    #[error("directory already exists: {0}")]
    DirectoryExists(String),

    /// File already exists
    #[error("file already exists: {0}")]
    FileExists(String),

    /// Path does not exist
    #[error("no such file or directory: {0}")]
    NotFound(String),

    /// Entry limit reached
    #[error("no space left for {0}")]
    NoSpace(String),

    /// Path names a directory where a file was expected
    #[error("is a directory: {0}")]
    IsDirectory(String),

    /// Written text was rejected
    #[error(transparent)]
    InvalidInput(#[from] InputError),
}

/// Errors from reading or writing an endpoint by name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// No endpoint with this name
    #[error("unknown endpoint: {0}")]
    Unknown(String),

    /// Written text was rejected
    #[error(transparent)]
    InvalidInput(#[from] InputError),
}

/// Errors that abort attaching a device
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// Bad or missing device node
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Debug endpoints could not be created
    #[error("failed to create debug endpoints: {0}")]
    DebugFs(#[from] DebugFsError),
}
