use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the serial link
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Invalid connection parameters: {0}")]
    InvalidConfig(String),

    #[error("Unable to connect to serial device {device}: {reason}")]
    Unavailable { device: String, reason: String },

    #[error("Error reading from serial device: {0}")]
    Io(#[source] std::io::Error),

    #[error("Failed to list serial ports: {0}")]
    Enumeration(String),
}

/// Errors raised by the capture destination
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Error opening '{}' for writing: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing captured data: {0}")]
    Write(#[source] std::io::Error),

    #[error("Error closing capture file: {0}")]
    Close(#[source] std::io::Error),
}

/// TDSGrab unified error type
#[derive(Error, Debug)]
pub enum TdsGrabError {
    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Output error: {0}")]
    Output(String),

    #[error("Capture task failed: {0}")]
    Task(String),
}

impl TdsGrabError {
    /// Process exit code reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            TdsGrabError::Link(LinkError::InvalidConfig(_)) | TdsGrabError::Config { .. } => 2,
            _ => 1,
        }
    }
}

pub type TdsGrabResult<T> = Result<T, TdsGrabError>;
