// Domain module - Configuration values and error types
pub mod config;
pub mod error;

pub use config::{FlowControl, GrabConfig, LinkConfig};
pub use error::{LinkError, SinkError, TdsGrabError, TdsGrabResult};
