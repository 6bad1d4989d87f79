//! TDSGrab Library
//!
//! Captures a single image pushed by an instrument over a serial link and
//! writes it to a file. The end of a transfer is inferred from a read
//! window in which no byte arrives.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::{run_capture, CaptureOutcome, CaptureSession, CaptureState, Grabber, Sink, Transport};
pub use crate::domain::config::{FlowControl, LinkConfig};
pub use crate::domain::error::{LinkError, SinkError, TdsGrabError, TdsGrabResult};
