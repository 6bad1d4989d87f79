// Core module - Capture protocol
pub mod capture;
pub mod grabber;
pub mod sink;
pub mod transport;

pub use capture::{CaptureEvent, CaptureOutcome, CaptureSession, CaptureState, CaptureStats, CaptureStatus};
pub use grabber::{run_capture, Grabber};
pub use sink::Sink;
pub use transport::{Chunk, Connector, Transport};
