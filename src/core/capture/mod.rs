// Capture module - Idle-timeout framing
pub mod session;
pub mod state;

pub use session::CaptureSession;
pub use state::{CaptureEvent, CaptureOutcome, CaptureState, CaptureStats, CaptureStatus};
