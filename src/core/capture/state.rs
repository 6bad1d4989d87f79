use serde::Serialize;

/// Framing state of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No byte received yet; waits indefinitely
    Armed,
    /// At least one byte received; a silent read window ends the transfer
    Receiving,
    /// Transfer complete, sink closed
    Done,
}

impl std::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureState::Armed => write!(f, "Armed"),
            CaptureState::Receiving => write!(f, "Receiving"),
            CaptureState::Done => write!(f, "Done"),
        }
    }
}

/// Phase transitions reported to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CaptureEvent {
    Connected { device: String },
    Waiting,
    Receiving,
    Done { bytes: u64 },
    Cancelled { bytes: u64 },
    Disconnected { device: String },
}

/// How a capture ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaptureStatus {
    Completed,
    Cancelled,
}

/// Counters collected over one capture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptureStats {
    /// Total bytes forwarded to the sink
    pub bytes_received: u64,
    /// Non-empty reads
    pub chunks: u64,
    /// Empty reads while armed
    pub idle_reads: u64,
    /// Wall time from the first read to the end of the session
    pub elapsed_ms: u64,
}

/// Result of a capture that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub status: CaptureStatus,
    pub stats: CaptureStats,
}

impl CaptureOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == CaptureStatus::Completed
    }
}
