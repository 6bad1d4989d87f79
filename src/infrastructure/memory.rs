//! In-memory transport and sink
//!
//! These stand in for the serial device and the capture file so the framing
//! state machine can be exercised without hardware.

use crate::core::{sink::Sink, transport::{Chunk, Transport}};
use crate::domain::error::{LinkError, SinkError};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared view of the calls made on a [`ScriptedTransport`]
#[derive(Debug, Clone, Default)]
pub struct TransportProbe {
    counters: Arc<ProbeCounters>,
}

#[derive(Debug, Default)]
struct ProbeCounters {
    reads: AtomicUsize,
    flushes: AtomicUsize,
    closes: AtomicUsize,
}

impl TransportProbe {
    pub fn reads(&self) -> usize {
        self.counters.reads.load(Ordering::SeqCst)
    }

    pub fn flushes(&self) -> usize {
        self.counters.flushes.load(Ordering::SeqCst)
    }

    /// Number of times the handle was actually released
    pub fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }
}

/// Transport that replays a fixed sequence of chunks
///
/// An empty chunk in the script plays the part of a read timeout. Chunks
/// larger than the requested read size are split across reads. Once the
/// script runs out, every read times out, unless a failure was queued with
/// [`ScriptedTransport::then_fail`].
#[derive(Debug)]
pub struct ScriptedTransport {
    device: String,
    script: VecDeque<Chunk>,
    failure: Option<io::ErrorKind>,
    timeout_delay: Duration,
    open: bool,
    probe: TransportProbe,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Chunk>) -> Self {
        Self {
            device: "scripted".to_string(),
            script: script.into(),
            failure: None,
            timeout_delay: Duration::ZERO,
            open: true,
            probe: TransportProbe::default(),
        }
    }

    /// Sleep this long on every simulated timeout
    pub fn with_timeout_delay(mut self, delay: Duration) -> Self {
        self.timeout_delay = delay;
        self
    }

    /// Fail with `kind` once the script is exhausted
    pub fn then_fail(mut self, kind: io::ErrorKind) -> Self {
        self.failure = Some(kind);
        self
    }

    pub fn probe(&self) -> TransportProbe {
        self.probe.clone()
    }

    fn timeout(&self) -> Chunk {
        if !self.timeout_delay.is_zero() {
            std::thread::sleep(self.timeout_delay);
        }
        Vec::new()
    }
}

impl Transport for ScriptedTransport {
    fn device(&self) -> &str {
        &self.device
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn flush_input(&mut self) -> Result<(), LinkError> {
        self.probe.counters.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read(&mut self, max_bytes: usize) -> Result<Chunk, LinkError> {
        if !self.open {
            return Err(LinkError::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "transport is closed",
            )));
        }
        self.probe.counters.reads.fetch_add(1, Ordering::SeqCst);

        match self.script.pop_front() {
            Some(chunk) if chunk.is_empty() => Ok(self.timeout()),
            Some(mut chunk) => {
                if chunk.len() > max_bytes {
                    let rest = chunk.split_off(max_bytes);
                    self.script.push_front(rest);
                }
                Ok(chunk)
            }
            None => match self.failure {
                Some(kind) => Err(LinkError::Io(io::Error::new(kind, "scripted device failure"))),
                None => Ok(self.timeout()),
            },
        }
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.probe.counters.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Sink that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    data: Vec<u8>,
    writes: usize,
    closes: usize,
    fail_after: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write after the first `writes` succeed
    pub fn failing_after(writes: usize) -> Self {
        Self {
            fail_after: Some(writes),
            ..Self::default()
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn closes(&self) -> usize {
        self.closes
    }
}

impl Sink for MemorySink {
    fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        if self.closes > 0 {
            return Err(SinkError::Write(io::Error::new(io::ErrorKind::Other, "sink is closed")));
        }
        if self.fail_after.is_some_and(|limit| self.writes >= limit) {
            return Err(SinkError::Write(io::Error::new(io::ErrorKind::WriteZero, "sink is full")));
        }
        self.data.extend_from_slice(chunk);
        self.writes += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.closes += 1;
        Ok(())
    }
}
