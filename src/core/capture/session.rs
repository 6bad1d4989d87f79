use super::state::{CaptureEvent, CaptureOutcome, CaptureState, CaptureStats, CaptureStatus};
use crate::core::{sink::Sink, transport::Transport};
use crate::domain::error::TdsGrabResult;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// One-shot idle-timeout framing over a transport
///
/// The session borrows an open transport and an open sink, forwards every
/// non-empty chunk to the sink in arrival order and decides where the
/// transfer ends: the first read that returns nothing after data has started
/// flowing. Before any data arrives, empty reads are ignored and the session
/// waits for as long as it takes. The sink is closed exactly once on every
/// exit path of [`CaptureSession::run`].
pub struct CaptureSession<'a, T: Transport + ?Sized, S: Sink + ?Sized> {
    transport: &'a mut T,
    sink: &'a mut S,
    read_size: usize,
    state: CaptureState,
    stats: CaptureStats,
    sink_closed: bool,
    cancel: CancellationToken,
    events: Option<mpsc::UnboundedSender<CaptureEvent>>,
}

impl<'a, T: Transport + ?Sized, S: Sink + ?Sized> CaptureSession<'a, T, S> {
    pub fn new(transport: &'a mut T, sink: &'a mut S, read_size: usize) -> Self {
        Self {
            transport,
            sink,
            read_size: read_size.max(1),
            state: CaptureState::Armed,
            stats: CaptureStats::default(),
            sink_closed: false,
            cancel: CancellationToken::new(),
            events: None,
        }
    }

    /// Stop at the next read boundary once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<CaptureEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn stats(&self) -> &CaptureStats {
        &self.stats
    }

    /// Perform a single read and apply the resulting transition
    pub fn step(&mut self) -> TdsGrabResult<CaptureState> {
        if self.state == CaptureState::Done {
            return Ok(self.state);
        }

        let chunk = self.transport.read(self.read_size)?;

        if chunk.is_empty() {
            match self.state {
                CaptureState::Armed => {
                    self.stats.idle_reads += 1;
                    trace!("No data yet after {} idle reads", self.stats.idle_reads);
                }
                CaptureState::Receiving => {
                    debug!("Read window elapsed without data, transfer complete");
                    self.close_sink()?;
                    self.state = CaptureState::Done;
                    self.emit(CaptureEvent::Done {
                        bytes: self.stats.bytes_received,
                    });
                }
                CaptureState::Done => {}
            }
            return Ok(self.state);
        }

        trace!("Received {} bytes: {}", chunk.len(), hex::encode(&chunk));
        self.sink.write_chunk(&chunk)?;
        self.stats.bytes_received += chunk.len() as u64;
        self.stats.chunks += 1;

        if self.state == CaptureState::Armed {
            info!("Transfer started from {}", self.transport.device());
            self.state = CaptureState::Receiving;
            self.emit(CaptureEvent::Receiving);
        }

        Ok(self.state)
    }

    /// Drive the session until the transfer ends, fails or is cancelled
    pub fn run(mut self) -> TdsGrabResult<CaptureOutcome> {
        let started = Instant::now();
        if self.state == CaptureState::Armed {
            self.emit(CaptureEvent::Waiting);
        }

        let result = self.drive();
        self.stats.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let closed = self.close_sink();
        let status = result?;
        closed?;

        if status == CaptureStatus::Cancelled {
            self.emit(CaptureEvent::Cancelled {
                bytes: self.stats.bytes_received,
            });
        }

        info!(
            "Capture finished ({:?}): {} bytes in {} chunks",
            status, self.stats.bytes_received, self.stats.chunks
        );

        Ok(CaptureOutcome {
            status,
            stats: self.stats,
        })
    }

    fn drive(&mut self) -> TdsGrabResult<CaptureStatus> {
        loop {
            if self.cancel.is_cancelled() {
                info!("Capture cancelled in state {}", self.state);
                return Ok(CaptureStatus::Cancelled);
            }
            if self.step()? == CaptureState::Done {
                return Ok(CaptureStatus::Completed);
            }
        }
    }

    fn close_sink(&mut self) -> TdsGrabResult<()> {
        if self.sink_closed {
            return Ok(());
        }
        self.sink_closed = true;
        self.sink.close()?;
        Ok(())
    }

    fn emit(&self, event: CaptureEvent) {
        if let Some(events) = &self.events {
            if events.send(event).is_err() {
                warn!("Capture event receiver dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{LinkError, TdsGrabError};
    use crate::infrastructure::memory::{MemorySink, ScriptedTransport};

    #[test]
    fn test_empty_read_while_armed_keeps_state() {
        let mut transport = ScriptedTransport::new(vec![Vec::new(), Vec::new()]);
        let mut sink = MemorySink::new();
        let mut session = CaptureSession::new(&mut transport, &mut sink, 8);

        assert_eq!(session.step().unwrap(), CaptureState::Armed);
        assert_eq!(session.step().unwrap(), CaptureState::Armed);
        assert_eq!(session.stats().idle_reads, 2);
        drop(session);

        assert_eq!(sink.writes(), 0);
        assert_eq!(sink.closes(), 0);
    }

    #[test]
    fn test_empty_read_while_receiving_finishes_once() {
        let mut transport = ScriptedTransport::new(vec![b"ABC".to_vec(), Vec::new()]);
        let mut sink = MemorySink::new();
        let mut session = CaptureSession::new(&mut transport, &mut sink, 8);

        assert_eq!(session.step().unwrap(), CaptureState::Receiving);
        assert_eq!(session.step().unwrap(), CaptureState::Done);
        // Further steps do not read or close again
        assert_eq!(session.step().unwrap(), CaptureState::Done);
        drop(session);

        assert_eq!(sink.data(), b"ABC");
        assert_eq!(sink.closes(), 1);
        assert_eq!(transport.probe().reads(), 2);
    }

    #[test]
    fn test_short_chunk_does_not_end_transfer() {
        let mut transport = ScriptedTransport::new(vec![
            b"ABCDEFGH".to_vec(),
            b"I".to_vec(),
            b"JKLMNOPQ".to_vec(),
            Vec::new(),
        ]);
        let mut sink = MemorySink::new();
        let outcome = CaptureSession::new(&mut transport, &mut sink, 8).run().unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.stats.chunks, 3);
        assert_eq!(sink.data(), b"ABCDEFGHIJKLMNOPQ");
    }

    #[test]
    fn test_read_error_closes_sink_and_keeps_partial_data() {
        let mut transport = ScriptedTransport::new(vec![b"PARTIAL".to_vec()])
            .then_fail(std::io::ErrorKind::BrokenPipe);
        let mut sink = MemorySink::new();
        let result = CaptureSession::new(&mut transport, &mut sink, 8).run();

        assert!(matches!(result, Err(TdsGrabError::Link(LinkError::Io(_)))));
        assert_eq!(sink.data(), b"PARTIAL");
        assert_eq!(sink.closes(), 1);
    }

    #[test]
    fn test_cancelled_before_first_read() {
        let mut transport = ScriptedTransport::new(Vec::new());
        let mut sink = MemorySink::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = CaptureSession::new(&mut transport, &mut sink, 8)
            .with_cancellation(cancel)
            .run()
            .unwrap();

        assert_eq!(outcome.status, CaptureStatus::Cancelled);
        assert_eq!(transport.probe().reads(), 0);
        assert_eq!(sink.closes(), 1);
    }

    #[test]
    fn test_events_follow_phases() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = ScriptedTransport::new(vec![Vec::new(), b"AB".to_vec(), b"CD".to_vec(), Vec::new()]);
        let mut sink = MemorySink::new();
        CaptureSession::new(&mut transport, &mut sink, 8)
            .with_events(tx)
            .run()
            .unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                CaptureEvent::Waiting,
                CaptureEvent::Receiving,
                CaptureEvent::Done { bytes: 4 },
            ]
        );
    }

    #[test]
    fn test_run_after_step_does_not_report_waiting() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = ScriptedTransport::new(vec![b"AB".to_vec(), Vec::new()]);
        let mut sink = MemorySink::new();
        let mut session = CaptureSession::new(&mut transport, &mut sink, 8).with_events(tx);

        assert_eq!(session.step().unwrap(), CaptureState::Receiving);
        let outcome = session.run().unwrap();
        assert!(outcome.is_complete());

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events, vec![CaptureEvent::Receiving, CaptureEvent::Done { bytes: 2 }]);
        assert_eq!(sink.closes(), 1);
    }
}
