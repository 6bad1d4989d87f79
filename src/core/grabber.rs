use crate::core::capture::{CaptureEvent, CaptureOutcome, CaptureSession};
use crate::core::sink::Sink;
use crate::core::transport::{Connector, Transport};
use crate::domain::{config::LinkConfig, error::{LinkError, SinkError, TdsGrabResult}};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Owns a connected transport for the duration of one image capture
///
/// The transport is released on every exit path: explicitly through
/// [`Grabber::disconnect`], or on drop.
pub struct Grabber<T: Transport> {
    transport: T,
    read_size: usize,
    cancel: CancellationToken,
    events: Option<mpsc::UnboundedSender<CaptureEvent>>,
}

impl<T: Transport> Grabber<T> {
    /// Validate `config` and open the device through `connector`
    pub fn connect<C>(connector: &C, config: &LinkConfig) -> Result<Self, LinkError>
    where
        C: Connector<Transport = T>,
    {
        config.validate()?;

        debug!("Connecting to {} at {} baud", config.device, config.baud_rate);
        let transport = connector.open(config)?;
        info!("Connected to {}", transport.device());

        Ok(Self {
            transport,
            read_size: config.read_size,
            cancel: CancellationToken::new(),
            events: None,
        })
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Report phase transitions on `events`, starting with the connection
    pub fn with_events(mut self, events: mpsc::UnboundedSender<CaptureEvent>) -> Self {
        self.events = Some(events);
        self.emit(CaptureEvent::Connected {
            device: self.transport.device().to_string(),
        });
        self
    }

    /// Wait for one transfer and stream it into the sink produced by `open_sink`
    ///
    /// Stale input is flushed before the sink is opened, so a destination
    /// file is only created once the device is known to be usable. The
    /// grabber is consumed: one connection carries one transfer, and the
    /// device is released before this returns.
    pub fn grab_image<S, F>(mut self, open_sink: F) -> TdsGrabResult<CaptureOutcome>
    where
        S: Sink,
        F: FnOnce() -> Result<S, SinkError>,
    {
        self.transport.flush_input()?;
        let mut sink = open_sink()?;

        let outcome = {
            let mut session = CaptureSession::new(&mut self.transport, &mut sink, self.read_size)
                .with_cancellation(self.cancel.clone());
            if let Some(events) = &self.events {
                session = session.with_events(events.clone());
            }
            session.run()
        };
        self.disconnect();
        outcome
    }

    /// Release the device. Calling this on a closed transport does nothing.
    pub fn disconnect(&mut self) {
        if !self.transport.is_open() {
            return;
        }
        self.transport.close();
        info!("Disconnected from {}", self.transport.device());
        self.emit(CaptureEvent::Disconnected {
            device: self.transport.device().to_string(),
        });
    }

    fn emit(&self, event: CaptureEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

impl<T: Transport> Drop for Grabber<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Connect, capture one image and disconnect, whatever the outcome
pub fn run_capture<C, S, F>(
    connector: &C,
    config: &LinkConfig,
    open_sink: F,
    cancel: CancellationToken,
    events: Option<mpsc::UnboundedSender<CaptureEvent>>,
) -> TdsGrabResult<CaptureOutcome>
where
    C: Connector,
    S: Sink,
    F: FnOnce() -> Result<S, SinkError>,
{
    let mut grabber = Grabber::connect(connector, config)?.with_cancellation(cancel);
    if let Some(events) = events {
        grabber = grabber.with_events(events);
    }

    grabber.grab_image(open_sink)
}
