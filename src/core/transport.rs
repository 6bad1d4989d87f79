use crate::domain::{config::LinkConfig, error::LinkError};

/// Bytes returned by one bounded read. Empty means the read timed out.
pub type Chunk = Vec<u8>;

/// Byte-oriented, block-read connection to an instrument
///
/// Implementations hide the platform serial API behind a uniform
/// blocking-read-with-timeout primitive. A timeout is not an error: it is
/// reported as an empty chunk, which is what the capture session keys off.
pub trait Transport: Send {
    /// Identifier of the underlying device
    fn device(&self) -> &str;

    /// Whether the handle is still held
    fn is_open(&self) -> bool;

    /// Discard whatever the driver buffered before the capture began
    fn flush_input(&mut self) -> Result<(), LinkError>;

    /// Block until at least one byte arrives or the read timeout elapses.
    /// Returns at most `max_bytes` bytes, or an empty chunk on timeout.
    fn read(&mut self, max_bytes: usize) -> Result<Chunk, LinkError>;

    /// Release the handle. Safe to call on a closed transport.
    fn close(&mut self);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn device(&self) -> &str {
        (**self).device()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn flush_input(&mut self) -> Result<(), LinkError> {
        (**self).flush_input()
    }

    fn read(&mut self, max_bytes: usize) -> Result<Chunk, LinkError> {
        (**self).read(max_bytes)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn device(&self) -> &str {
        (**self).device()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn flush_input(&mut self) -> Result<(), LinkError> {
        (**self).flush_input()
    }

    fn read(&mut self, max_bytes: usize) -> Result<Chunk, LinkError> {
        (**self).read(max_bytes)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Opens transports from link parameters
pub trait Connector {
    type Transport: Transport;

    fn open(&self, config: &LinkConfig) -> Result<Self::Transport, LinkError>;
}

impl<F, T> Connector for F
where
    F: Fn(&LinkConfig) -> Result<T, LinkError>,
    T: Transport,
{
    type Transport = T;

    fn open(&self, config: &LinkConfig) -> Result<T, LinkError> {
        self(config)
    }
}
