use crate::domain::error::SinkError;

/// Destination for captured bytes, written in arrival order
pub trait Sink {
    fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), SinkError>;

    /// Make everything written so far durable. Closing twice is a no-op.
    fn close(&mut self) -> Result<(), SinkError>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        (**self).write_chunk(chunk)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        (**self).close()
    }
}
