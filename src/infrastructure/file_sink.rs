use crate::core::sink::Sink;
use crate::domain::error::SinkError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Capture destination backed by a file
///
/// The file is truncated on creation and receives the captured bytes
/// unmodified. Whatever was written before an error stays on disk.
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    bytes_written: u64,
}

impl FileSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| SinkError::Open {
            path: path.clone(),
            source,
        })?;
        debug!("Opened {} for writing", path.display());

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            bytes_written: 0,
        })
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Sink for FileSink {
    fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            SinkError::Write(std::io::Error::new(std::io::ErrorKind::Other, "capture file already closed"))
        })?;
        writer.write_all(chunk).map_err(SinkError::Write)?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let file = writer.into_inner().map_err(|e| SinkError::Close(e.into_error()))?;
        file.sync_all().map_err(SinkError::Close)?;
        debug!("Closed {} after {} bytes", self.path.display(), self.bytes_written);
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                warn!("Failed to flush {}: {}", self.path.display(), e);
            }
        }
    }
}
