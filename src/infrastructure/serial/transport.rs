use crate::core::transport::{Chunk, Transport};
use crate::domain::{config::LinkConfig, error::LinkError};
use serialport::{ClearBuffer, SerialPort};
use std::io::{self, Read};
use tracing::{debug, info, warn};

/// Transport over an OS serial port
pub struct SerialTransport {
    device: String,
    port: Option<Box<dyn SerialPort>>,
    buffer: Vec<u8>,
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("device", &self.device)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl SerialTransport {
    /// Open and configure the device. Receive buffers are left as the driver has them.
    pub fn open(config: &LinkConfig) -> Result<Self, LinkError> {
        let builder = serialport::new(&config.device, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(flow_control(config))
            .timeout(config.read_timeout);

        let port = builder.open().map_err(|e| map_open_error(&config.device, e))?;

        info!(
            "Serial port {} opened at {} baud (flow control: {})",
            config.device,
            config.baud_rate,
            config.flow_control()
        );

        Ok(Self {
            device: config.device.clone(),
            port: Some(port),
            buffer: vec![0u8; config.read_size.max(1)],
        })
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>, LinkError> {
        self.port.as_mut().ok_or_else(|| {
            LinkError::Io(io::Error::new(io::ErrorKind::NotConnected, "serial port is closed"))
        })
    }
}

impl Transport for SerialTransport {
    fn device(&self) -> &str {
        &self.device
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn flush_input(&mut self) -> Result<(), LinkError> {
        let port = self.port_mut()?;
        port.clear(ClearBuffer::Input).map_err(|e| LinkError::Io(e.into()))?;
        debug!("Discarded pending input on {}", self.device);
        Ok(())
    }

    fn read(&mut self, max_bytes: usize) -> Result<Chunk, LinkError> {
        if self.buffer.len() < max_bytes {
            self.buffer.resize(max_bytes, 0);
        }
        let Some(port) = self.port.as_mut() else {
            return Err(LinkError::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "serial port is closed",
            )));
        };

        loop {
            match Read::read(&mut *port, &mut self.buffer[..max_bytes]) {
                Ok(n) => return Ok(self.buffer[..n].to_vec()),
                Err(ref e) if is_timeout(e) => return Ok(Vec::new()),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(LinkError::Io(e)),
            }
        }
    }

    fn close(&mut self) {
        if let Some(port) = self.port.take() {
            drop(port);
            debug!("Serial port {} closed", self.device);
        }
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// Serial stacks expose one flow mode at a time; with both requested,
/// hardware handshaking wins.
fn flow_control(config: &LinkConfig) -> serialport::FlowControl {
    match (config.hardware_flow, config.software_flow) {
        (true, true) => {
            warn!("Serial driver supports a single flow control mode, using hardware");
            serialport::FlowControl::Hardware
        }
        (true, false) => serialport::FlowControl::Hardware,
        (false, true) => serialport::FlowControl::Software,
        (false, false) => serialport::FlowControl::None,
    }
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(error.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

fn map_open_error(device: &str, error: serialport::Error) -> LinkError {
    match error.kind() {
        serialport::ErrorKind::InvalidInput => {
            LinkError::InvalidConfig(format!("{}: {}", device, error.description))
        }
        _ => LinkError::Unavailable {
            device: device.to_string(),
            reason: error.description,
        },
    }
}
