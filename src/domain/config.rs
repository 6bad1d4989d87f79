use crate::domain::error::LinkError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Baud rates the instruments document; anything else is accepted with a warning
pub const STANDARD_BAUD_RATES: [u32; 7] = [300, 600, 1200, 2400, 4800, 9600, 19200];

#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM1";
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyS0";

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_TIMEOUT_MS: u64 = 250;
pub const DEFAULT_READ_SIZE: usize = 8;

/// TDSGrab configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrabConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// Link defaults applied when the matching flag is absent
    #[serde(default)]
    pub link: LinkDefaults,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Default connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDefaults {
    /// Serial device path
    #[serde(default = "default_port")]
    pub port: String,
    /// Baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Flow control method
    #[serde(default)]
    pub flow: FlowControl,
    /// Idle timeout that ends a transfer, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum bytes requested per read
    #[serde(default = "default_read_size")]
    pub read_size: usize,
}

/// Flow control selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlowControl {
    #[default]
    #[serde(rename = "hw")]
    Hardware,
    #[serde(rename = "sw")]
    Software,
    /// Unsupported but not rejected; the serial driver decides what it means
    #[serde(rename = "both")]
    Both,
    #[serde(rename = "none")]
    None,
}

impl FlowControl {
    pub fn hardware(self) -> bool {
        matches!(self, FlowControl::Hardware | FlowControl::Both)
    }

    pub fn software(self) -> bool {
        matches!(self, FlowControl::Software | FlowControl::Both)
    }

    pub fn from_flags(hardware: bool, software: bool) -> Self {
        match (hardware, software) {
            (true, true) => FlowControl::Both,
            (true, false) => FlowControl::Hardware,
            (false, true) => FlowControl::Software,
            (false, false) => FlowControl::None,
        }
    }
}

impl std::fmt::Display for FlowControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowControl::Hardware => write!(f, "hw"),
            FlowControl::Software => write!(f, "sw"),
            FlowControl::Both => write!(f, "both"),
            FlowControl::None => write!(f, "none"),
        }
    }
}

/// Parameters of one serial connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub device: String,
    pub baud_rate: u32,
    pub hardware_flow: bool,
    pub software_flow: bool,
    /// Per-read timeout; one silent window of this length ends a transfer
    pub read_timeout: Duration,
    pub read_size: usize,
}

impl LinkConfig {
    pub fn new(device: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            device: device.into(),
            baud_rate,
            hardware_flow: true,
            software_flow: false,
            read_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            read_size: DEFAULT_READ_SIZE,
        }
    }

    pub fn with_flow_control(mut self, flow: FlowControl) -> Self {
        self.hardware_flow = flow.hardware();
        self.software_flow = flow.software();
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_read_size(mut self, read_size: usize) -> Self {
        self.read_size = read_size;
        self
    }

    pub fn flow_control(&self) -> FlowControl {
        FlowControl::from_flags(self.hardware_flow, self.software_flow)
    }

    pub fn is_standard_baud(&self) -> bool {
        STANDARD_BAUD_RATES.contains(&self.baud_rate)
    }

    /// Reject parameters no serial driver could honor. Both flow controls
    /// enabled at once passes through untouched.
    pub fn validate(&self) -> Result<(), LinkError> {
        if self.device.trim().is_empty() {
            return Err(LinkError::InvalidConfig("serial device must not be empty".to_string()));
        }
        if self.baud_rate == 0 {
            return Err(LinkError::InvalidConfig("baud rate must be positive".to_string()));
        }
        if self.read_timeout.is_zero() {
            return Err(LinkError::InvalidConfig("read timeout must be positive".to_string()));
        }
        if self.read_size == 0 {
            return Err(LinkError::InvalidConfig("read size must be positive".to_string()));
        }
        Ok(())
    }
}

impl From<&LinkDefaults> for LinkConfig {
    fn from(defaults: &LinkDefaults) -> Self {
        LinkConfig::new(defaults.port.clone(), defaults.baud_rate)
            .with_flow_control(defaults.flow)
            .with_read_timeout(Duration::from_millis(defaults.timeout_ms))
            .with_read_size(defaults.read_size)
    }
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_read_size() -> usize {
    DEFAULT_READ_SIZE
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for LinkDefaults {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            flow: FlowControl::default(),
            timeout_ms: default_timeout_ms(),
            read_size: default_read_size(),
        }
    }
}
