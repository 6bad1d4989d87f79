use crate::cli::args::OutputFormat;
use crate::core::capture::{CaptureEvent, CaptureOutcome};
use crate::infrastructure::serial::PortEntry;
use std::path::Path;
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_event(&self, event: &CaptureEvent) -> Result<(), OutputError>;
    fn write_ports(&self, ports: &[PortEntry]) -> Result<(), OutputError>;
    fn write_summary(&self, outcome: &CaptureOutcome, destination: &Path) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_warning(&self, warning: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<OutputError> for crate::domain::error::TdsGrabError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
///
/// Everything goes to stdout, errors included; logs use stderr.
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn write_json_line(&self, value: &serde_json::Value) -> Result<(), OutputError> {
        println!("{}", serde_json::to_string(value)?);
        Ok(())
    }

    fn write_level(&self, level: &str, message: &str) -> Result<(), OutputError> {
        self.write_json_line(&serde_json::json!({
            "message": message,
            "level": level
        }))
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_event(&self, event: &CaptureEvent) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => self.write_json_line(&serde_json::to_value(event)?),
            _ => {
                println!("{}", event_line(event));
                Ok(())
            }
        }
    }

    fn write_ports(&self, ports: &[PortEntry]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                println!("Available ports:");
                for port in ports {
                    if port.description.is_empty() {
                        println!("  {}", port.name);
                    } else {
                        println!("  {}  {}", port.name, port.description);
                    }
                }
            }
            OutputFormat::Json => {
                let output = serde_json::to_string_pretty(ports)?;
                println!("{}", output);
            }
            OutputFormat::Table => {
                if !ports.is_empty() {
                    let table_data: Vec<PortTableRow> = ports.iter().map(PortTableRow::from).collect();
                    let table = Table::new(table_data);
                    println!("{}", table);
                }
            }
        }
        Ok(())
    }

    fn write_summary(&self, outcome: &CaptureOutcome, destination: &Path) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => self.write_json_line(&serde_json::json!({
                "event": "summary",
                "destination": destination.display().to_string(),
                "status": outcome.status,
                "stats": outcome.stats,
            })),
            _ => {
                println!("Data written to '{}'", destination.display());
                Ok(())
            }
        }
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => self.write_level("info", message),
            _ => {
                println!("{}", message);
                Ok(())
            }
        }
    }

    fn write_warning(&self, warning: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => self.write_level("warn", warning),
            _ => {
                println!("Warning: {}", warning);
                Ok(())
            }
        }
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => self.write_level("error", error),
            _ => {
                println!("Error: {}", error);
                Ok(())
            }
        }
    }
}

/// Status line for a phase transition
pub fn event_line(event: &CaptureEvent) -> String {
    match event {
        CaptureEvent::Connected { device } => format!("Connected to {}", device),
        CaptureEvent::Waiting => "Waiting for data".to_string(),
        CaptureEvent::Receiving => "Receiving data".to_string(),
        CaptureEvent::Done { bytes } => format!("Transfer complete, {} bytes received", bytes),
        CaptureEvent::Cancelled { bytes } => format!("Capture interrupted after {} bytes", bytes),
        CaptureEvent::Disconnected { device } => format!("Disconnected from {}", device),
    }
}

#[derive(Tabled)]
struct PortTableRow {
    #[tabled(rename = "Port")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&PortEntry> for PortTableRow {
    fn from(port: &PortEntry) -> Self {
        Self {
            name: port.name.clone(),
            kind: port.kind.clone(),
            description: port.description.clone(),
        }
    }
}
