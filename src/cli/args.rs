use crate::domain::config::{FlowControl, LinkConfig, LinkDefaults};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

const AFTER_HELP: &str = "\
additional information:
  BAUD is expected to be one of the following:
     300, 600, 1200, 2400, 4800, 9600, 19200
  A nonstandard baud rate will produce a warning

  FLOW is expected to be one of the following:
     hw                 hardware flow control
     sw                 software flow control
     both               hardware and software (unsupported, passed to the driver)
     none               no flow control

  Start the transfer from the instrument once 'Waiting for data' is shown.
  The capture ends after TIMEOUT milliseconds without a byte.";

/// Command line arguments for TDSGrab
#[derive(Parser, Debug)]
#[command(
    name = "tdsgrab",
    about = "Download images from Tektronix TDS oscilloscopes over an RS-232 link",
    long_about = "Waits for the instrument to push a hardcopy over the serial link and writes the received bytes, unmodified, to FILENAME.",
    after_help = AFTER_HELP
)]
pub struct Args {
    /// File to write the captured image to
    #[arg(required_unless_present_any = ["list", "version"])]
    pub filename: Option<PathBuf>,

    /// Serial device to connect to [default: /dev/ttyS0, COM1 on Windows]
    #[arg(short, long)]
    pub port: Option<String>,

    /// Baud rate for the connection [default: 9600]
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// Flow control method [default: hw]
    #[arg(short, long, value_enum)]
    pub flow: Option<FlowArg>,

    /// Idle time in milliseconds that marks the end of a transfer [default: 250]
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// List available serial ports and exit
    #[arg(short, long)]
    pub list: bool,

    /// Print version information and exit
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Disable logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

impl Args {
    /// Link parameters from the flags, falling back to `defaults`
    pub fn link_config(&self, defaults: &LinkDefaults) -> LinkConfig {
        let mut config = LinkConfig::from(defaults);
        if let Some(port) = &self.port {
            config.device = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(flow) = self.flow.clone() {
            config = config.with_flow_control(flow.into());
        }
        if let Some(timeout) = self.timeout {
            config = config.with_read_timeout(Duration::from_millis(timeout));
        }
        config
    }
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable status lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Tables where a listing is printed
    Table,
}

/// Flow control configuration argument
#[derive(ValueEnum, Debug, Clone, PartialEq, Eq)]
pub enum FlowArg {
    #[value(name = "hw")]
    Hardware,
    #[value(name = "sw")]
    Software,
    #[value(name = "both")]
    Both,
    #[value(name = "none")]
    None,
}

impl From<FlowArg> for FlowControl {
    fn from(flow: FlowArg) -> Self {
        match flow {
            FlowArg::Hardware => Self::Hardware,
            FlowArg::Software => Self::Software,
            FlowArg::Both => Self::Both,
            FlowArg::None => Self::None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_required_for_capture() {
        assert!(Args::try_parse_from(["tdsgrab"]).is_err());
        assert!(Args::try_parse_from(["tdsgrab", "-l"]).is_ok());
        assert!(Args::try_parse_from(["tdsgrab", "-v"]).is_ok());
    }

    #[test]
    fn test_defaults_come_from_config() {
        let args = Args::try_parse_from(["tdsgrab", "screen.bmp"]).unwrap();
        let config = args.link_config(&LinkDefaults::default());

        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.flow_control(), FlowControl::Hardware);
        assert_eq!(config.read_timeout, Duration::from_millis(250));
        assert_eq!(config.read_size, 8);
        assert_eq!(args.output, OutputFormat::Text);
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "tdsgrab", "-p", "/dev/ttyUSB0", "-b", "19200", "-f", "none", "-t", "1000", "out.bin",
        ])
        .unwrap();
        let config = args.link_config(&LinkDefaults::default());

        assert_eq!(config.device, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 19200);
        assert!(!config.hardware_flow && !config.software_flow);
        assert_eq!(config.read_timeout, Duration::from_millis(1000));
        assert_eq!(args.filename, Some(PathBuf::from("out.bin")));
    }

    #[test]
    fn test_both_flow_is_accepted() {
        let args = Args::try_parse_from(["tdsgrab", "--flow", "both", "out.bin"]).unwrap();
        let config = args.link_config(&LinkDefaults::default());
        assert!(config.hardware_flow && config.software_flow);
    }

    #[test]
    fn test_non_standard_baud_is_accepted() {
        let args = Args::try_parse_from(["tdsgrab", "--baud", "115200", "out.bin"]).unwrap();
        assert!(!args.link_config(&LinkDefaults::default()).is_standard_baud());
    }

    #[test]
    fn test_unknown_flow_is_rejected() {
        assert!(Args::try_parse_from(["tdsgrab", "-f", "rts", "out.bin"]).is_err());
    }
}
