use crate::domain::error::LinkError;
use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};

/// A serial port reported by the operating system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortEntry {
    pub name: String,
    pub kind: String,
    pub description: String,
}

impl From<SerialPortInfo> for PortEntry {
    fn from(info: SerialPortInfo) -> Self {
        let (kind, description) = match info.port_type {
            SerialPortType::UsbPort(usb) => {
                let product = usb.product.unwrap_or_default();
                let description = match usb.manufacturer {
                    Some(manufacturer) if !product.is_empty() => format!("{} {}", manufacturer, product),
                    Some(manufacturer) => manufacturer,
                    None => product,
                };
                ("usb", format!("{} [{:04x}:{:04x}]", description, usb.vid, usb.pid).trim().to_string())
            }
            SerialPortType::PciPort => ("pci", String::new()),
            SerialPortType::BluetoothPort => ("bluetooth", String::new()),
            SerialPortType::Unknown => ("unknown", String::new()),
        };

        Self {
            name: info.port_name,
            kind: kind.to_string(),
            description,
        }
    }
}

/// Enumerate serial ports without opening any of them
pub fn available_ports() -> Result<Vec<PortEntry>, LinkError> {
    let mut ports: Vec<PortEntry> = serialport::available_ports()
        .map_err(|e| LinkError::Enumeration(e.to_string()))?
        .into_iter()
        .map(PortEntry::from)
        .collect();
    ports.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_port_entry() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyS0".to_string(),
            port_type: SerialPortType::Unknown,
        };

        let entry = PortEntry::from(info);
        assert_eq!(entry.kind, "unknown");
        assert!(entry.description.is_empty());
    }
}
