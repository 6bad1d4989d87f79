// Serial module - OS serial port binding
pub mod ports;
pub mod transport;

pub use ports::{available_ports, PortEntry};
pub use transport::SerialTransport;
