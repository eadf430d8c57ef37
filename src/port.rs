use crate::Result;
use serialport::SerialPortType;

/// Metadata for one enumerated serial device; consumed during selection
/// and never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    pub path: String,
    pub description: String,
}

/// Enumerate serial ports and return the first one that looks like an
/// attached USB device. `Ok(None)` when nothing matches; enumeration
/// failures propagate.
pub fn detect_serial_port() -> Result<Option<String>> {
    Ok(select_port(&list_ports()?))
}

/// All currently visible ports with a human-readable description, in OS
/// enumeration order.
pub fn list_ports() -> Result<Vec<PortCandidate>> {
    let ports = serialport::available_ports()?;
    Ok(ports
        .into_iter()
        .map(|info| PortCandidate {
            description: describe(&info.port_type),
            path: info.port_name,
        })
        .collect())
}

/// First candidate whose description contains "usb" or "com"
/// case-insensitively, preserving enumeration order.
pub fn select_port(candidates: &[PortCandidate]) -> Option<String> {
    candidates
        .iter()
        .find(|candidate| {
            let description = candidate.description.to_ascii_lowercase();
            description.contains("usb") || description.contains("com")
        })
        .map(|candidate| candidate.path.clone())
}

fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => usb
            .product
            .clone()
            .unwrap_or_else(|| "USB serial device".to_string()),
        SerialPortType::PciPort => "PCI serial device".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth serial device".to_string(),
        SerialPortType::Unknown => "Unknown serial device".to_string(),
    }
}
