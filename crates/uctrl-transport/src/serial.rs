use std::io::{Read, Write};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use tracing::{debug, info};

use crate::endpoint::{Endpoint, OpenEndpoint, TransportKind};
use crate::error::{Result, TransportError};

/// Line settings for a serial port.
///
/// Defaults to 115200 8N1 without flow control, which is what most
/// microcontroller USB CDC and UART bridges expect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerialOptions {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Timeout for a single blocking read or write on the port.
    pub timeout: Duration,
}

impl SerialOptions {
    pub const DEFAULT_BAUD_RATE: u32 = 115_200;

    pub fn with_baud_rate(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

impl Default for SerialOptions {
    fn default() -> Self {
        Self {
            baud_rate: Self::DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: Duration::from_millis(100),
        }
    }
}

/// Serial port endpoint.
pub struct SerialEndpoint {
    name: String,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialEndpoint {
    /// Open `name` (e.g. `/dev/ttyACM0`, `COM3`) with the given line settings.
    pub fn open(name: &str, options: &SerialOptions) -> Result<Self> {
        let port = serialport::new(name, options.baud_rate)
            .data_bits(options.data_bits)
            .parity(options.parity)
            .stop_bits(options.stop_bits)
            .flow_control(options.flow_control)
            .timeout(options.timeout)
            .open()
            .map_err(|err| TransportError::Open {
                name: name.to_string(),
                source: err.into(),
            })?;

        info!(port = name, baud = options.baud_rate, "opened serial port");

        Ok(Self::from_port(name, port))
    }

    /// Wrap a port opened elsewhere.
    pub fn from_port(name: impl Into<String>, port: Box<dyn SerialPort>) -> Self {
        Self {
            name: name.into(),
            port: Some(port),
        }
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(TransportError::Closed)
    }
}

impl Endpoint for SerialEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Serial
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let port = self.port()?;
        port.write_all(bytes)?;
        port.flush()?;
        debug!(len = bytes.len(), "serial write");
        Ok(())
    }

    fn read_all(&mut self) -> Result<Vec<u8>> {
        let port = self.port()?;
        let available = port.bytes_to_read()? as usize;
        let mut buf = vec![0u8; available];
        if available > 0 {
            port.read_exact(&mut buf)?;
        }
        debug!(len = available, "serial read");
        Ok(buf)
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            debug!(port = %self.name, "closed serial port");
        }
        Ok(())
    }
}

impl OpenEndpoint for SerialEndpoint {
    type Options = SerialOptions;

    fn open(name: &str, options: &SerialOptions) -> Result<Self> {
        SerialEndpoint::open(name, options)
    }
}

impl std::fmt::Debug for SerialEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialEndpoint")
            .field("name", &self.name)
            .field("open", &self.port.is_some())
            .finish()
    }
}

/// A serial port found on the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortSummary {
    pub name: String,
    /// `usb`, `pci`, `bluetooth` or `unknown`.
    pub port_type: &'static str,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
}

impl From<serialport::SerialPortInfo> for PortSummary {
    fn from(info: serialport::SerialPortInfo) -> Self {
        let mut summary = PortSummary {
            name: info.port_name,
            port_type: "unknown",
            vid: None,
            pid: None,
            manufacturer: None,
            product: None,
            serial_number: None,
        };
        match info.port_type {
            SerialPortType::UsbPort(usb) => {
                summary.port_type = "usb";
                summary.vid = Some(usb.vid);
                summary.pid = Some(usb.pid);
                summary.manufacturer = usb.manufacturer;
                summary.product = usb.product;
                summary.serial_number = usb.serial_number;
            }
            SerialPortType::PciPort => summary.port_type = "pci",
            SerialPortType::BluetoothPort => summary.port_type = "bluetooth",
            SerialPortType::Unknown => {}
        }
        summary
    }
}

/// List serial ports present on the host.
pub fn available_ports() -> Result<Vec<PortSummary>> {
    let ports = serialport::available_ports()?;
    Ok(ports.into_iter().map(PortSummary::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_8n1() {
        let options = SerialOptions::default();
        assert_eq!(options.baud_rate, 115_200);
        assert_eq!(options.data_bits, DataBits::Eight);
        assert_eq!(options.parity, Parity::None);
        assert_eq!(options.stop_bits, StopBits::One);
        assert_eq!(options.flow_control, FlowControl::None);
    }

    #[test]
    fn with_baud_rate_keeps_other_defaults() {
        let options = SerialOptions::with_baud_rate(9600);
        assert_eq!(options.baud_rate, 9600);
        assert_eq!(options.timeout, SerialOptions::default().timeout);
    }

    #[test]
    fn open_missing_port_fails() {
        let result = SerialEndpoint::open("/dev/uctrl-does-not-exist", &SerialOptions::default());
        assert!(matches!(result, Err(TransportError::Open { .. })));
    }

    #[test]
    fn open_boxed_missing_port_fails() {
        let result = crate::endpoint::open_boxed::<SerialEndpoint>(
            "/dev/uctrl-does-not-exist",
            &SerialOptions::with_baud_rate(9600),
        );
        assert!(matches!(result, Err(TransportError::Open { .. })));
    }

    #[test]
    fn usb_port_summary() {
        let info = serialport::SerialPortInfo {
            port_name: "/dev/ttyACM0".to_string(),
            port_type: SerialPortType::UsbPort(serialport::UsbPortInfo {
                vid: 0x2e8a,
                pid: 0x000a,
                serial_number: Some("E660".to_string()),
                manufacturer: Some("Raspberry Pi".to_string()),
                product: Some("Pico".to_string()),
            }),
        };
        let summary = PortSummary::from(info);
        assert_eq!(summary.port_type, "usb");
        assert_eq!(summary.vid, Some(0x2e8a));
        assert_eq!(summary.product.as_deref(), Some("Pico"));
    }
}
