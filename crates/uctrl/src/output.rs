use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use uctrl_channel::Response;
use uctrl_transport::PortSummary;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ResponseOutput<'a> {
    device: &'a str,
    command: &'a str,
    size: usize,
    text: String,
}

pub fn print_response(device: &str, command: &str, response: &Response, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ResponseOutput {
                device,
                command,
                size: response.len(),
                text: response.text().into_owned(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DEVICE", "COMMAND", "SIZE", "RESPONSE"])
                .add_row(vec![
                    device.to_string(),
                    command.to_string(),
                    response.len().to_string(),
                    response.text().trim_end().to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}", response.text().trim_end());
        }
        OutputFormat::Raw => {
            print_raw(response.as_bytes());
        }
    }
}

#[derive(Serialize)]
struct ProbeOutput<'a> {
    device: &'a str,
    alive: bool,
}

pub fn print_probe(device: &str, alive: bool, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ProbeOutput { device, alive };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            let status = if alive { "alive" } else { "not responding" };
            println!("{device}: {status}");
        }
        OutputFormat::Raw => {
            println!("{alive}");
        }
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    port_type: &'a str,
    vid: Option<String>,
    pid: Option<String>,
    manufacturer: Option<&'a str>,
    product: Option<&'a str>,
    serial_number: Option<&'a str>,
}

impl<'a> From<&'a PortSummary> for PortOutput<'a> {
    fn from(port: &'a PortSummary) -> Self {
        Self {
            name: &port.name,
            port_type: port.port_type,
            vid: port.vid.map(hex_id),
            pid: port.pid.map(hex_id),
            manufacturer: port.manufacturer.as_deref(),
            product: port.product.as_deref(),
            serial_number: port.serial_number.as_deref(),
        }
    }
}

pub fn print_ports(ports: &[PortSummary], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<PortOutput<'_>> = ports.iter().map(PortOutput::from).collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "TYPE", "VID:PID", "PRODUCT"]);
            for port in ports {
                let ids = match (port.vid, port.pid) {
                    (Some(vid), Some(pid)) => format!("{}:{}", hex_id(vid), hex_id(pid)),
                    _ => "-".to_string(),
                };
                table.add_row(vec![
                    port.name.clone(),
                    port.port_type.to_string(),
                    ids,
                    port.product.clone().unwrap_or_else(|| "-".to_string()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for port in ports {
                println!("{}", port.name);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn hex_id(id: u16) -> String {
    format!("{id:04x}")
}
