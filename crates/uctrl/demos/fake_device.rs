//! Fake device console on a Unix socket, for trying the CLI without hardware.
//!
//! Run with:
//!   cargo run --example fake-device -- /tmp/uctrl-fake.sock
//!
//! In another terminal:
//!   cargo run --features cli -- probe /tmp/uctrl-fake.sock --transport socket --settle 200ms

#[cfg(unix)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::io::{Read, Write};
    use std::os::unix::net::UnixListener;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/uctrl-fake.sock".to_string());
    let _ = std::fs::remove_file(&path);

    let listener = UnixListener::bind(&path)?;
    eprintln!("Listening on {path}");

    for conn in listener.incoming() {
        let mut conn = conn?;
        eprintln!("Host connected");
        let mut buf = [0u8; 256];
        let mut led = "off".to_string();
        loop {
            let n = conn.read(&mut buf)?;
            if n == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf[..n]).trim().to_string();
            eprintln!("< {line}");
            let reply = match line.split_whitespace().collect::<Vec<_>>().as_slice() {
                ["help"] => "help get set exit\n".to_string(),
                ["set", "led", state] => {
                    led = state.to_string();
                    String::new()
                }
                ["get", "led"] => format!("{led}\n"),
                _ => format!("ERROR unknown cmd: {line}\n"),
            };
            conn.write_all(reply.as_bytes())?;
        }
        eprintln!("Host disconnected");
    }

    Ok(())
}

#[cfg(not(unix))]
fn main() {
    eprintln!("fake-device needs Unix domain sockets");
}
