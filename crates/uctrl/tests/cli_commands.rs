#![cfg(all(unix, feature = "cli"))]

use std::io::{Read, Write};
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::process::Command;
use std::thread::{self, JoinHandle};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/uctrl-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// Accept one host connection and answer like a small firmware console.
/// Returns every command received, in order.
fn spawn_device(listener: UnixListener, help: &'static [u8]) -> JoinHandle<Vec<String>> {
    thread::spawn(move || {
        let (mut conn, _) = listener.accept().expect("device should accept");
        let mut received = Vec::new();
        let mut buf = [0u8; 256];
        loop {
            let n = match conn.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            let command = String::from_utf8_lossy(&buf[..n]).to_string();
            let reply: &[u8] = match command.as_str() {
                "help" => help,
                "get led" => b"on\n",
                _ => b"",
            };
            if !reply.is_empty() {
                let _ = conn.write_all(reply);
            }
            received.push(command);
        }
        received
    })
}

fn uctrl() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_uctrl"));
    cmd.env_remove("UCTRL_SETTLE")
        .env_remove("UCTRL_BAUD")
        .env_remove("UCTRL_TRANSPORT")
        .env_remove("UCTRL_LOG_LEVEL");
    cmd
}

#[test]
fn get_prints_device_response_as_json() {
    let dir = unique_temp_dir("get");
    let sock_path = dir.join("device.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");
    let device = spawn_device(listener, b"help get set exit\n");

    let output = uctrl()
        .arg("--format")
        .arg("json")
        .arg("get")
        .arg(&sock_path)
        .arg("get led")
        .arg("--transport")
        .arg("socket")
        .arg("--settle")
        .arg("200ms")
        .output()
        .expect("get should run");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("get should emit json");
    assert_eq!(payload["command"], "get led");
    assert_eq!(payload["text"], "on\n");
    assert_eq!(payload["size"], 3);

    let received = device.join().expect("device thread should finish");
    assert_eq!(received, vec!["help".to_string(), "get led".to_string()]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn set_writes_command_verbatim() {
    let dir = unique_temp_dir("set");
    let sock_path = dir.join("device.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");
    let device = spawn_device(listener, b"help get set exit\n");

    let output = uctrl()
        .arg("set")
        .arg(&sock_path)
        .arg("set led on")
        .arg("--transport")
        .arg("socket")
        .arg("--settle")
        .arg("200ms")
        .output()
        .expect("set should run");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let received = device.join().expect("device thread should finish");
    assert_eq!(received, vec!["help".to_string(), "set led on".to_string()]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn probe_reports_alive_device() {
    let dir = unique_temp_dir("probe-ok");
    let sock_path = dir.join("device.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");
    let device = spawn_device(listener, b"help get set exit\n");

    let output = uctrl()
        .arg("--format")
        .arg("json")
        .arg("probe")
        .arg(&sock_path)
        .arg("--transport")
        .arg("socket")
        .arg("--settle")
        .arg("200ms")
        .output()
        .expect("probe should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"alive\":true"), "stdout: {stdout}");

    device.join().expect("device thread should finish");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn probe_unresponsive_device_returns_30_and_warns() {
    let dir = unique_temp_dir("probe-bad");
    let sock_path = dir.join("device.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");
    let device = spawn_device(listener, b"ERROR unknown cmd\n");

    let output = uctrl()
        .arg("--format")
        .arg("json")
        .arg("probe")
        .arg(&sock_path)
        .arg("--transport")
        .arg("socket")
        .arg("--settle")
        .arg("200ms")
        .output()
        .expect("probe should run");

    assert_eq!(output.status.code(), Some(30));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"alive\":false"), "stdout: {stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot reach microcontroller"), "stderr: {stderr}");

    device.join().expect("device thread should finish");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_socket_fails_without_panic() {
    let dir = unique_temp_dir("missing");
    let output = uctrl()
        .arg("probe")
        .arg(dir.join("nothing.sock"))
        .arg("--transport")
        .arg("socket")
        .output()
        .expect("probe should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("connect failed"), "stderr: {stderr}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_serial_port_fails() {
    let output = uctrl()
        .arg("get")
        .arg("/dev/uctrl-no-such-port")
        .arg("help")
        .output()
        .expect("get should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open failed"), "stderr: {stderr}");
}

#[test]
fn version_prints_package_version() {
    let output = uctrl().arg("version").output().expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("uctrl {}", env!("CARGO_PKG_VERSION")));
}
