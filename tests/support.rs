use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server that answers every request with 200.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

/// Like [`spawn_http_server`], but skips when the sandbox forbids sockets.
///
/// # Errors
///
/// Returns an error for any other listener failure.
pub fn spawn_http_server_or_skip() -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_http_server() {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn handle_client(mut stream: TcpStream) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let mut buffer = [0u8; 4096];
    if stream.read(&mut buffer).is_err() {
        return;
    }
    if stream
        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK")
        .is_err()
    {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn trafficgen_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_trafficgen").map_or_else(
        || Err("CARGO_BIN_EXE_trafficgen missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

fn command<I, S>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(trafficgen_bin()?);
    command
        .args(args)
        .env("TRAFFICGEN_LOG", "error")
        .env_remove("URL")
        .env_remove("CONCURRENT_REQUESTS")
        .env_remove("REPORT_INTERVAL");
    Ok(command)
}

/// Run the `trafficgen` binary to completion and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_trafficgen<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    command(args)?
        .output()
        .map_err(|err| format!("run trafficgen failed: {}", err))
}

/// Start the `trafficgen` binary in the background with piped output.
///
/// # Errors
///
/// Returns an error if the binary cannot be started.
pub fn spawn_trafficgen<I, S>(args: I) -> Result<Child, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    command(args)?
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| format!("spawn trafficgen failed: {}", err))
}

/// Wait for the child to exit, killing it after `limit`.
///
/// # Errors
///
/// Returns an error if the child does not exit in time or cannot be polled.
pub fn wait_with_limit(mut child: Child, limit: Duration) -> Result<Output, String> {
    let deadline = Instant::now()
        .checked_add(limit)
        .ok_or_else(|| "deadline overflow".to_owned())?;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => {
                return child
                    .wait_with_output()
                    .map_err(|err| format!("collect output failed: {}", err));
            }
            Ok(None) if Instant::now() >= deadline => {
                drop(child.kill());
                drop(child.wait());
                return Err(format!("trafficgen did not exit within {:?}", limit));
            }
            Ok(None) => thread::sleep(Duration::from_millis(50)),
            Err(err) => return Err(format!("try_wait failed: {}", err)),
        }
    }
}
