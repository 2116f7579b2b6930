use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

use crate::config::ReceiverConfig;
use crate::error::{AvrError, Result};
use crate::state::StateCache;
use crate::transport::TelnetTransport;

/// Longest status line the reader buffers; receivers send well under 100 bytes
const MAX_LINE_LEN: usize = 512;

#[derive(Debug, PartialEq, Eq)]
enum Line {
    /// A line, with its `\r` unless the peer closed mid-line
    Complete,
    /// A line over [`MAX_LINE_LEN`] was read to its end and dropped
    Oversized,
    Eof,
}

/// Read one `\r`-terminated line into `buf`, never buffering more than [`MAX_LINE_LEN`] bytes
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Line>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let limit = MAX_LINE_LEN as u64;
    let n = (&mut *reader).take(limit).read_until(b'\r', buf).await?;
    if n == 0 {
        return Ok(Line::Eof);
    }
    if buf.last() == Some(&b'\r') || n < MAX_LINE_LEN {
        return Ok(Line::Complete);
    }

    loop {
        buf.clear();
        let n = (&mut *reader).take(limit).read_until(b'\r', buf).await?;
        if n == 0 || buf.last() == Some(&b'\r') {
            buf.clear();
            return Ok(Line::Oversized);
        }
    }
}

/// Telnet session to one receiver
///
/// A background task reads `\r`-terminated status lines and feeds them into
/// the session's [`StateCache`]. Writes go through an async mutex so only one
/// command batch is on the wire at a time; a slow write never stalls the
/// reader.
pub struct TelnetSession {
    host: String,
    writer: Mutex<OwnedWriteHalf>,
    connected: Arc<AtomicBool>,
    healthy: Arc<AtomicBool>,
    reader: parking_lot::Mutex<Option<JoinHandle<()>>>,
    write_timeout: Duration,
    command_spacing: Duration,
}

impl TelnetSession {
    /// Connect to `host:port` and start ingesting status lines into `cache`
    pub async fn connect(
        host: &str,
        port: u16,
        cache: Arc<StateCache>,
        config: &ReceiverConfig,
    ) -> Result<Self> {
        tracing::info!("Connecting to telnet {}:{}", host, port);

        let stream = timeout(config.request_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| AvrError::Timeout)??;
        stream.set_nodelay(true)?;
        let (read, write) = stream.into_split();

        let connected = Arc::new(AtomicBool::new(true));
        let healthy = Arc::new(AtomicBool::new(true));

        let connected_clone = connected.clone();
        let healthy_clone = healthy.clone();
        let host_clone = host.to_string();
        let reader = tokio::spawn(async move {
            let mut reader = BufReader::new(read);
            let mut buf = Vec::new();
            loop {
                match read_line(&mut reader, &mut buf).await {
                    Ok(Line::Eof) => {
                        tracing::info!("Telnet connection to {} closed", host_clone);
                        break;
                    }
                    Ok(Line::Oversized) => {
                        tracing::warn!(
                            "Dropped line from {} longer than {} bytes",
                            host_clone,
                            MAX_LINE_LEN
                        );
                    }
                    Ok(Line::Complete) => {
                        let line = String::from_utf8_lossy(&buf);
                        let line = line.trim_end_matches('\r');
                        tracing::trace!("Received: {}", line);
                        if let Some(update) = cache.ingest_line(line) {
                            tracing::debug!(
                                "{} {} = {}",
                                update.zone,
                                update.param,
                                update.value
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!("Telnet read error from {}: {}", host_clone, e);
                        healthy_clone.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            }
            connected_clone.store(false, Ordering::SeqCst);
        });

        Ok(Self {
            host: host.to_string(),
            writer: Mutex::new(write),
            connected,
            healthy,
            reader: parking_lot::Mutex::new(Some(reader)),
            write_timeout: config.request_timeout,
            command_spacing: config.command_spacing,
        })
    }

    /// Host the session is connected to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Stop the reader task; the session reports disconnected afterwards
    pub fn shutdown(&self) {
        if let Some(handle) = self.reader.lock().take() {
            handle.abort();
            tracing::debug!("Telnet session to {} shut down", self.host);
        }
        self.connected.store(false, Ordering::SeqCst);
    }
}

impl Drop for TelnetSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[async_trait]
impl TelnetTransport for TelnetSession {
    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    async fn send_commands(&self, commands: &[String]) -> Result<()> {
        if !self.connected() {
            return Err(AvrError::ConnectionClosed);
        }

        let mut writer = self.writer.lock().await;
        for (i, command) in commands.iter().enumerate() {
            if i > 0 {
                sleep(self.command_spacing).await;
            }
            tracing::debug!("Sending: {}", command);

            let line = format!("{}\r", command);
            match timeout(self.write_timeout, writer.write_all(line.as_bytes())).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.healthy.store(false, Ordering::SeqCst);
                    return Err(e.into());
                }
                Err(_) => {
                    self.healthy.store(false, Ordering::SeqCst);
                    return Err(AvrError::Timeout);
                }
            }
        }
        Ok(())
    }
}
