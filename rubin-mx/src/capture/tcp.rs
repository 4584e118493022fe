use super::{decode_interleaved_f32, AudioClient, CaptureError};
use crate::analysis::AudioBuffer;
use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long a capture waits for a sender and then for each read
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on the body buffer reserved up front from the peer's header
const MAX_PREALLOC: usize = 1 << 20;

const ACCEPT_POLL: Duration = Duration::from_millis(10);

/// Receives one length-prefixed PCM block per capture
///
/// Wire format: a 4-byte big-endian `u32` byte count, then that many bytes
/// of interleaved little-endian f32 stereo. The listener is bound on first
/// use and kept for later captures. The requested duration is not enforced;
/// the sender decides how much audio to send.
pub struct TcpAudioClient {
    address: String,
    timeout: Duration,
    listener: Mutex<Option<TcpListener>>,
}

impl TcpAudioClient {
    /// Client that binds `host:port` lazily
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            address: format!("{}:{}", host, port),
            timeout: DEFAULT_TIMEOUT,
            listener: Mutex::new(None),
        }
    }

    /// Bind immediately; port 0 picks a free port
    pub fn bind(host: &str, port: u16) -> io::Result<Self> {
        let client = Self::new(host, port);
        let listener = TcpListener::bind(&client.address)?;
        info!("Capture listener bound on {}", listener.local_addr()?);
        *client.lock()? = Some(listener);
        Ok(client)
    }

    /// Limit on waiting for a sender and on each read from it
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Address of the bound listener, if bound
    pub fn local_addr(&self) -> io::Result<Option<SocketAddr>> {
        self.lock()?.as_ref().map(TcpListener::local_addr).transpose()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Option<TcpListener>>> {
        self.listener
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "capture listener lock poisoned"))
    }

    /// Wait up to the timeout for one sender
    fn accept(&self, listener: &TcpListener) -> Result<(TcpStream, SocketAddr), CaptureError> {
        listener.set_nonblocking(true)?;
        let deadline = Instant::now() + self.timeout;

        loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    stream.set_nonblocking(false)?;
                    stream.set_read_timeout(Some(self.timeout))?;
                    return Ok((stream, peer));
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        warn!(timeout = ?self.timeout, "No capture sender connected");
                        return Err(CaptureError::NoData("tcp"));
                    }
                    thread::sleep(ACCEPT_POLL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

impl AudioClient for TcpAudioClient {
    fn name(&self) -> &'static str {
        "tcp"
    }

    fn capture(&self, _duration: f64, _sample_rate: u32) -> Result<AudioBuffer, CaptureError> {
        let mut guard = self.lock()?;
        if guard.is_none() {
            let listener = TcpListener::bind(&self.address)?;
            info!("Capture listener bound on {}", listener.local_addr()?);
            *guard = Some(listener);
        }
        let listener = guard
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "listener not bound"))?;

        let (mut stream, peer) = self.accept(listener)?;
        debug!(%peer, "Capture connection accepted");

        let mut header = [0u8; 4];
        stream.read_exact(&mut header).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                CaptureError::Truncated("connection closed before header received".to_string())
            }
            _ if is_timeout(&e) => CaptureError::Truncated("timed out waiting for header".to_string()),
            _ => CaptureError::Io(e),
        })?;
        let num_bytes = u32::from_be_bytes(header);

        let mut raw = Vec::with_capacity((num_bytes as usize).min(MAX_PREALLOC));
        stream
            .take(num_bytes as u64)
            .read_to_end(&mut raw)
            .map_err(|e| {
                if is_timeout(&e) {
                    CaptureError::Truncated(format!("timed out after {} of {} bytes", raw.len(), num_bytes))
                } else {
                    CaptureError::Io(e)
                }
            })?;
        if raw.len() < num_bytes as usize {
            debug!(expected = num_bytes, received = raw.len(), "Capture body ended early");
        }

        Ok(AudioBuffer::from_interleaved_stereo(&decode_interleaved_f32(&raw))?)
    }
}
