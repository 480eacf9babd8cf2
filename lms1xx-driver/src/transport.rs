use crate::constants::READ_CHUNK_SIZE;
use crate::error::Lms1xxError;
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Byte-oriented, ordered, reliable stream connection to the device.
pub trait Transport {
    /// Send raw bytes, failing if the connection is closed or the write fails.
    fn send(&mut self, data: &[u8]) -> Result<(), Lms1xxError>;

    /// Block until a byte equal to `end` has been read, and return everything
    /// up to and including it.
    fn receive_until(&mut self, end: u8) -> Result<Vec<u8>, Lms1xxError>;
}

/// TCP connection to the Ethernet interface of the device.
pub struct TcpTransport {
    stream: TcpStream,
    /// Bytes read past the last delimiter, kept for the next receive.
    pending: Vec<u8>,
}

impl TcpTransport {
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<TcpTransport, Lms1xxError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(TcpTransport {
            stream,
            pending: Vec::new(),
        })
    }

    /// Bound the time a receive may block. `None` blocks indefinitely.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<(), Lms1xxError> {
        self.stream.set_read_timeout(timeout)?;
        Ok(())
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, data: &[u8]) -> Result<(), Lms1xxError> {
        self.stream.write_all(data)?;
        Ok(())
    }

    fn receive_until(&mut self, end: u8) -> Result<Vec<u8>, Lms1xxError> {
        let mut telegram = Vec::new();
        loop {
            if let Some(position) = self.pending.iter().position(|&byte| byte == end) {
                telegram.extend(self.pending.drain(..=position));
                return Ok(telegram);
            }
            telegram.append(&mut self.pending);
            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let n_read = self.stream.read(&mut chunk)?;
            if n_read == 0 {
                return Err(Lms1xxError::ConnectionError(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed by peer",
                )));
            }
            self.pending.extend_from_slice(&chunk[..n_read]);
        }
    }
}

/// Transport double that records outgoing telegrams and replays scripted
/// responses, for exercising the dispatcher without a socket.
#[cfg(test)]
pub(crate) struct ScriptedTransport {
    pub(crate) sent: Vec<Vec<u8>>,
    replies: std::collections::VecDeque<Vec<u8>>,
}

#[cfg(test)]
impl ScriptedTransport {
    pub(crate) fn replying(replies: &[&str]) -> ScriptedTransport {
        ScriptedTransport {
            sent: Vec::new(),
            replies: replies
                .iter()
                .map(|payload| {
                    let mut raw = vec![crate::constants::TELEGRAM_START];
                    raw.extend_from_slice(payload.as_bytes());
                    raw.push(crate::constants::TELEGRAM_END);
                    raw
                })
                .collect(),
        }
    }

    /// Payload of the nth outgoing telegram, markers stripped.
    pub(crate) fn sent_payload(&self, index: usize) -> String {
        let raw = &self.sent[index];
        String::from_utf8(raw[1..raw.len() - 1].to_vec()).unwrap()
    }
}

#[cfg(test)]
impl Transport for ScriptedTransport {
    fn send(&mut self, data: &[u8]) -> Result<(), Lms1xxError> {
        self.sent.push(data.to_vec());
        Ok(())
    }

    fn receive_until(&mut self, _end: u8) -> Result<Vec<u8>, Lms1xxError> {
        self.replies.pop_front().ok_or_else(|| {
            Lms1xxError::ConnectionError(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "reply script exhausted",
            ))
        })
    }
}
