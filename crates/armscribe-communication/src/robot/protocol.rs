//! JSON-lines request/response channel
//!
//! Each request is one JSON object on its own line:
//! `{"id": "<uuid>", "method": "...", "params": {...}}`.
//! The controller answers every request with exactly one line:
//! `{"id": "<uuid>", "ok": true, "result": {...}}` or
//! `{"id": "<uuid>", "ok": false, "error": "..."}`.

use armscribe_core::ConnectionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::trace;
use uuid::Uuid;

#[derive(Serialize)]
struct RequestEnvelope<'a, P: Serialize> {
    id: Uuid,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct ResponseEnvelope {
    id: Uuid,
    ok: bool,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Outcome of one call as reported by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The controller accepted the request
    Ok(Value),
    /// The controller refused the request with a reason
    Refused(String),
}

/// A request/response channel over one TCP stream
pub struct JsonLineChannel {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    peer: String,
}

impl JsonLineChannel {
    /// Dial `address`
    pub async fn connect(address: &str) -> Result<Self, ConnectionError> {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|e| ConnectionError::ConnectFailed {
                address: address.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_stream(stream, address))
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream, peer: impl Into<String>) -> Self {
        let (read, write) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer: write,
            peer: peer.into(),
        }
    }

    /// Address of the remote end
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Send one request and wait for its reply
    pub async fn call<P: Serialize>(
        &mut self,
        method: &str,
        params: P,
    ) -> Result<Reply, ConnectionError> {
        let id = Uuid::new_v4();
        let mut line = serde_json::to_string(&RequestEnvelope { id, method, params })
            .map_err(|e| ConnectionError::Protocol {
                reason: format!("cannot encode {}: {}", method, e),
            })?;
        trace!(%id, method, "-> {}", self.peer);
        line.push('\n');

        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(io_error)?;
        self.writer.flush().await.map_err(io_error)?;

        let mut response = String::new();
        let read = self
            .reader
            .read_line(&mut response)
            .await
            .map_err(io_error)?;
        if read == 0 {
            return Err(ConnectionError::Closed);
        }

        let envelope: ResponseEnvelope =
            serde_json::from_str(response.trim_end()).map_err(|e| ConnectionError::Protocol {
                reason: format!("malformed reply to {}: {}", method, e),
            })?;
        if envelope.id != id {
            return Err(ConnectionError::Protocol {
                reason: format!(
                    "reply id {} does not match request id {}",
                    envelope.id, id
                ),
            });
        }
        trace!(%id, ok = envelope.ok, "<- {}", self.peer);

        if envelope.ok {
            Ok(Reply::Ok(envelope.result))
        } else {
            Ok(Reply::Refused(
                envelope
                    .error
                    .unwrap_or_else(|| "no reason given".to_string()),
            ))
        }
    }
}

fn io_error(e: std::io::Error) -> ConnectionError {
    ConnectionError::Io {
        reason: e.to_string(),
    }
}
