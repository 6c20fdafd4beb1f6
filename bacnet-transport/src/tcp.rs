//! TCP proxy connector
//!
//! Speaks to a proxy process over a single TCP connection. Each request is one
//! frame carrying a JSON [`ProxyRequest`]; the proxy answers with one frame
//! carrying a JSON [`ProxyResponse`]. Requests are serialized over the connection.
//! The connection is opened on first use and dropped after any I/O failure, so
//! the next request reconnects.

use crate::frame::{encode_frame, FrameHeader, FRAME_HEADER_LENGTH};
use crate::proxy::{ReadReply, ReadRequest, TransportProxy, WriteRequest};
use async_trait::async_trait;
use bacnet_core::{BacnetError, BacnetResult, PropertyOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Default bound on connecting and on each frame exchange
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(30);

/// Request envelope sent to the proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProxyRequest {
    Read(ReadRequest),
    Write(WriteRequest),
}

/// Response envelope returned by the proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProxyResponse {
    Ok {
        #[serde(default)]
        values: Vec<PropertyOutcome>,
    },
    Busy {
        #[serde(default)]
        message: String,
    },
    Timeout,
    SegmentationNotSupported {
        #[serde(default)]
        message: String,
    },
    Rejected {
        #[serde(default)]
        message: String,
    },
    Error {
        #[serde(default)]
        message: String,
    },
}

/// TCP proxy connector
pub struct TcpProxy {
    address: String,
    io_timeout: Duration,
    connection: Mutex<Option<TcpStream>>,
}

impl fmt::Debug for TcpProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpProxy")
            .field("address", &self.address)
            .field("io_timeout", &self.io_timeout)
            .finish()
    }
}

impl TcpProxy {
    /// Create a connector for a proxy at `address` ("host:port")
    ///
    /// No connection is made until the first request.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            io_timeout: DEFAULT_IO_TIMEOUT,
            connection: Mutex::new(None),
        }
    }

    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn connect(&self) -> BacnetResult<TcpStream> {
        log::debug!("Connecting to transport proxy at {}", self.address);
        let stream = tokio::time::timeout(self.io_timeout, TcpStream::connect(&self.address))
            .await
            .map_err(|_| BacnetError::Timeout(self.io_timeout))??;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    /// Send one request and wait for its response
    pub async fn exchange(&self, request: &ProxyRequest) -> BacnetResult<ProxyResponse> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| BacnetError::Transport(format!("Failed to encode proxy request: {}", e)))?;
        let frame = encode_frame(&payload)?;

        let mut guard = self.connection.lock().await;
        // Taken out while in use: if this future is dropped mid-exchange the
        // half-used stream goes with it.
        let mut stream = match guard.take() {
            Some(stream) => stream,
            None => self.connect().await?,
        };

        let reply = tokio::time::timeout(self.io_timeout, Self::roundtrip(&mut stream, &frame))
            .await
            .map_err(|_| BacnetError::Timeout(self.io_timeout))
            .and_then(|r| r);

        match reply {
            Ok(bytes) => {
                *guard = Some(stream);
                serde_json::from_slice(&bytes).map_err(|e| {
                    BacnetError::Transport(format!("Malformed proxy response: {}", e))
                })
            }
            Err(e) => {
                log::warn!("Proxy connection to {} dropped: {}", self.address, e);
                Err(e)
            }
        }
    }

    async fn roundtrip(stream: &mut TcpStream, frame: &[u8]) -> BacnetResult<Vec<u8>> {
        stream.write_all(frame).await?;
        stream.flush().await?;

        let mut header = [0u8; FRAME_HEADER_LENGTH];
        stream.read_exact(&mut header).await?;
        let header = FrameHeader::decode(&header)?;

        let mut payload = vec![0u8; header.payload_length()];
        stream.read_exact(&mut payload).await?;
        Ok(payload)
    }
}

impl ProxyResponse {
    fn into_result(self, timeout: Duration) -> BacnetResult<Vec<PropertyOutcome>> {
        match self {
            ProxyResponse::Ok { values } => Ok(values),
            ProxyResponse::Busy { message } => Err(BacnetError::Busy(message)),
            ProxyResponse::Timeout => Err(BacnetError::Timeout(timeout)),
            ProxyResponse::SegmentationNotSupported { message } => {
                Err(BacnetError::SegmentationNotSupported(message))
            }
            ProxyResponse::Rejected { message } => Err(BacnetError::Rejected(message)),
            ProxyResponse::Error { message } => Err(BacnetError::Transport(message)),
        }
    }
}

#[async_trait]
impl TransportProxy for TcpProxy {
    async fn read_properties(&self, request: ReadRequest) -> BacnetResult<ReadReply> {
        let values = self
            .exchange(&ProxyRequest::Read(request))
            .await?
            .into_result(self.io_timeout)?;
        Ok(ReadReply { values })
    }

    async fn write_property(&self, request: WriteRequest) -> BacnetResult<()> {
        self.exchange(&ProxyRequest::Write(request))
            .await?
            .into_result(self.io_timeout)?;
        Ok(())
    }
}
