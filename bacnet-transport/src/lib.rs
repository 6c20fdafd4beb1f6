//! Transport layer for the BACnet driver
//!
//! This crate provides the client side of the transport proxy:
//! - [`TransportProxy`]: the proxy contract and its wire types
//! - [`ProxyClient`]: per-device request policy (timeout, busy retry)
//! - [`TcpProxy`]: connector speaking length-prefixed JSON frames over TCP

pub mod client;
pub mod frame;
pub mod proxy;
pub mod tcp;

pub use client::{ClientSettings, ProxyClient, DEFAULT_RETRY_BACKOFF};
pub use frame::{encode_frame, FrameHeader, FRAME_HEADER_LENGTH, FRAME_VERSION};
pub use proxy::{ReadReply, ReadRequest, TransportProxy, WriteRequest};
pub use tcp::{ProxyRequest, ProxyResponse, TcpProxy};
