use std::{net::Ipv4Addr, path::PathBuf};

use ospf_packet::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("address family not supported by this network layer")]
    Unsupported,
    #[error("no interface with index {0}")]
    UnknownInterface(u32),
    #[error("packet of {0} bytes exceeds the maximum datagram size")]
    Oversized(usize),
    #[error("cannot frame a {0} byte packet")]
    Malformed(usize),
    #[error("only {sent} of {len} bytes were sent")]
    Incomplete { sent: usize, len: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reasons a received packet was rejected before the adjacency logic saw it.
///
/// Protocol disagreements (area, mask, visibility) are not errors: they show up as
/// [`RxStatus`](crate::handler::RxStatus) values or as a `Down` reply.
#[derive(Debug, thiserror::Error)]
pub enum ReceiveError {
    #[error("received packet carries no incoming interface")]
    MissingInterface,
    #[error("no interface with index {0}")]
    UnknownInterface(u32),
    #[error("checksum mismatch on packet from {0}")]
    BadChecksum(Ipv4Addr),
    #[error("malformed packet: {0}")]
    Decode(#[from] DecodeError),
    #[error("address family not supported")]
    Unsupported,
    #[error("failed to send reply: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("hello_interval in {0} must be at least one second")]
    ZeroHelloInterval(PathBuf),
}
