mod ipv6;
mod raw;

pub use ipv6::Ipv6Layer;
pub use raw::RawIpv4Layer;

use std::net::Ipv4Addr;

use bytes::Bytes;

use crate::{error::TransportError, interface::Interface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

/// An OSPF packet ready to leave through `interface`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub protocol: u8,
    pub interface: u32,
    pub payload: Bytes,
}

/// What the network layer reports about a received packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecvInfo {
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    /// Index of the incoming interface, when the layer recorded one.
    pub interface: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub payload: Vec<u8>,
    pub info: RecvInfo,
}

/// The services the protocol needs from the node's network layer.
pub trait NetworkLayer: Send {
    fn family(&self) -> AddressFamily;

    fn interfaces(&self) -> Vec<Interface>;

    fn interface(&self, index: u32) -> Option<Interface> {
        self.interfaces().into_iter().find(|i| i.index == index)
    }

    fn set_forwarding(&mut self, index: u32, enabled: bool);

    fn send(&mut self, datagram: Datagram) -> Result<(), TransportError>;
}
