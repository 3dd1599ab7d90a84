extern crate self as ospf_packet;

pub mod codec;
pub mod packet;

pub use codec::{DecodeError, FromBuf, FromBufSized, ToBytes, ToBytesMut};
pub use packet::{
    message_type_string, HelloPacket, NeighborRecord, NeighborRow, OspfSubPacket, PacketType,
};

use std::net::Ipv4Addr;

use pnet::packet::Packet;
use pnet_macros::packet;
use pnet_macros_support::types::*;

pub const VERSION: u8 = 2;
pub const PROTOCOL_NUMBER: u8 = 89;
pub const HEADER_LEN: usize = 11;

/// Represents a OSPF Packet.
#[packet]
pub struct Ospf {
    pub version: u8,
    pub message_type: u8,
    pub length: u16be,
    pub network_mask: u32be,
    pub checksum: u16be,
    pub state: u8,
    #[payload]
    pub payload: Vec<u8>, // the message type specific packet
}

impl Ospf {
    pub fn len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }
}

fn sum_words(data: &[u8], mut acc: u64) -> u64 {
    let mut words = data.chunks_exact(2);
    for word in &mut words {
        acc += u16::from_be_bytes([word[0], word[1]]) as u64;
    }
    // odd tail is padded with a zero byte
    if let [last] = words.remainder() {
        acc += (*last as u64) << 8;
    }
    acc
}

fn fold(mut acc: u64) -> u16 {
    while acc >> 16 != 0 {
        acc = (acc & 0xffff) + (acc >> 16);
    }
    acc as u16
}

fn pseudo_header(source: Ipv4Addr, destination: Ipv4Addr, length: usize) -> u64 {
    let mut header = [0u8; 12];
    header[..4].copy_from_slice(&source.octets());
    header[4..8].copy_from_slice(&destination.octets());
    header[9] = PROTOCOL_NUMBER;
    header[10..].copy_from_slice(&(length as u16).to_be_bytes());
    sum_words(&header, 0)
}

/// RFC 1071 checksum of `packet` behind the (source, destination, protocol, length)
/// pseudo header. The checksum field of `packet` must be zero.
pub fn checksum(source: Ipv4Addr, destination: Ipv4Addr, packet: &[u8]) -> u16 {
    let acc = sum_words(packet, pseudo_header(source, destination, packet.len()));
    !fold(acc)
}

impl MutableOspfPacket<'_> {
    pub fn auto_set_checksum(&mut self, source: Ipv4Addr, destination: Ipv4Addr) {
        self.set_checksum(0);
        let sum = checksum(source, destination, self.packet());
        self.set_checksum(sum);
    }
}

impl OspfPacket<'_> {
    pub fn auto_test_checksum(&self, source: Ipv4Addr, destination: Ipv4Addr) -> bool {
        let packet = self.packet();
        fold(sum_words(packet, pseudo_header(source, destination, packet.len()))) == 0xffff
    }
}

impl From<OspfPacket<'_>> for Ospf {
    fn from(value: OspfPacket<'_>) -> Self {
        Self {
            version: value.get_version(),
            message_type: value.get_message_type(),
            length: value.get_length(),
            network_mask: value.get_network_mask(),
            checksum: value.get_checksum(),
            state: value.get_state(),
            payload: value.payload().to_vec(),
        }
    }
}

impl std::fmt::Display for MutableOspfPacket<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_immutable().fmt(f)
    }
}

macro_rules! ospf_fmt {
    () => {
"OspfPacket: {{
    version: {},
    message_type: {},
    length: {},
    network_mask: {},
    checksum: {:#06x},
    state: {},
}}"
    };
}

pub const fn hex2ip(hex: u32) -> Ipv4Addr {
    let bytes = hex.to_be_bytes();
    Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])
}

impl std::fmt::Display for OspfPacket<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f, ospf_fmt!(),
            self.get_version(),
            message_type_string(self.get_message_type()),
            self.get_length(),
            hex2ip(self.get_network_mask()),
            self.get_checksum(),
            self.get_state()
        )
    }
}

/// Validates the fixed header of a raw OSPF packet.
pub fn parse(raw: &[u8]) -> Result<OspfPacket<'_>, DecodeError> {
    let packet = OspfPacket::new(raw).ok_or(DecodeError::Truncated {
        needed: HEADER_LEN,
        remaining: raw.len(),
    })?;
    if packet.get_version() != VERSION {
        return Err(DecodeError::BadVersion(packet.get_version()));
    }
    PacketType::try_from(packet.get_message_type())?;
    let declared = packet.get_length() as usize;
    if declared > raw.len() {
        return Err(DecodeError::Truncated {
            needed: declared,
            remaining: raw.len(),
        });
    }
    if declared != raw.len() {
        return Err(DecodeError::BadLength {
            declared,
            actual: raw.len(),
        });
    }
    Ok(packet)
}

/// A decoded Hello together with the header fields the state machine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloMessage {
    pub network_mask: Ipv4Addr,
    pub state: u8,
    pub hello: HelloPacket,
}

impl TryFrom<&OspfPacket<'_>> for HelloMessage {
    type Error = DecodeError;

    fn try_from(packet: &OspfPacket<'_>) -> Result<Self, Self::Error> {
        let ty = PacketType::try_from(packet.get_message_type())?;
        if ty != PacketType::Hello {
            return Err(DecodeError::UnexpectedType(ty));
        }
        Ok(Self {
            network_mask: hex2ip(packet.get_network_mask()),
            state: packet.get_state(),
            hello: HelloPacket::from_buf(&mut packet.payload())?,
        })
    }
}

pub fn decode_hello(raw: &[u8]) -> Result<HelloMessage, DecodeError> {
    HelloMessage::try_from(&parse(raw)?)
}
