use std::net::Ipv4Addr;

use bytes::Bytes;
use ospf_packet::{MutableOspfPacket, Ospf, OspfSubPacket, PROTOCOL_NUMBER, VERSION};
use pnet::packet::Packet as _;

use crate::{
    constant::MaxPacketSize,
    error::TransportError,
    interface::InterfaceAddress,
    log_debug,
    neighbor::NeighborState,
    transport::{Datagram, NetworkLayer},
    util::ip2hex,
};

fn create_packet(packet: &impl OspfSubPacket, mask: Ipv4Addr, state: NeighborState) -> Ospf {
    Ospf {
        version: VERSION,
        message_type: packet.get_type().into(),
        length: 0, // assign later
        network_mask: ip2hex(mask),
        checksum: 0, // assign later
        state: state.into(),
        payload: packet.to_bytes().to_vec(),
    }
}

/// Wraps `packet` in an ospf header sent from `local` and seals it with the checksum.
pub fn build_packet(
    packet: &impl OspfSubPacket,
    state: NeighborState,
    local: &InterfaceAddress,
    interface: u32,
    destination: Ipv4Addr,
) -> Result<Datagram, TransportError> {
    let raw = create_packet(packet, local.mask, state);
    if raw.len() > MaxPacketSize {
        return Err(TransportError::Oversized(raw.len()));
    }
    let mut buffer = vec![0; raw.len()];
    let mut m_packet =
        MutableOspfPacket::new(&mut buffer).ok_or(TransportError::Malformed(raw.len()))?;
    m_packet.populate(&raw);
    m_packet.set_length(m_packet.packet().len() as u16);
    m_packet.auto_set_checksum(local.local, destination);
    Ok(Datagram {
        source: local.local,
        destination,
        protocol: PROTOCOL_NUMBER,
        interface,
        payload: Bytes::from(buffer),
    })
}

pub fn send_packet(
    network: &mut dyn NetworkLayer,
    packet: &impl OspfSubPacket,
    state: NeighborState,
    local: &InterfaceAddress,
    interface: u32,
    destination: Ipv4Addr,
) -> Result<(), TransportError> {
    let datagram = build_packet(packet, state, local, interface, destination)?;
    let len = datagram.payload.len();
    network.send(datagram)?;
    log_debug!(
        "sent packet to {}: {}({}, {} bytes)",
        destination,
        packet.get_type_string(),
        state,
        len
    );
    Ok(())
}
