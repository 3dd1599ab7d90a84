use std::{
    collections::{BTreeMap, BTreeSet},
    net::{Ipv4Addr, SocketAddr},
    num::NonZeroU32,
};

use pnet::packet::{
    ip::IpNextHeaderProtocols::OspfigP,
    ipv4::{self, MutableIpv4Packet},
};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use super::{AddressFamily, Datagram, NetworkLayer};
use crate::{
    constant::MaxPacketSize, error::TransportError, interface::Interface, ip, log, log_debug,
    log_warning,
};

const IPV4_HEADER_LEN: usize = 20;

/// IPv4 through raw sockets, one per interface so that every datagram leaves by the
/// link it was built for. The IP header is written here so that the source address
/// matches the one the OSPF checksum was computed with.
pub struct RawIpv4Layer {
    sockets: BTreeMap<u32, Socket>,
    interfaces: Vec<Interface>,
    forwarding: BTreeSet<u32>,
}

/// The address multicast leaves `iface` from.
fn multicast_source(iface: &Interface) -> Option<Ipv4Addr> {
    iface.active_addresses().next().map(|a| a.local)
}

fn open_socket(iface: &Interface) -> Result<Socket, TransportError> {
    let socket = Socket::new(
        Domain::IPV4,
        Type::RAW,
        Some(Protocol::from(OspfigP.0 as i32)),
    )?;
    socket.set_header_included_v4(true)?;
    socket.bind_device_by_index_v4(NonZeroU32::new(iface.index))?;
    if let Some(local) = multicast_source(iface) {
        socket.set_multicast_if_v4(&local)?;
    }
    socket.set_multicast_loop_v4(false)?;
    Ok(socket)
}

impl RawIpv4Layer {
    /// Opens a socket on every non-loopback interface.
    pub fn new(interfaces: Vec<Interface>) -> Result<Self, TransportError> {
        let mut sockets = BTreeMap::new();
        for iface in interfaces.iter().filter(|i| !i.loopback) {
            sockets.insert(iface.index, open_socket(iface)?);
            log_debug!("raw socket bound to {}({})", iface.name, iface.index);
        }
        Ok(Self {
            sockets,
            interfaces,
            forwarding: BTreeSet::new(),
        })
    }

    fn frame(datagram: &Datagram) -> Result<Vec<u8>, TransportError> {
        let total = IPV4_HEADER_LEN + datagram.payload.len();
        if total > MaxPacketSize {
            return Err(TransportError::Oversized(total));
        }
        let mut buffer = vec![0u8; total];
        let mut packet =
            MutableIpv4Packet::new(&mut buffer).ok_or(TransportError::Malformed(total))?;
        packet.set_version(4);
        packet.set_header_length((IPV4_HEADER_LEN / 4) as u8);
        packet.set_total_length(total as u16);
        packet.set_ttl(1);
        packet.set_next_level_protocol(OspfigP);
        packet.set_source(datagram.source);
        packet.set_destination(datagram.destination);
        packet.set_payload(&datagram.payload);
        let checksum = ipv4::checksum(&packet.to_immutable());
        packet.set_checksum(checksum);
        Ok(buffer)
    }
}

impl NetworkLayer for RawIpv4Layer {
    fn family(&self) -> AddressFamily {
        AddressFamily::Ipv4
    }

    fn interfaces(&self) -> Vec<Interface> {
        self.interfaces.clone()
    }

    fn set_forwarding(&mut self, index: u32, enabled: bool) {
        let changed = if enabled {
            self.forwarding.insert(index)
        } else {
            self.forwarding.remove(&index)
        };
        if !changed {
            return;
        }
        let Some(iface) = self.interfaces.iter().find(|i| i.index == index) else {
            log_warning!("forwarding requested on unknown interface {}", index);
            return;
        };
        let path = format!("/proc/sys/net/ipv4/conf/{}/forwarding", iface.name);
        match std::fs::write(&path, if enabled { "1" } else { "0" }) {
            Ok(()) => log!("forwarding {} on {}", if enabled { "enabled" } else { "disabled" }, iface.name),
            Err(e) => log_warning!("failed to write {}: {}", path, e),
        }
    }

    fn send(&mut self, datagram: Datagram) -> Result<(), TransportError> {
        let socket = self
            .sockets
            .get(&datagram.interface)
            .ok_or(TransportError::UnknownInterface(datagram.interface))?;
        let buffer = Self::frame(&datagram)?;
        let len = buffer.len();
        let target = SockAddr::from(SocketAddr::new(ip!(datagram.destination), 0));
        let sent = socket.send_to(&buffer, &target)?;
        if sent != len {
            return Err(TransportError::Incomplete { sent, len });
        }
        log_debug!(
            "sent {} bytes {} -> {} on interface {}",
            len,
            datagram.source,
            datagram.destination,
            datagram.interface
        );
        Ok(())
    }
}
