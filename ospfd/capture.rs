use pnet::datalink::Channel::Ethernet;
use pnet::datalink::{self, DataLinkReceiver, NetworkInterface};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::Packet;

use crate::{
    daemon::Runnable,
    error::TransportError,
    log, log_error,
    transport::{Received, RecvInfo},
};

pub type OspfHandler = Box<dyn FnMut(Received) + Send>;

/// Reads frames off one interface and passes the OSPF ones to its handler.
pub struct CaptureOspfDaemon {
    interface: u32,
    name: String,
    rx: Box<dyn DataLinkReceiver>,
    handler: OspfHandler,
}

impl CaptureOspfDaemon {
    pub fn new(iface: &NetworkInterface, handler: OspfHandler) -> Result<Self, TransportError> {
        let rx = match datalink::channel(iface, Default::default())? {
            Ethernet(_tx, rx) => rx,
            _ => return Err(TransportError::Unsupported),
        };
        log!("capturing ospf packets on {}", iface.name);
        Ok(Self {
            interface: iface.index,
            name: iface.name.clone(),
            rx,
            handler,
        })
    }
}

/// The OSPF payload of an Ethernet frame, tagged with the interface it came in on.
pub fn extract(ethernet: &EthernetPacket, interface: u32) -> Option<Received> {
    if ethernet.get_ethertype() != EtherTypes::Ipv4 {
        return None;
    }
    let header = Ipv4Packet::new(ethernet.payload())?;
    if header.get_next_level_protocol() != IpNextHeaderProtocols::OspfigP {
        return None;
    }
    Some(Received {
        payload: header.payload().to_vec(),
        info: RecvInfo {
            source: header.get_source(),
            destination: header.get_destination(),
            interface: Some(interface),
        },
    })
}

impl Runnable for CaptureOspfDaemon {
    fn run(&mut self) {
        match self.rx.next() {
            Ok(frame) => {
                let Some(ethernet) = EthernetPacket::new(frame) else {
                    return;
                };
                if let Some(received) = extract(&ethernet, self.interface) {
                    (self.handler)(received);
                }
            }
            Err(e) => {
                log_error!("An error occurred while reading from {}: {}", self.name, e);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::net::Ipv4Addr;

    use pnet::packet::ethernet::{EtherType, MutableEthernetPacket};
    use pnet::packet::ip::IpNextHeaderProtocol;
    use pnet::packet::ipv4::MutableIpv4Packet;

    use super::*;

    fn frame(ethertype: EtherType, protocol: IpNextHeaderProtocol) -> Vec<u8> {
        let body = [7u8, 8, 9];
        let mut ip = vec![0u8; 20 + body.len()];
        {
            let mut packet = MutableIpv4Packet::new(&mut ip).unwrap();
            packet.set_version(4);
            packet.set_header_length(5);
            packet.set_total_length((20 + body.len()) as u16);
            packet.set_next_level_protocol(protocol);
            packet.set_source(Ipv4Addr::new(10, 0, 1, 2));
            packet.set_destination(Ipv4Addr::new(224, 0, 0, 5));
            packet.set_payload(&body);
        }
        // ethernet frames get padded to 60 bytes
        let mut buffer = vec![0u8; 60];
        let mut ethernet = MutableEthernetPacket::new(&mut buffer).unwrap();
        ethernet.set_ethertype(ethertype);
        ethernet.set_payload(&ip);
        buffer
    }

    #[test]
    fn extracts_ospf_over_ipv4() {
        let buffer = frame(EtherTypes::Ipv4, IpNextHeaderProtocols::OspfigP);
        let received = extract(&EthernetPacket::new(&buffer).unwrap(), 4).unwrap();
        assert_eq!(received.payload, vec![7, 8, 9]);
        assert_eq!(received.info.source, Ipv4Addr::new(10, 0, 1, 2));
        assert_eq!(received.info.destination, Ipv4Addr::new(224, 0, 0, 5));
        assert_eq!(received.info.interface, Some(4));
    }

    #[test]
    fn skips_other_traffic() {
        let buffer = frame(EtherTypes::Ipv4, IpNextHeaderProtocols::Udp);
        assert!(extract(&EthernetPacket::new(&buffer).unwrap(), 4).is_none());
        let buffer = frame(EtherTypes::Arp, IpNextHeaderProtocols::OspfigP);
        assert!(extract(&EthernetPacket::new(&buffer).unwrap(), 4).is_none());
    }
}
