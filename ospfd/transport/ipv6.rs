use super::{AddressFamily, Datagram, NetworkLayer};
use crate::{error::TransportError, interface::Interface, log_debug};

/// The second address family. It owns no interfaces and refuses to send.
#[derive(Debug, Default)]
pub struct Ipv6Layer;

impl NetworkLayer for Ipv6Layer {
    fn family(&self) -> AddressFamily {
        AddressFamily::Ipv6
    }

    fn interfaces(&self) -> Vec<Interface> {
        Vec::new()
    }

    fn set_forwarding(&mut self, index: u32, _enabled: bool) {
        log_debug!("ipv6: ignoring forwarding change on interface {}", index);
    }

    fn send(&mut self, _datagram: Datagram) -> Result<(), TransportError> {
        Err(TransportError::Unsupported)
    }
}

#[cfg(test)]
mod test {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn refuses_to_send() {
        let mut layer = Ipv6Layer;
        assert_eq!(layer.family(), AddressFamily::Ipv6);
        assert!(layer.interfaces().is_empty());
        assert!(layer.interface(1).is_none());
        let datagram = Datagram {
            source: Ipv4Addr::UNSPECIFIED,
            destination: Ipv4Addr::UNSPECIFIED,
            protocol: ospf_packet::PROTOCOL_NUMBER,
            interface: 1,
            payload: Default::default(),
        };
        assert!(matches!(layer.send(datagram), Err(TransportError::Unsupported)));
    }
}
