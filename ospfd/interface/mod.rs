use std::net::Ipv4Addr;

use pnet::{datalink::NetworkInterface, ipnetwork::IpNetwork};

use crate::util::same_subnet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressScope {
    /// Only reachable from this host, never used for discovery.
    Host,
    Link,
    Global,
}

impl AddressScope {
    pub fn of(ip: Ipv4Addr) -> Self {
        if ip.is_loopback() || ip.is_unspecified() {
            Self::Host
        } else if ip.is_link_local() {
            Self::Link
        } else {
            Self::Global
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub local: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub scope: AddressScope,
}

impl InterfaceAddress {
    pub fn new(local: Ipv4Addr, mask: Ipv4Addr) -> Self {
        Self {
            local,
            mask,
            scope: AddressScope::of(local),
        }
    }

    pub fn with_scope(mut self, scope: AddressScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn is_host(&self) -> bool {
        self.scope == AddressScope::Host
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        same_subnet(self.local, ip, self.mask)
    }
}

/// A local interface as the protocol sees it: an index, a name and its IPv4 addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub index: u32,
    pub name: String,
    pub loopback: bool,
    pub addresses: Vec<InterfaceAddress>,
}

impl Interface {
    pub fn new(index: u32, name: impl Into<String>, addresses: Vec<InterfaceAddress>) -> Self {
        Self {
            index,
            name: name.into(),
            loopback: false,
            addresses,
        }
    }

    pub fn loopback(mut self, loopback: bool) -> Self {
        self.loopback = loopback;
        self
    }

    /// Addresses that take part in discovery.
    pub fn active_addresses(&self) -> impl Iterator<Item = &InterfaceAddress> {
        self.addresses.iter().filter(|a| !a.is_host())
    }

    /// The local address a packet from `source` arrived on: the one whose subnet holds
    /// the source, else the first address usable for discovery.
    pub fn receiving_address(&self, source: Ipv4Addr) -> Option<&InterfaceAddress> {
        self.active_addresses()
            .find(|a| a.contains(source))
            .or_else(|| self.active_addresses().next())
    }
}

impl From<&NetworkInterface> for Interface {
    fn from(iface: &NetworkInterface) -> Self {
        let addresses = iface
            .ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ip) = ip {
                    Some(InterfaceAddress::new(ip.ip(), ip.mask()))
                } else {
                    None
                }
            })
            .collect();
        Self::new(iface.index, iface.name.as_str(), addresses).loopback(iface.is_loopback())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);

    #[test]
    fn scopes() {
        assert_eq!(AddressScope::of(Ipv4Addr::LOCALHOST), AddressScope::Host);
        assert_eq!(AddressScope::of(Ipv4Addr::new(169, 254, 0, 1)), AddressScope::Link);
        assert_eq!(AddressScope::of(Ipv4Addr::new(10, 0, 1, 1)), AddressScope::Global);
    }

    #[test]
    fn receiving_address_prefers_the_source_subnet() {
        let iface = Interface::new(
            1,
            "eth0",
            vec![
                InterfaceAddress::new(Ipv4Addr::LOCALHOST, Ipv4Addr::new(255, 0, 0, 0)),
                InterfaceAddress::new(Ipv4Addr::new(10, 0, 1, 1), MASK),
                InterfaceAddress::new(Ipv4Addr::new(10, 0, 2, 1), MASK),
            ],
        );
        let local = iface.receiving_address(Ipv4Addr::new(10, 0, 2, 9)).unwrap();
        assert_eq!(local.local, Ipv4Addr::new(10, 0, 2, 1));
        let local = iface.receiving_address(Ipv4Addr::new(192, 168, 0, 1)).unwrap();
        assert_eq!(local.local, Ipv4Addr::new(10, 0, 1, 1));
    }

    #[test]
    fn host_only_interface_has_no_receiving_address() {
        let iface = Interface::new(
            1,
            "eth0",
            vec![InterfaceAddress::new(Ipv4Addr::new(10, 0, 1, 1), MASK).with_scope(AddressScope::Host)],
        );
        assert_eq!(iface.active_addresses().count(), 0);
        assert!(iface.receiving_address(Ipv4Addr::new(10, 0, 1, 2)).is_none());
    }
}
