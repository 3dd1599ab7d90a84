#![allow(dead_code)]

use std::{
    collections::BTreeSet,
    net::Ipv4Addr,
    sync::{Arc, Mutex},
};

use ospf_packet::{HelloPacket, MutableOspfPacket};
use ospfd::{
    error::{ReceiveError, TransportError},
    handler::RxStatus,
    interface::{Interface, InterfaceAddress},
    neighbor::NeighborState,
    sender,
    transport::{AddressFamily, Datagram, NetworkLayer, RecvInfo},
    Router,
};

pub const MASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);

/// What a mock layer has been asked to do.
#[derive(Debug, Default)]
pub struct Wire {
    pub sent: Vec<Datagram>,
    pub forwarding: BTreeSet<u32>,
    pub fail: bool,
}

pub struct MockLayer {
    interfaces: Vec<Interface>,
    wire: Arc<Mutex<Wire>>,
}

impl MockLayer {
    pub fn new(interfaces: Vec<Interface>) -> (Self, Arc<Mutex<Wire>>) {
        let wire = Arc::new(Mutex::new(Wire::default()));
        let layer = Self {
            interfaces,
            wire: wire.clone(),
        };
        (layer, wire)
    }
}

impl NetworkLayer for MockLayer {
    fn family(&self) -> AddressFamily {
        AddressFamily::Ipv4
    }

    fn interfaces(&self) -> Vec<Interface> {
        self.interfaces.clone()
    }

    fn set_forwarding(&mut self, index: u32, enabled: bool) {
        let mut wire = self.wire.lock().unwrap();
        if enabled {
            wire.forwarding.insert(index);
        } else {
            wire.forwarding.remove(&index);
        }
    }

    fn send(&mut self, datagram: Datagram) -> Result<(), TransportError> {
        let mut wire = self.wire.lock().unwrap();
        if wire.fail {
            return Err(TransportError::Unsupported);
        }
        wire.sent.push(datagram);
        Ok(())
    }
}

pub fn eth(index: u32, address: Ipv4Addr) -> Interface {
    Interface::new(
        index,
        format!("eth{index}"),
        vec![InterfaceAddress::new(address, MASK)],
    )
}

/// A router on top of a [`MockLayer`].
pub struct Node {
    pub router: Router,
    pub interfaces: Vec<Interface>,
    pub wire: Arc<Mutex<Wire>>,
}

impl Node {
    pub fn new(router_id: u32, area_id: u32, interfaces: Vec<Interface>) -> Self {
        let (layer, wire) = MockLayer::new(interfaces.clone());
        let mut router = Router::new(router_id, Box::new(layer));
        router.set_area_id(area_id);
        Self {
            router,
            interfaces,
            wire,
        }
    }

    pub fn take_sent(&self) -> Vec<Datagram> {
        std::mem::take(&mut self.wire.lock().unwrap().sent)
    }

    pub fn set_failing(&self, fail: bool) {
        self.wire.lock().unwrap().fail = fail;
    }

    pub fn forwarding(&self) -> BTreeSet<u32> {
        self.wire.lock().unwrap().forwarding.clone()
    }

    pub fn receive(&mut self, datagram: &Datagram, interface: u32) -> Result<RxStatus, ReceiveError> {
        self.router.on_packet_received(
            &datagram.payload,
            RecvInfo {
                source: datagram.source,
                destination: datagram.destination,
                interface: Some(interface),
            },
        )
    }

    pub fn state_of(&self, router_id: u32) -> Option<NeighborState> {
        self.router.neighbors().get_state(router_id)
    }
}

/// A Hello as router `router_id` would send it from `source`.
pub fn hello_from(
    router_id: u32,
    area_id: u32,
    hello_rows: Vec<ospf_packet::NeighborRow>,
    state: NeighborState,
    source: Ipv4Addr,
    destination: Ipv4Addr,
) -> Datagram {
    let hello = HelloPacket::new(router_id, area_id, hello_rows);
    let local = InterfaceAddress::new(source, MASK);
    sender::build_packet(&hello, state, &local, 1, destination).unwrap()
}

/// Overwrites one header byte and fixes up the checksum.
pub fn patch(datagram: &Datagram, offset: usize, value: u8) -> Datagram {
    let mut bytes = datagram.payload.to_vec();
    bytes[offset] = value;
    let mut packet = MutableOspfPacket::new(&mut bytes).unwrap();
    packet.auto_set_checksum(datagram.source, datagram.destination);
    Datagram {
        payload: bytes.into(),
        ..datagram.clone()
    }
}

/// Routers sharing links, with packets delivered by subnet.
pub struct Network {
    pub nodes: Vec<Node>,
}

impl Network {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn discover(&mut self) -> usize {
        self.nodes
            .iter_mut()
            .map(|node| node.router.start_discovery().unwrap())
            .sum()
    }

    /// Delivers queued packets round by round until nobody sends anything,
    /// returning how many deliveries happened.
    pub fn settle(&mut self) -> usize {
        let mut deliveries = 0;
        for _ in 0..32 {
            let queued: Vec<(usize, Datagram)> = self
                .nodes
                .iter()
                .enumerate()
                .flat_map(|(i, node)| node.take_sent().into_iter().map(move |d| (i, d)))
                .collect();
            if queued.is_empty() {
                return deliveries;
            }
            for (from, datagram) in queued {
                for (to, node) in self.nodes.iter_mut().enumerate() {
                    if to == from {
                        continue;
                    }
                    let Some(index) = node
                        .interfaces
                        .iter()
                        .find(|i| {
                            i.addresses.iter().any(|a| {
                                a.contains(datagram.source)
                                    && (datagram.destination.is_multicast()
                                        || a.local == datagram.destination)
                            })
                        })
                        .map(|i| i.index)
                    else {
                        continue;
                    };
                    node.receive(&datagram, index).unwrap();
                    deliveries += 1;
                }
            }
        }
        panic!("network did not settle");
    }
}
