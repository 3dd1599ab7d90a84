use std::{
    collections::BTreeSet,
    net::{Ipv4Addr, Ipv6Addr},
};

use ospf_packet::{message_type_string, HelloMessage, HelloPacket};

use crate::{
    constant::AllSPFRouters,
    error::{ReceiveError, TransportError},
    handler::{
        hello::{self, HelloContext, TableUpdate},
        inspect, Inbound, RxStatus,
    },
    interface::InterfaceAddress,
    log, log_debug, log_error,
    neighbor::{NeighborState, NeighborTable},
    sender,
    transport::{NetworkLayer, RecvInfo},
    util::hex2ip,
};

/// The Hello protocol of one router: its identity, its neighbor table and the
/// network layer it talks through.
pub struct Router {
    router_id: u32,
    area_id: u32,
    exclusions: BTreeSet<u32>,
    neighbors: NeighborTable,
    network: Box<dyn NetworkLayer>,
}

impl Router {
    pub fn new(router_id: u32, network: Box<dyn NetworkLayer>) -> Self {
        Self {
            router_id,
            area_id: 0,
            exclusions: BTreeSet::new(),
            neighbors: NeighborTable::new(),
            network,
        }
    }

    pub fn set_area_id(&mut self, area_id: u32) {
        self.area_id = area_id;
    }

    /// Interfaces (by index) the protocol never runs on.
    pub fn set_exclusions(&mut self, exclusions: BTreeSet<u32>) {
        self.exclusions = exclusions;
    }

    pub fn set_network_layer(&mut self, network: Box<dyn NetworkLayer>) {
        self.network = network;
    }

    pub fn router_id(&self) -> u32 {
        self.router_id
    }

    pub fn area_id(&self) -> u32 {
        self.area_id
    }

    pub fn exclusions(&self) -> &BTreeSet<u32> {
        &self.exclusions
    }

    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    fn hello(&self) -> HelloPacket {
        HelloPacket::new(self.router_id, self.area_id, self.neighbors.snapshot())
    }

    fn send_hello(
        &mut self,
        state: NeighborState,
        interface: u32,
        local: &InterfaceAddress,
        destination: Ipv4Addr,
    ) -> Result<(), TransportError> {
        let hello = self.hello();
        sender::send_packet(self.network.as_mut(), &hello, state, local, interface, destination)
    }

    /// Sends a `Down` Hello to AllSPFRouters from every address of every eligible
    /// interface on which no neighbor has been heard yet.
    ///
    /// Loopback and excluded interfaces are skipped; the others get forwarding enabled.
    /// A failed send is logged and the sweep goes on. Returns the number of Hellos
    /// sent, or the last error when nothing could be sent.
    pub fn start_discovery(&mut self) -> Result<usize, TransportError> {
        let mut sent = 0;
        let mut failure = None;
        for interface in self.network.interfaces() {
            if interface.loopback || self.exclusions.contains(&interface.index) {
                continue;
            }
            self.network.set_forwarding(interface.index, true);
            if self.neighbors.has_neighbors_on(interface.index) {
                continue;
            }
            for local in interface.active_addresses() {
                match self.send_hello(NeighborState::Down, interface.index, local, AllSPFRouters) {
                    Ok(()) => sent += 1,
                    Err(e) => {
                        log_error!("failed to send hello on {}({}): {}", interface.name, local.local, e);
                        failure = Some(e);
                    }
                }
            }
        }
        match failure {
            Some(e) if sent == 0 => Err(e),
            _ => Ok(sent),
        }
    }

    /// Processes one OSPF packet received over IPv4.
    pub fn on_packet_received(
        &mut self,
        payload: &[u8],
        info: RecvInfo,
    ) -> Result<RxStatus, ReceiveError> {
        let index = info.interface.ok_or(ReceiveError::MissingInterface)?;
        let interface = self
            .network
            .interface(index)
            .ok_or(ReceiveError::UnknownInterface(index))?;
        if self.exclusions.contains(&index) {
            log_debug!("dropping packet from {} on excluded interface {}", info.source, interface.name);
            return Ok(RxStatus::Dropped);
        }
        let message = match inspect(payload, &info)? {
            Inbound::Hello(message) => message,
            Inbound::Other(ty) => {
                log_debug!("ignoring {} from {}", message_type_string(ty.into()), info.source);
                return Ok(RxStatus::Ignored);
            }
        };
        log_debug!(
            "received hello from {}({}) on {}: state {}, {} neighbors listed",
            hex2ip(message.hello.router_id),
            info.source,
            interface.name,
            message.state,
            message.hello.neighbors().count()
        );
        if message.hello.router_id == self.router_id {
            return Ok(RxStatus::Dropped);
        }
        let Some(local) = interface.receiving_address(info.source).copied() else {
            return Ok(RxStatus::Dropped);
        };
        self.on_hello(index, &local, info.source, &message)
    }

    fn on_hello(
        &mut self,
        interface: u32,
        local: &InterfaceAddress,
        source: Ipv4Addr,
        message: &HelloMessage,
    ) -> Result<RxStatus, ReceiveError> {
        let Ok(state) = NeighborState::try_from(message.state) else {
            return Ok(RxStatus::Ignored);
        };
        let ctx = HelloContext {
            table: &self.neighbors,
            router_id: self.router_id,
            area_id: self.area_id,
            interface,
            local,
            source,
        };
        let Some(decision) = hello::decide(&ctx, state, message) else {
            return Ok(RxStatus::Ignored);
        };
        if decision.is_drop() {
            log_debug!("hello from {} does not match area {} or mask {}", source, self.area_id, local.mask);
            return Ok(RxStatus::Dropped);
        }
        if let Some(update) = decision.update {
            self.apply(update);
        }
        if decision.exchange {
            // database description exchange would start here
            log!("neighbor {} is 2-Way on both sides", hex2ip(message.hello.router_id));
        }
        if let Some(reply) = decision.reply {
            self.send_hello(reply, interface, local, source)?;
        }
        Ok(RxStatus::Accepted)
    }

    fn apply(&mut self, update: TableUpdate) {
        match update {
            TableUpdate::Add(n) => {
                self.neighbors
                    .add_neighbor(n.interface, n.address, n.mask, n.router_id, n.state);
            }
            TableUpdate::SetState { router_id, state } => {
                self.neighbors.set_state(router_id, state);
            }
        }
    }

    /// The IPv6 receive path. This router only speaks IPv4.
    pub fn on_packet_received_v6(
        &mut self,
        _payload: &[u8],
        source: Ipv6Addr,
        _destination: Ipv6Addr,
        _interface: Option<u32>,
    ) -> Result<RxStatus, ReceiveError> {
        log_debug!("dropping ipv6 packet from {}", source);
        Err(ReceiveError::Unsupported)
    }

    /// ICMP errors have no endpoint in this protocol; they are only logged.
    pub fn on_icmp(
        &self,
        icmp_source: Ipv4Addr,
        icmp_type: u8,
        icmp_code: u8,
        payload_source: Ipv4Addr,
        payload_destination: Ipv4Addr,
    ) {
        log_debug!(
            "no endpoint for icmp {}/{} from {}: source={}, destination={}",
            icmp_type,
            icmp_code,
            icmp_source,
            payload_source,
            payload_destination
        );
    }
}
