mod state;

use std::{collections::BTreeMap, net::Ipv4Addr};

pub use state::*;

use ospf_packet::{NeighborRecord, NeighborRow};

use crate::log_success;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborEntry {
    pub router_id: u32,
    /// Source address the neighbor's Hello came from.
    pub address: Ipv4Addr,
    pub mask: Ipv4Addr,
    /// Local interface index the neighbor was heard on.
    pub interface: u32,
    pub state: NeighborState,
}

impl NeighborEntry {
    pub fn new(
        interface: u32,
        address: Ipv4Addr,
        mask: Ipv4Addr,
        router_id: u32,
        state: NeighborState,
    ) -> Self {
        Self {
            router_id,
            address,
            mask,
            interface,
            state,
        }
    }

    pub fn record(&self) -> NeighborRecord {
        NeighborRecord {
            router_id: self.router_id,
            address: self.address,
            network_mask: self.mask,
            state: self.state.into(),
        }
    }
}

/// Every neighbor heard so far, one row per local interface.
///
/// Entries are never removed and `(interface, router_id)` is unique; only the state
/// of an entry changes after it is added.
#[derive(Debug, Clone, Default)]
pub struct NeighborTable {
    rows: BTreeMap<u32, Vec<NeighborEntry>>,
}

impl NeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the neighbor to the row of `interface` unless it is already there.
    pub fn add_neighbor(
        &mut self,
        interface: u32,
        address: Ipv4Addr,
        mask: Ipv4Addr,
        router_id: u32,
        state: NeighborState,
    ) -> bool {
        let row = self.rows.entry(interface).or_default();
        if row.iter().any(|n| n.router_id == router_id) {
            return false;
        }
        let entry = NeighborEntry::new(interface, address, mask, router_id, state);
        log_success!(
            "new neighbor {} on interface {} in state {}",
            address,
            interface,
            state
        );
        row.push(entry);
        true
    }

    /// Sets the state of every entry of `router_id`, returning how many were touched.
    pub fn set_state(&mut self, router_id: u32, state: NeighborState) -> usize {
        let mut count = 0;
        for entry in self.rows.values_mut().flatten() {
            if entry.router_id == router_id {
                let old = entry.state;
                entry.state = state;
                log_state(old, entry);
                count += 1;
            }
        }
        count
    }

    pub fn get_state(&self, router_id: u32) -> Option<NeighborState> {
        self.iter()
            .find(|n| n.router_id == router_id)
            .map(|n| n.state)
    }

    pub fn get(&self, interface: u32, router_id: u32) -> Option<&NeighborEntry> {
        self.rows
            .get(&interface)?
            .iter()
            .find(|n| n.router_id == router_id)
    }

    pub fn contains(&self, router_id: u32) -> bool {
        self.iter().any(|n| n.router_id == router_id)
    }

    pub fn has_neighbors_on(&self, interface: u32) -> bool {
        self.rows.get(&interface).is_some_and(|row| !row.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &NeighborEntry> {
        self.rows.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The table in wire form, rows in interface order.
    pub fn snapshot(&self) -> Vec<NeighborRow> {
        self.rows
            .iter()
            .filter(|(_, row)| !row.is_empty())
            .map(|(&interface, row)| {
                NeighborRow::new(interface, row.iter().map(NeighborEntry::record).collect())
            })
            .collect()
    }
}
