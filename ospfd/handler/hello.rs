use std::net::Ipv4Addr;

use ospf_packet::HelloMessage;

use crate::{
    interface::InterfaceAddress,
    neighbor::{NeighborEntry, NeighborState, NeighborTable},
};

/// What the receiving router knows when a Hello arrives.
#[derive(Debug, Clone, Copy)]
pub struct HelloContext<'a> {
    pub table: &'a NeighborTable,
    pub router_id: u32,
    pub area_id: u32,
    pub interface: u32,
    pub local: &'a InterfaceAddress,
    pub source: Ipv4Addr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableUpdate {
    Add(NeighborEntry),
    SetState { router_id: u32, state: NeighborState },
}

/// The outcome of one Hello: an optional table change, an optional unicast reply in
/// the given state, and whether both sides are at 2-Way (where database exchange
/// would begin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decision {
    pub update: Option<TableUpdate>,
    pub reply: Option<NeighborState>,
    pub exchange: bool,
}

impl Decision {
    fn reply(state: NeighborState) -> Self {
        Self {
            reply: Some(state),
            ..Default::default()
        }
    }

    fn update(mut self, update: TableUpdate) -> Self {
        self.update = Some(update);
        self
    }

    /// No update, no reply and no exchange: the Hello was dropped.
    pub fn is_drop(&self) -> bool {
        *self == Self::default()
    }
}

/// Runs the two-way handshake for a Hello declared in `state`.
///
/// Returns `None` for states that have no transitions.
pub fn decide(ctx: &HelloContext, state: NeighborState, message: &HelloMessage) -> Option<Decision> {
    match state {
        NeighborState::Down => Some(down_received(ctx, message)),
        NeighborState::Init => Some(init_received(ctx, message)),
        NeighborState::TwoWay => Some(two_way_received(ctx, message)),
        _ => None,
    }
}

fn entry(ctx: &HelloContext, message: &HelloMessage, state: NeighborState) -> NeighborEntry {
    NeighborEntry::new(
        ctx.interface,
        ctx.source,
        message.network_mask,
        message.hello.router_id,
        state,
    )
}

/// Whether the sender lists us and is in our area.
fn sees_us(ctx: &HelloContext, message: &HelloMessage) -> bool {
    message.hello.lists(ctx.router_id) && message.hello.area_id == ctx.area_id
}

fn down_received(ctx: &HelloContext, message: &HelloMessage) -> Decision {
    if message.hello.area_id != ctx.area_id || message.network_mask != ctx.local.mask {
        return Decision::default();
    }
    let decision = Decision::reply(NeighborState::Init);
    match ctx.table.get(ctx.interface, message.hello.router_id) {
        Some(_) => decision,
        None => decision.update(TableUpdate::Add(entry(ctx, message, NeighborState::Down))),
    }
}

fn init_received(ctx: &HelloContext, message: &HelloMessage) -> Decision {
    if message.hello.is_empty() || !sees_us(ctx, message) {
        return Decision::reply(NeighborState::Down);
    }
    let sender = message.hello.router_id;
    let decision = Decision::reply(NeighborState::TwoWay);
    // a repeated Init never moves a neighbor back down
    match ctx.table.get_state(sender) {
        None => decision.update(TableUpdate::Add(entry(ctx, message, NeighborState::Init))),
        Some(state) if state < NeighborState::Init => decision.update(TableUpdate::SetState {
            router_id: sender,
            state: NeighborState::Init,
        }),
        Some(_) => decision,
    }
}

fn two_way_received(ctx: &HelloContext, message: &HelloMessage) -> Decision {
    if message.hello.is_empty() || !sees_us(ctx, message) {
        return Decision::reply(NeighborState::Down);
    }
    let sender = message.hello.router_id;
    match ctx.table.get_state(sender) {
        None => Decision::reply(NeighborState::Down),
        Some(NeighborState::TwoWay) => Decision {
            exchange: true,
            ..Default::default()
        },
        Some(_) => Decision::reply(NeighborState::TwoWay).update(TableUpdate::SetState {
            router_id: sender,
            state: NeighborState::TwoWay,
        }),
    }
}
