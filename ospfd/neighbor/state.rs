use super::NeighborEntry;
use crate::{log_success, util::hex2ip};

/// Adjacency states, numbered as they travel in the header's state byte.
///
/// Only `Down`, `Init` and `TwoWay` have transitions; the rest are placeholders for
/// database exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NeighborState {
    Down = 0,
    Attempt = 1,
    Init = 2,
    TwoWay = 3,
    ExStart = 4,
    Exchange = 5,
    Loading = 6,
    Full = 7,
}

impl TryFrom<u8> for NeighborState {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Down,
            1 => Self::Attempt,
            2 => Self::Init,
            3 => Self::TwoWay,
            4 => Self::ExStart,
            5 => Self::Exchange,
            6 => Self::Loading,
            7 => Self::Full,
            x => return Err(x),
        })
    }
}

impl From<NeighborState> for u8 {
    fn from(value: NeighborState) -> Self {
        value as u8
    }
}

impl std::fmt::Display for NeighborState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Down => "Down",
            Self::Attempt => "Attempt",
            Self::Init => "Init",
            Self::TwoWay => "2-Way",
            Self::ExStart => "ExStart",
            Self::Exchange => "Exchange",
            Self::Loading => "Loading",
            Self::Full => "Full",
        };
        f.write_str(name)
    }
}

pub(super) fn log_state(old: NeighborState, neighbor: &NeighborEntry) {
    if old == neighbor.state {
        return;
    }
    log_success!(
        "neighbor {}({}) 's state changed: {} -> {}",
        hex2ip(neighbor.router_id),
        neighbor.address,
        old,
        neighbor.state
    );
}
