use std::net::Ipv4Addr;

use ospf_macros::raw_packet;

use super::codec::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    Hello = 0,
    DbDescription = 1,
    LinkStateAdvertisement = 2,
    LinkStateUpdate = 3,
    LinkStateAcknowledge = 4,
}

impl TryFrom<u8> for PacketType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Hello),
            1 => Ok(Self::DbDescription),
            2 => Ok(Self::LinkStateAdvertisement),
            3 => Ok(Self::LinkStateUpdate),
            4 => Ok(Self::LinkStateAcknowledge),
            x => Err(DecodeError::UnknownType(x)),
        }
    }
}

impl From<PacketType> for u8 {
    fn from(value: PacketType) -> Self {
        value as u8
    }
}

pub const fn message_type_string(ty: u8) -> &'static str {
    match ty {
        0 => "Hello Packet",
        1 => "Database Description Packet",
        2 => "Link State Advertisement Packet",
        3 => "Link State Update Packet",
        4 => "Link State Acknowledge Packet",
        _ => "Unknown",
    }
}

/// Represents a Hello payload: the sender's identity and its whole neighbor table.
#[raw_packet]
pub struct HelloPacket {
    pub router_id: u32,
    pub area_id: u32,
    pub num_rows: u32,
    #[size(num_rows)]
    pub rows: Vec<NeighborRow>,
}

/// Neighbors the sender heard on one of its interfaces.
#[raw_packet]
pub struct NeighborRow {
    pub interface: u32,
    pub num_neighbors: u32,
    #[size(num_neighbors)]
    pub neighbors: Vec<NeighborRecord>,
}

#[raw_packet]
pub struct NeighborRecord {
    pub router_id: u32,
    pub address: Ipv4Addr,
    pub network_mask: Ipv4Addr,
    pub state: u8,
}

impl HelloPacket {
    pub fn new(router_id: u32, area_id: u32, rows: Vec<NeighborRow>) -> Self {
        Self {
            router_id,
            area_id,
            num_rows: rows.len() as u32,
            rows,
        }
    }

    pub fn neighbors(&self) -> impl Iterator<Item = &NeighborRecord> {
        self.rows.iter().flat_map(|row| row.neighbors.iter())
    }

    /// True when the sender has not recorded any neighbor yet.
    pub fn is_empty(&self) -> bool {
        self.neighbors().next().is_none()
    }

    pub fn lists(&self, router_id: u32) -> bool {
        self.neighbors().any(|n| n.router_id == router_id)
    }
}

impl NeighborRow {
    pub fn new(interface: u32, neighbors: Vec<NeighborRecord>) -> Self {
        Self {
            interface,
            num_neighbors: neighbors.len() as u32,
            neighbors,
        }
    }
}

pub trait OspfSubPacket: ToBytes + FromBuf + std::fmt::Debug {
    fn get_type(&self) -> PacketType;

    fn get_type_string(&self) -> &'static str {
        message_type_string(self.get_type().into())
    }
}

impl OspfSubPacket for HelloPacket {
    fn get_type(&self) -> PacketType {
        PacketType::Hello
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(router_id: u32, last: u8, state: u8) -> NeighborRecord {
        NeighborRecord {
            router_id,
            address: Ipv4Addr::new(10, 0, 1, last),
            network_mask: Ipv4Addr::new(255, 255, 255, 0),
            state,
        }
    }

    #[test]
    fn hello_layout() {
        let hello = HelloPacket::new(7, 0, vec![NeighborRow::new(1, vec![record(2, 2, 3)])]);
        let bytes = hello.to_bytes();
        let expected: &[u8] = &[
            0, 0, 0, 7, // router id
            0, 0, 0, 0, // area id
            0, 0, 0, 1, // rows
            0, 0, 0, 1, // interface
            0, 0, 0, 1, // neighbors
            0, 0, 0, 2, 10, 0, 1, 2, 255, 255, 255, 0, 3,
        ];
        assert_eq!(&bytes[..], expected);
    }

    #[test]
    fn hello_keeps_rows_apart() {
        let hello = HelloPacket::new(
            9,
            4,
            vec![
                NeighborRow::new(1, vec![record(2, 2, 0), record(3, 3, 2)]),
                NeighborRow::new(3, vec![record(4, 4, 3)]),
            ],
        );
        let decoded = HelloPacket::from_buf(&mut hello.to_bytes()).unwrap();
        assert_eq!(decoded, hello);
        assert_eq!(decoded.rows[1].interface, 3);
        assert!(decoded.lists(4));
        assert!(!decoded.lists(9));
    }

    #[test]
    fn empty_hello() {
        let hello = HelloPacket::new(1, 0, vec![]);
        assert!(hello.is_empty());
        assert_eq!(hello.to_bytes().len(), 12);
        assert!(HelloPacket::new(1, 0, vec![NeighborRow::new(1, vec![])]).is_empty());
    }

    #[test]
    fn truncated_hello() {
        let hello = HelloPacket::new(1, 0, vec![NeighborRow::new(1, vec![record(2, 2, 0)])]);
        let bytes = hello.to_bytes();
        for len in 0..bytes.len() {
            let result = HelloPacket::from_buf(&mut &bytes[..len]);
            assert!(
                matches!(result, Err(DecodeError::Truncated { .. })),
                "{len} bytes decoded as {result:?}"
            );
        }
    }

    #[test]
    fn packet_types() {
        assert_eq!(PacketType::try_from(0), Ok(PacketType::Hello));
        assert_eq!(PacketType::try_from(4), Ok(PacketType::LinkStateAcknowledge));
        assert_eq!(PacketType::try_from(5), Err(DecodeError::UnknownType(5)));
        assert_eq!(message_type_string(PacketType::Hello.into()), "Hello Packet");
    }
}
