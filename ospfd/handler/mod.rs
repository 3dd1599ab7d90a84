pub mod hello;

use ospf_packet::{HelloMessage, PacketType};
use tokio::sync::mpsc;

use crate::{
    capture::OspfHandler,
    error::ReceiveError,
    log_warning,
    transport::{Received, RecvInfo},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxStatus {
    /// The Hello changed the table, got a reply, or completed the handshake.
    Accepted,
    /// Failed a configuration check, or came from ourselves.
    Dropped,
    /// A packet type or declared state this router has no rules for.
    Ignored,
}

#[derive(Debug)]
pub enum Inbound {
    Hello(HelloMessage),
    Other(PacketType),
}

/// Checks the ospf header and checksum, then decodes the body of Hello packets.
pub fn inspect(raw: &[u8], info: &RecvInfo) -> Result<Inbound, ReceiveError> {
    let packet = ospf_packet::parse(raw)?;
    if !packet.auto_test_checksum(info.source, info.destination) {
        return Err(ReceiveError::BadChecksum(info.source));
    }
    match PacketType::try_from(packet.get_message_type())? {
        PacketType::Hello => Ok(Inbound::Hello(HelloMessage::try_from(&packet)?)),
        other => Ok(Inbound::Other(other)),
    }
}

/// Hands captured packets over to the receive loop without blocking the capture thread.
pub fn ospf_handler_maker(tx: mpsc::Sender<Received>) -> OspfHandler {
    Box::new(move |received| {
        if let Err(e) = tx.try_send(received) {
            log_warning!("dropping captured packet: {}", e);
        }
    })
}
