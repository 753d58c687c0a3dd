//! Loss-tolerant windowed sessions over datagrams

mod config;
mod link;
mod packet;
mod receiver;
mod sender;
mod socket;

pub use config::{
    DEFAULT_WINDOW_CAPACITY, LinkConfig, MAX_DATAGRAM_SIZE, ReceiveConfig, SequenceOrdering,
    TransmitConfig,
};
pub use link::{Receiver, Sender};
pub use packet::{PACKET_HEADER, PACKET_PREFIX_LEN, Packet, SOURCE_ID_LEN};
pub use receiver::{ReceiveStats, ReceiveTable};
pub use sender::TransmitSession;
pub use socket::SocketBinding;
