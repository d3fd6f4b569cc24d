//! Decoded NETLINK_ROUTE messages.
//!
//! [`Message`] is the closed set of records this crate understands. Each
//! variant decodes its fixed body field by field, then its attribute TLVs
//! into a table indexed by attribute kind.
//!
//! # Example
//!
//! ```ignore
//! use rtnl::netlink::messages::Message;
//!
//! let msg = Message::parse(&record)?;
//! if let Message::Link(link) = &msg {
//!     println!("{}: {}", link.index, link.name().unwrap_or("?"));
//! }
//! print!("{msg}");
//! ```

mod address;
mod control;
mod link;
mod neighbor;
mod nsid;
mod route;

use std::fmt;
use std::sync::Arc;

pub use address::IfAddrMessage;
pub use control::{ErrorMessage, GenMessage};
pub use link::IfInfoMessage;
pub use neighbor::NeighborMessage;
pub use nsid::NetnsMessage;
pub use route::RouteMessage;

use super::attr::Decoder;
use super::builder::TxBuffer;
use super::consts::MessageType;
use super::error::{Error, Result};
use super::message::{Header, NLMSG_HDRLEN};
use super::pool::AttrPool;
use super::render::Printer;
use super::types::{IfAddrMsg, IfInfoMsg, NdMsg, RtGenMsg, RtMsg};

/// A decoded netlink record.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Noop(Header),
    /// End of a multipart dump. Any body is ignored.
    Done(Header),
    Error(ErrorMessage),
    /// `RTM_GET*` request carrying only a family, as sent for dumps.
    Generic(GenMessage),
    Link(IfInfoMessage),
    Address(IfAddrMessage),
    Route(RouteMessage),
    Neighbor(NeighborMessage),
    Netns(NetnsMessage),
}

impl Message {
    /// Decode one record, allocating fresh attribute tables.
    pub fn parse(record: &[u8]) -> Result<Self> {
        Self::decode(record, Decoder::default())
    }

    /// Decode one record, borrowing attribute tables from `pool`.
    pub fn parse_pooled(record: &[u8], pool: &Arc<AttrPool>) -> Result<Self> {
        Self::decode(record, Decoder::new(Some(pool)))
    }

    fn decode(record: &[u8], decoder: Decoder<'_>) -> Result<Self> {
        let header = Header::parse(record)?;
        let len = header.length as usize;
        if len < NLMSG_HDRLEN || len > record.len() {
            return Err(Error::Truncated {
                expected: len.max(NLMSG_HDRLEN),
                actual: record.len(),
            });
        }
        let body = &record[NLMSG_HDRLEN..len];

        if let Some(fixed) = request_body_len(header.kind)
            && body.len() < fixed
        {
            return Ok(Self::Generic(GenMessage::parse(header, body)?));
        }

        let msg = match header.kind {
            MessageType::NLMSG_NOOP => Self::Noop(header),
            MessageType::NLMSG_DONE => Self::Done(header),
            MessageType::NLMSG_ERROR => Self::Error(ErrorMessage::parse(header, body)?),
            MessageType::RTM_NEWLINK
            | MessageType::RTM_DELLINK
            | MessageType::RTM_GETLINK
            | MessageType::RTM_SETLINK => {
                Self::Link(IfInfoMessage::parse(header, body, decoder)?)
            }
            MessageType::RTM_NEWADDR | MessageType::RTM_DELADDR | MessageType::RTM_GETADDR => {
                Self::Address(IfAddrMessage::parse(header, body, decoder)?)
            }
            MessageType::RTM_NEWROUTE | MessageType::RTM_DELROUTE | MessageType::RTM_GETROUTE => {
                Self::Route(RouteMessage::parse(header, body, decoder)?)
            }
            MessageType::RTM_NEWNEIGH | MessageType::RTM_DELNEIGH | MessageType::RTM_GETNEIGH => {
                Self::Neighbor(NeighborMessage::parse(header, body, decoder)?)
            }
            MessageType::RTM_NEWNSID | MessageType::RTM_DELNSID | MessageType::RTM_GETNSID => {
                Self::Netns(NetnsMessage::parse(header, body, decoder)?)
            }
            other => return Err(Error::UnknownMessageType(other.0)),
        };
        Ok(msg)
    }

    pub fn header(&self) -> &Header {
        match self {
            Self::Noop(h) | Self::Done(h) => h,
            Self::Error(m) => &m.header,
            Self::Generic(m) => &m.header,
            Self::Link(m) => &m.header,
            Self::Address(m) => &m.header,
            Self::Route(m) => &m.header,
            Self::Neighbor(m) => &m.header,
            Self::Netns(m) => &m.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut Header {
        match self {
            Self::Noop(h) | Self::Done(h) => h,
            Self::Error(m) => &mut m.header,
            Self::Generic(m) => &mut m.header,
            Self::Link(m) => &mut m.header,
            Self::Address(m) => &mut m.header,
            Self::Route(m) => &mut m.header,
            Self::Neighbor(m) => &mut m.header,
            Self::Netns(m) => &mut m.header,
        }
    }

    pub fn kind(&self) -> MessageType {
        self.header().kind
    }

    /// Frame this message into `tx`, updating its header in place.
    pub fn serialize(&mut self, tx: &mut TxBuffer) -> Result<()> {
        match self {
            Self::Noop(h) | Self::Done(h) => tx.add(h, 0).map(drop),
            Self::Error(m) => m.serialize(tx),
            Self::Generic(m) => m.serialize(tx),
            Self::Link(m) => m.serialize(tx),
            Self::Address(m) => m.serialize(tx),
            Self::Route(m) => m.serialize(tx),
            Self::Neighbor(m) => m.serialize(tx),
            Self::Netns(m) => m.serialize(tx),
        }
    }

    pub fn render(&self, p: &mut Printer<'_>) -> fmt::Result {
        match self {
            Self::Noop(h) | Self::Done(h) => control::render_bare(h, p),
            Self::Error(m) => m.render(p),
            Self::Generic(m) => m.render(p),
            Self::Link(m) => m.render(p),
            Self::Address(m) => m.render(p),
            Self::Route(m) => m.render(p),
            Self::Neighbor(m) => m.render(p),
            Self::Netns(m) => m.render(p),
        }
    }
}

/// Fixed body of the family an `RTM_GET*` kind belongs to. A shorter body
/// is a bare `rtgenmsg`.
fn request_body_len(kind: MessageType) -> Option<usize> {
    match kind {
        MessageType::RTM_GETLINK => Some(IfInfoMsg::SIZE),
        MessageType::RTM_GETADDR => Some(IfAddrMsg::SIZE),
        MessageType::RTM_GETROUTE => Some(RtMsg::SIZE),
        MessageType::RTM_GETNEIGH => Some(NdMsg::SIZE),
        MessageType::RTM_GETNSID => Some(RtGenMsg::padded_size()),
        _ => None,
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(&mut Printer::new(f))
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Message {
                fn from(m: $ty) -> Self {
                    Self::$variant(m)
                }
            }
        )*
    };
}

impl_from!(
    Error(ErrorMessage),
    Generic(GenMessage),
    Link(IfInfoMessage),
    Address(IfAddrMessage),
    Route(RouteMessage),
    Neighbor(NeighborMessage),
    Netns(NetnsMessage),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::consts::AddressFamily;
    use crate::netlink::fixtures;
    use crate::netlink::flags::HeaderFlags;

    #[test]
    fn test_dispatch_by_kind() {
        let cases = [
            (fixtures::link_loopback(), MessageType::RTM_NEWLINK),
            (fixtures::addr_ipv4_loopback(), MessageType::RTM_NEWADDR),
            (fixtures::route_ipv4_default(), MessageType::RTM_NEWROUTE),
            (fixtures::neigh_ipv4_reachable(), MessageType::RTM_NEWNEIGH),
            (fixtures::done(7), MessageType::NLMSG_DONE),
        ];
        for (record, kind) in cases {
            assert_eq!(Message::parse(&record).unwrap().kind(), kind);
        }
        assert!(matches!(
            Message::parse(&fixtures::record(MessageType::RTM_GETLINK, &[17])).unwrap(),
            Message::Generic(GenMessage {
                family: AddressFamily::AF_PACKET,
                ..
            })
        ));
        assert!(matches!(
            Message::parse(&fixtures::record(MessageType::NLMSG_NOOP, &[])).unwrap(),
            Message::Noop(_)
        ));
    }

    #[test]
    fn test_dump_requests_roundtrip() {
        let kinds = [
            MessageType::RTM_GETLINK,
            MessageType::RTM_GETADDR,
            MessageType::RTM_GETROUTE,
            MessageType::RTM_GETNEIGH,
            MessageType::RTM_GETNSID,
        ];
        let mut tx = TxBuffer::new(7);
        for kind in kinds {
            let mut msg = Message::Generic(GenMessage::dump(kind, AddressFamily::AF_INET));
            tx.clear();
            msg.serialize(&mut tx).unwrap();
            assert_eq!(Message::parse(tx.as_bytes()).unwrap(), msg, "{kind}");
        }
    }

    #[test]
    fn test_get_with_full_body_decodes_family() {
        let mut body = vec![0u8; 16];
        body[4..8].copy_from_slice(&1i32.to_ne_bytes());
        let record = fixtures::record(MessageType::RTM_GETLINK, &body);
        let Message::Link(link) = Message::parse(&record).unwrap() else {
            panic!("expected link");
        };
        assert_eq!(link.index, 1);
    }

    #[test]
    fn test_unknown_type() {
        let record = fixtures::record(MessageType::RTM_NEWQDISC, &[0; 20]);
        assert!(matches!(
            Message::parse(&record),
            Err(Error::UnknownMessageType(36))
        ));
    }

    #[test]
    fn test_length_checks() {
        let mut record = fixtures::link_loopback();
        let full = record.len();
        record.truncate(full - 8);
        assert!(matches!(
            Message::parse(&record),
            Err(Error::Truncated { actual, .. }) if actual == full - 8
        ));

        let mut record = fixtures::record(MessageType::NLMSG_DONE, &[0; 4]);
        record[..4].copy_from_slice(&8u32.to_ne_bytes());
        assert!(matches!(
            Message::parse(&record),
            Err(Error::Truncated {
                expected: 16,
                actual: 20
            })
        ));

        assert!(matches!(
            Message::parse(&[0u8; 10]),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn test_done_body_ignored() {
        let record = fixtures::done(3);
        assert_eq!(record.len(), 20);
        let Message::Done(header) = Message::parse(&record).unwrap() else {
            panic!("expected done");
        };
        assert_eq!(header.sequence, 3);
        assert!(header.flags.contains(HeaderFlags::MULTI));
    }

    #[test]
    fn test_serialize_bare() {
        let mut msg = Message::Noop(Header::new(MessageType::NLMSG_NOOP, HeaderFlags::empty()));
        let mut tx = TxBuffer::new(5);
        msg.serialize(&mut tx).unwrap();
        assert_eq!(tx.len(), 16);
        assert_eq!(Message::parse(tx.as_bytes()).unwrap(), msg);
    }

    #[test]
    fn test_pooled_parse_returns_tables() {
        let pool = AttrPool::new(4);
        let record = fixtures::link_with_af_spec(AddressFamily::AF_UNSPEC);
        let msg = Message::parse_pooled(&record, &pool).unwrap();
        assert_eq!(pool.available(), 0);
        drop(msg);
        // Link table, AF_SPEC array, INET array.
        assert_eq!(pool.available(), 3);

        let msg = Message::parse_pooled(&record, &pool).unwrap();
        assert_eq!(pool.available(), 0);
        assert_eq!(msg, Message::parse(&record).unwrap());
    }

    #[test]
    fn test_display_done() {
        let text = Message::parse(&fixtures::done(2)).unwrap().to_string();
        assert_eq!(
            text,
            "NLMSG_DONE:\n    len: 20\n    seq: 2\n    pid: 0\n    flags: Multipart\n"
        );
    }
}
