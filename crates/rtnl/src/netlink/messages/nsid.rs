//! Namespace id messages: RTM_NEWNSID, RTM_DELNSID.

use std::fmt;

use crate::netlink::attr::{Attr, Decoder, Format};
use crate::netlink::builder::TxBuffer;
use crate::netlink::consts::{AddressFamily, MessageType};
use crate::netlink::error::Result;
use crate::netlink::flags::HeaderFlags;
use crate::netlink::message::Header;
use crate::netlink::parse::Cursor;
use crate::netlink::pool::AttrSet;
use crate::netlink::render::Printer;
use crate::netlink::types::nsid::{NETNSA_NSID_NOT_ASSIGNED, NetnsAttr, RtGenMsg};

/// Peer namespace id assignment (padded rtgenmsg plus `NETNSA_*` attributes).
#[derive(Debug, Clone, PartialEq)]
pub struct NetnsMessage {
    pub header: Header,
    pub family: AddressFamily,
    pub attrs: AttrSet,
}

impl NetnsMessage {
    pub fn new(kind: MessageType) -> Self {
        Self {
            header: Header::new(kind, HeaderFlags::empty()),
            family: AddressFamily::AF_UNSPEC,
            attrs: AttrSet::new(usize::from(NetnsAttr::MAX)),
        }
    }

    pub(crate) fn parse(header: Header, body: &[u8], decoder: Decoder<'_>) -> Result<Self> {
        let mut c = Cursor::new(body);
        let family = AddressFamily(c.u8()?);
        c.skip_padding(RtGenMsg::padded_size() - RtGenMsg::SIZE);
        let attrs = decoder.attrs(c.rest(), "NETNSA", NetnsAttr::MAX, |kind| {
            attr_format(NetnsAttr(kind))
        })?;
        Ok(Self {
            header,
            family,
            attrs,
        })
    }

    pub fn serialize(&mut self, tx: &mut TxBuffer) -> Result<()> {
        let fixed = RtGenMsg::padded_size();
        let body = tx.add(&mut self.header, fixed + self.attrs.size())?;
        let (head, attrs) = body.split_at_mut(fixed);
        head[0] = self.family.0;
        self.attrs.serialize(attrs)
    }

    pub fn attr(&self, kind: NetnsAttr) -> Option<&Attr> {
        self.attrs.get(kind.0)
    }

    pub fn set_attr(&mut self, kind: NetnsAttr, attr: Attr) -> Option<Attr> {
        self.attrs.set(kind.0, attr)
    }

    /// Assigned id, or `None` when absent or not assigned.
    pub fn nsid(&self) -> Option<i32> {
        self.attr(NetnsAttr::NETNSA_NSID)
            .and_then(Attr::as_i32)
            .filter(|&id| id != NETNSA_NSID_NOT_ASSIGNED)
    }

    pub fn pid(&self) -> Option<u32> {
        self.attr(NetnsAttr::NETNSA_PID).and_then(Attr::as_u32)
    }

    pub fn render(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.block(self.header.kind, |p| {
            self.header.render(p)?;
            p.field("family", self.family)?;
            self.attrs.render(p, |kind| NetnsAttr(kind).to_string())
        })
    }
}

fn attr_format(kind: NetnsAttr) -> Format {
    match kind {
        NetnsAttr::NETNSA_NSID | NetnsAttr::NETNSA_CURRENT_NSID | NetnsAttr::NETNSA_TARGET_NSID => {
            Format::I32
        }
        NetnsAttr::NETNSA_PID | NetnsAttr::NETNSA_FD => Format::U32,
        _ => Format::Hex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::error::Error;
    use crate::netlink::fixtures;
    use crate::netlink::messages::Message;

    #[test]
    fn test_parse() {
        let mut record = fixtures::record(MessageType::RTM_NEWNSID, &[0, 0, 0, 0]);
        fixtures::push_attr(&mut record, NetnsAttr::NETNSA_NSID.0, &3i32.to_ne_bytes());
        fixtures::push_attr(&mut record, NetnsAttr::NETNSA_PID.0, &1234u32.to_ne_bytes());
        let Message::Netns(ns) = Message::parse(&record).unwrap() else {
            panic!("expected netns message");
        };
        assert_eq!(ns.nsid(), Some(3));
        assert_eq!(ns.pid(), Some(1234));
        assert_eq!(ns.attr(NetnsAttr::NETNSA_NSID), Some(&Attr::I32(3)));
    }

    #[test]
    fn test_not_assigned() {
        let mut ns = NetnsMessage::new(MessageType::RTM_NEWNSID);
        ns.set_attr(NetnsAttr::NETNSA_NSID, Attr::I32(NETNSA_NSID_NOT_ASSIGNED));
        assert_eq!(ns.nsid(), None);
    }

    #[test]
    fn test_serialize_pads_family() {
        let mut ns = NetnsMessage::new(MessageType::RTM_GETNSID);
        ns.set_attr(NetnsAttr::NETNSA_FD, Attr::U32(7));
        let mut tx = TxBuffer::new(1);
        ns.serialize(&mut tx).unwrap();
        assert_eq!(ns.header.length, 16 + 4 + 8);
        assert_eq!(&tx.as_bytes()[16..20], &[0, 0, 0, 0]);

        let Message::Netns(parsed) = Message::parse(tx.as_bytes()).unwrap() else {
            panic!("expected netns message");
        };
        assert_eq!(parsed, ns);
    }

    #[test]
    fn test_wrong_size() {
        let mut record = fixtures::record(MessageType::RTM_NEWNSID, &[0, 0, 0, 0]);
        fixtures::push_attr(&mut record, NetnsAttr::NETNSA_NSID.0, &[1, 2]);
        assert!(matches!(
            Message::parse(&record),
            Err(Error::Truncated {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_render() {
        let mut ns = NetnsMessage::new(MessageType::RTM_NEWNSID);
        ns.set_attr(NetnsAttr::NETNSA_NSID, Attr::I32(0));
        let text = Message::Netns(ns).to_string();
        assert_eq!(text, "RTM_NEWNSID:\n    len: 16\n    seq: 0\n    pid: 0\n    family: UNSPEC\n    NSID: 0\n");
    }
}
