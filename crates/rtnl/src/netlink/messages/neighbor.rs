//! Neighbor messages: RTM_NEWNEIGH, RTM_DELNEIGH.

use std::fmt;
use std::net::IpAddr;

use zerocopy::IntoBytes;

use crate::netlink::attr::{Attr, Decoder, EthernetAddress, Format};
use crate::netlink::builder::TxBuffer;
use crate::netlink::consts::{AddressFamily, MessageType};
use crate::netlink::error::Result;
use crate::netlink::flags::{HeaderFlags, NeighborFlags, NeighborState};
use crate::netlink::message::Header;
use crate::netlink::parse::Cursor;
use crate::netlink::pool::AttrSet;
use crate::netlink::render::Printer;
use crate::netlink::types::neigh::{NdMsg, NeighborAttr};
use crate::netlink::types::route::RouteType;

/// ARP / NDP cache entry (struct ndmsg plus `NDA_*` attributes).
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborMessage {
    pub header: Header,
    pub family: AddressFamily,
    pub index: u32,
    pub state: NeighborState,
    pub flags: NeighborFlags,
    pub neigh_type: RouteType,
    pub attrs: AttrSet,
}

impl NeighborMessage {
    pub fn new(kind: MessageType, family: AddressFamily) -> Self {
        Self {
            header: Header::new(kind, HeaderFlags::empty()),
            family,
            index: 0,
            state: NeighborState::empty(),
            flags: NeighborFlags::empty(),
            neigh_type: RouteType::UNSPEC,
            attrs: AttrSet::new(usize::from(NeighborAttr::MAX)),
        }
    }

    pub(crate) fn parse(header: Header, body: &[u8], decoder: Decoder<'_>) -> Result<Self> {
        let mut c = Cursor::new(body);
        c.require(NdMsg::SIZE)?;
        let family = AddressFamily(c.u8()?);
        c.skip_padding(3);
        let index = c.u32()?;
        let state = NeighborState::from_bits_retain(c.u16()?);
        let flags = NeighborFlags::from_bits_retain(c.u8()?);
        let neigh_type = RouteType(c.u8()?);
        let attrs = decoder.attrs(c.rest(), "NDA", NeighborAttr::MAX, |kind| {
            attr_format(NeighborAttr(kind), family)
        })?;
        Ok(Self {
            header,
            family,
            index,
            state,
            flags,
            neigh_type,
            attrs,
        })
    }

    pub fn serialize(&mut self, tx: &mut TxBuffer) -> Result<()> {
        let fixed = NdMsg {
            ndm_family: self.family.0,
            ndm_ifindex: self.index,
            ndm_state: self.state.bits(),
            ndm_flags: self.flags.bits(),
            ndm_type: self.neigh_type.0,
            ..Default::default()
        };
        let body = tx.add(&mut self.header, NdMsg::SIZE + self.attrs.size())?;
        let (head, attrs) = body.split_at_mut(NdMsg::SIZE);
        head.copy_from_slice(fixed.as_bytes());
        self.attrs.serialize(attrs)
    }

    pub fn attr(&self, kind: NeighborAttr) -> Option<&Attr> {
        self.attrs.get(kind.0)
    }

    pub fn set_attr(&mut self, kind: NeighborAttr, attr: Attr) -> Option<Attr> {
        self.attrs.set(kind.0, attr)
    }

    /// Protocol address of the neighbor.
    pub fn destination(&self) -> Option<IpAddr> {
        self.attr(NeighborAttr::NDA_DST).and_then(Attr::as_ip)
    }

    /// Link-layer address, when it is a 6-byte MAC.
    pub fn lladdr(&self) -> Option<EthernetAddress> {
        self.attr(NeighborAttr::NDA_LLADDR).and_then(Attr::as_ethernet)
    }

    pub fn is_reachable(&self) -> bool {
        self.state.contains(NeighborState::REACHABLE)
    }

    pub fn render(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.block(self.header.kind, |p| {
            self.header.render(p)?;
            p.field("index", self.index)?;
            p.field("address family", self.family)?;
            p.field("type", self.neigh_type)?;
            p.field("state", self.state)?;
            if !self.flags.is_empty() {
                p.field("neighbor flags", self.flags)?;
            }
            self.attrs.render(p, |kind| NeighborAttr(kind).to_string())
        })
    }
}

fn attr_format(kind: NeighborAttr, family: AddressFamily) -> Format {
    match kind {
        NeighborAttr::NDA_DST => Format::Address(family),
        NeighborAttr::NDA_LLADDR => Format::Address(AddressFamily::AF_UNSPEC),
        NeighborAttr::NDA_CACHEINFO => Format::NdaCacheInfo,
        NeighborAttr::NDA_PROBES
        | NeighborAttr::NDA_VNI
        | NeighborAttr::NDA_IFINDEX
        | NeighborAttr::NDA_MASTER
        | NeighborAttr::NDA_SRC_VNI
        | NeighborAttr::NDA_NH_ID
        | NeighborAttr::NDA_FLAGS_EXT => Format::U32,
        NeighborAttr::NDA_LINK_NETNSID => Format::I32,
        NeighborAttr::NDA_VLAN | NeighborAttr::NDA_PORT => Format::U16,
        NeighborAttr::NDA_PROTOCOL => Format::U8,
        _ => Format::Hex,
    }
}
