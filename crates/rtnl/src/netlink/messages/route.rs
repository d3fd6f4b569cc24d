//! Route messages: RTM_NEWROUTE, RTM_DELROUTE.

use std::fmt;
use std::net::IpAddr;

use zerocopy::IntoBytes;

use crate::netlink::attr::{Attr, Decoder, Format};
use crate::netlink::builder::TxBuffer;
use crate::netlink::consts::{AddressFamily, MessageType};
use crate::netlink::error::Result;
use crate::netlink::flags::{HeaderFlags, RouteFlags};
use crate::netlink::message::Header;
use crate::netlink::parse::Cursor;
use crate::netlink::pool::AttrSet;
use crate::netlink::render::Printer;
use crate::netlink::types::route::{
    RouteAttr, RouteProtocol, RouteTable, RouteType, RtMsg, RtScope, RtaCacheInfo,
};

/// Routing table entry (struct rtmsg plus `RTA_*` attributes).
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMessage {
    pub header: Header,
    pub family: AddressFamily,
    pub dst_len: u8,
    pub src_len: u8,
    pub tos: u8,
    /// Table id when it fits in 8 bits; see [`table_id`](Self::table_id).
    pub table: u8,
    pub protocol: RouteProtocol,
    pub scope: RtScope,
    pub route_type: RouteType,
    pub flags: RouteFlags,
    pub attrs: AttrSet,
}

impl RouteMessage {
    pub fn new(kind: MessageType, family: AddressFamily) -> Self {
        Self {
            header: Header::new(kind, HeaderFlags::empty()),
            family,
            dst_len: 0,
            src_len: 0,
            tos: 0,
            table: RouteTable::MAIN.0 as u8,
            protocol: RouteProtocol::STATIC,
            scope: RtScope::UNIVERSE,
            route_type: RouteType::UNICAST,
            flags: RouteFlags::empty(),
            attrs: AttrSet::new(usize::from(RouteAttr::MAX)),
        }
    }

    pub(crate) fn parse(header: Header, body: &[u8], decoder: Decoder<'_>) -> Result<Self> {
        let mut c = Cursor::new(body);
        c.require(RtMsg::SIZE)?;
        let family = AddressFamily(c.u8()?);
        let dst_len = c.u8()?;
        let src_len = c.u8()?;
        let tos = c.u8()?;
        let table = c.u8()?;
        let protocol = RouteProtocol(c.u8()?);
        let scope = RtScope(c.u8()?);
        let route_type = RouteType(c.u8()?);
        let flags = RouteFlags::from_bits_retain(c.u32()?);
        let attrs = decoder.attrs(c.rest(), "RTA", RouteAttr::MAX, |kind| {
            attr_format(RouteAttr(kind), family)
        })?;
        Ok(Self {
            header,
            family,
            dst_len,
            src_len,
            tos,
            table,
            protocol,
            scope,
            route_type,
            flags,
            attrs,
        })
    }

    pub fn serialize(&mut self, tx: &mut TxBuffer) -> Result<()> {
        let fixed = RtMsg {
            rtm_family: self.family.0,
            rtm_dst_len: self.dst_len,
            rtm_src_len: self.src_len,
            rtm_tos: self.tos,
            rtm_table: self.table,
            rtm_protocol: self.protocol.0,
            rtm_scope: self.scope.0,
            rtm_type: self.route_type.0,
            rtm_flags: self.flags.bits(),
        };
        let body = tx.add(&mut self.header, RtMsg::SIZE + self.attrs.size())?;
        let (head, attrs) = body.split_at_mut(RtMsg::SIZE);
        head.copy_from_slice(fixed.as_bytes());
        self.attrs.serialize(attrs)
    }

    pub fn attr(&self, kind: RouteAttr) -> Option<&Attr> {
        self.attrs.get(kind.0)
    }

    pub fn set_attr(&mut self, kind: RouteAttr, attr: Attr) -> Option<Attr> {
        self.attrs.set(kind.0, attr)
    }

    pub fn destination(&self) -> Option<IpAddr> {
        self.attr(RouteAttr::RTA_DST).and_then(Attr::as_ip)
    }

    pub fn gateway(&self) -> Option<IpAddr> {
        self.attr(RouteAttr::RTA_GATEWAY).and_then(Attr::as_ip)
    }

    pub fn pref_src(&self) -> Option<IpAddr> {
        self.attr(RouteAttr::RTA_PREFSRC).and_then(Attr::as_ip)
    }

    /// Output interface index.
    pub fn oif(&self) -> Option<u32> {
        self.attr(RouteAttr::RTA_OIF).and_then(Attr::as_u32)
    }

    /// Route metric.
    pub fn priority(&self) -> Option<u32> {
        self.attr(RouteAttr::RTA_PRIORITY).and_then(Attr::as_u32)
    }

    /// Full table id: `RTA_TABLE` when present, the 8-bit header field otherwise.
    pub fn table_id(&self) -> RouteTable {
        self.attr(RouteAttr::RTA_TABLE)
            .and_then(Attr::as_u32)
            .map(RouteTable)
            .unwrap_or(RouteTable(u32::from(self.table)))
    }

    pub fn is_default(&self) -> bool {
        self.dst_len == 0
    }

    pub fn cache_info(&self) -> Option<&RtaCacheInfo> {
        match self.attr(RouteAttr::RTA_CACHEINFO) {
            Some(Attr::RtaCacheInfo(info)) => Some(info),
            _ => None,
        }
    }

    pub fn render(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.block(self.header.kind, |p| {
            self.header.render(p)?;
            p.field("family", self.family)?;
            p.field("srclen", self.src_len)?;
            p.field("dstlen", self.dst_len)?;
            p.field("tos", self.tos)?;
            p.field("table", RouteTable(u32::from(self.table)))?;
            p.field("protocol", self.protocol)?;
            p.field("scope", self.scope)?;
            p.field("type", self.route_type)?;
            if !self.flags.is_empty() {
                p.field("route flags", self.flags)?;
            }
            self.attrs.render(p, |kind| RouteAttr(kind).to_string())
        })
    }
}

fn attr_format(kind: RouteAttr, family: AddressFamily) -> Format {
    match kind {
        RouteAttr::RTA_DST | RouteAttr::RTA_SRC | RouteAttr::RTA_PREFSRC | RouteAttr::RTA_GATEWAY => {
            Format::Address(family)
        }
        RouteAttr::RTA_TABLE
        | RouteAttr::RTA_IIF
        | RouteAttr::RTA_OIF
        | RouteAttr::RTA_PRIORITY
        | RouteAttr::RTA_FLOW
        | RouteAttr::RTA_MARK
        | RouteAttr::RTA_UID
        | RouteAttr::RTA_NH_ID => Format::U32,
        RouteAttr::RTA_EXPIRES => Format::U64,
        RouteAttr::RTA_ENCAP_TYPE | RouteAttr::RTA_SPORT | RouteAttr::RTA_DPORT => Format::U16,
        RouteAttr::RTA_PREF | RouteAttr::RTA_TTL_PROPAGATE | RouteAttr::RTA_IP_PROTO => Format::U8,
        RouteAttr::RTA_CACHEINFO => Format::RtaCacheInfo,
        _ => Format::Hex,
    }
}
