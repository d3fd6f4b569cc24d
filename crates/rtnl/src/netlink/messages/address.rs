//! Address messages: RTM_NEWADDR, RTM_DELADDR.

use std::fmt;
use std::net::IpAddr;

use zerocopy::IntoBytes;

use crate::netlink::attr::{Attr, Decoder, Format};
use crate::netlink::builder::TxBuffer;
use crate::netlink::consts::{AddressFamily, MessageType};
use crate::netlink::error::Result;
use crate::netlink::flags::{HeaderFlags, IfAddrFlags};
use crate::netlink::message::Header;
use crate::netlink::parse::Cursor;
use crate::netlink::pool::AttrSet;
use crate::netlink::render::Printer;
use crate::netlink::types::addr::{AddrAttr, IfAddrCacheInfo, IfAddrMsg};
use crate::netlink::types::route::RtScope;

/// Interface address (struct ifaddrmsg plus `IFA_*` attributes).
#[derive(Debug, Clone, PartialEq)]
pub struct IfAddrMessage {
    pub header: Header,
    pub family: AddressFamily,
    pub prefix_len: u8,
    /// Low 8 flag bits. The full set is in `IFA_FLAGS`, see [`all_flags`](Self::all_flags).
    pub flags: IfAddrFlags,
    pub scope: RtScope,
    pub index: u32,
    pub attrs: AttrSet,
}

impl IfAddrMessage {
    pub fn new(kind: MessageType, family: AddressFamily) -> Self {
        Self {
            header: Header::new(kind, HeaderFlags::empty()),
            family,
            prefix_len: 0,
            flags: IfAddrFlags::empty(),
            scope: RtScope::UNIVERSE,
            index: 0,
            attrs: AttrSet::new(usize::from(AddrAttr::MAX)),
        }
    }

    pub(crate) fn parse(header: Header, body: &[u8], decoder: Decoder<'_>) -> Result<Self> {
        let mut c = Cursor::new(body);
        c.require(IfAddrMsg::SIZE)?;
        let family = AddressFamily(c.u8()?);
        let prefix_len = c.u8()?;
        let flags = IfAddrFlags::from_bits_retain(u32::from(c.u8()?));
        let scope = RtScope(c.u8()?);
        let index = c.u32()?;
        let attrs = decoder.attrs(c.rest(), "IFA", AddrAttr::MAX, |kind| {
            attr_format(AddrAttr(kind), family)
        })?;
        Ok(Self {
            header,
            family,
            prefix_len,
            flags,
            scope,
            index,
            attrs,
        })
    }

    pub fn serialize(&mut self, tx: &mut TxBuffer) -> Result<()> {
        let fixed = IfAddrMsg {
            ifa_family: self.family.0,
            ifa_prefixlen: self.prefix_len,
            ifa_flags: (self.flags.bits() & 0xff) as u8,
            ifa_scope: self.scope.0,
            ifa_index: self.index,
        };
        let body = tx.add(&mut self.header, IfAddrMsg::SIZE + self.attrs.size())?;
        let (head, attrs) = body.split_at_mut(IfAddrMsg::SIZE);
        head.copy_from_slice(fixed.as_bytes());
        self.attrs.serialize(attrs)
    }

    pub fn attr(&self, kind: AddrAttr) -> Option<&Attr> {
        self.attrs.get(kind.0)
    }

    pub fn set_attr(&mut self, kind: AddrAttr, attr: Attr) -> Option<Attr> {
        self.attrs.set(kind.0, attr)
    }

    /// `IFA_ADDRESS`: the peer on point-to-point links, else the local address.
    pub fn address(&self) -> Option<IpAddr> {
        self.attr(AddrAttr::IFA_ADDRESS).and_then(Attr::as_ip)
    }

    pub fn local(&self) -> Option<IpAddr> {
        self.attr(AddrAttr::IFA_LOCAL).and_then(Attr::as_ip)
    }

    pub fn label(&self) -> Option<&str> {
        self.attr(AddrAttr::IFA_LABEL).and_then(Attr::as_str)
    }

    pub fn cache_info(&self) -> Option<&IfAddrCacheInfo> {
        match self.attr(AddrAttr::IFA_CACHEINFO) {
            Some(Attr::IfAddrCacheInfo(info)) => Some(info),
            _ => None,
        }
    }

    /// `IFA_FLAGS` when present, which supersedes the 8-bit header field.
    pub fn all_flags(&self) -> IfAddrFlags {
        match self.attr(AddrAttr::IFA_FLAGS) {
            Some(Attr::IfAddrFlags(flags)) => *flags,
            _ => self.flags,
        }
    }

    pub fn render(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.block(self.header.kind, |p| {
            self.header.render(p)?;
            p.field("index", self.index)?;
            p.field("family", self.family)?;
            p.field("prefix", self.prefix_len)?;
            p.field("ifaddr flags", self.flags)?;
            p.field("scope", self.scope)?;
            self.attrs.render(p, |kind| AddrAttr(kind).to_string())
        })
    }
}

fn attr_format(kind: AddrAttr, family: AddressFamily) -> Format {
    match kind {
        AddrAttr::IFA_ADDRESS
        | AddrAttr::IFA_LOCAL
        | AddrAttr::IFA_BROADCAST
        | AddrAttr::IFA_ANYCAST
        | AddrAttr::IFA_MULTICAST => Format::Address(family),
        AddrAttr::IFA_LABEL => Format::String,
        AddrAttr::IFA_FLAGS => Format::IfAddrFlags,
        AddrAttr::IFA_CACHEINFO => Format::IfAddrCacheInfo,
        AddrAttr::IFA_RT_PRIORITY => Format::U32,
        AddrAttr::IFA_TARGET_NETNSID => Format::I32,
        AddrAttr::IFA_PROTO => Format::U8,
        _ => Format::Hex,
    }
}
