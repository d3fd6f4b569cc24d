//! Link (interface) messages: RTM_NEWLINK, RTM_DELLINK, RTM_SETLINK.

use std::fmt;

use zerocopy::IntoBytes;

use crate::netlink::attr::{Attr, Decoder, EthernetAddress, Format};
use crate::netlink::builder::TxBuffer;
use crate::netlink::consts::{AddressFamily, MessageType};
use crate::netlink::error::Result;
use crate::netlink::flags::{HeaderFlags, IfInfoFlags};
use crate::netlink::message::Header;
use crate::netlink::parse::Cursor;
use crate::netlink::pool::AttrSet;
use crate::netlink::render::Printer;
use crate::netlink::types::link::{
    IfInfoMsg, L2IfType, LinkAttr, LinkInfoAttr, LinkStats64, OperState,
};

/// Interface description (struct ifinfomsg plus `IFLA_*` attributes).
#[derive(Debug, Clone, PartialEq)]
pub struct IfInfoMessage {
    pub header: Header,
    pub family: AddressFamily,
    pub link_type: L2IfType,
    pub index: u32,
    pub flags: IfInfoFlags,
    /// Flags that changed, or the set to apply on requests.
    pub change: IfInfoFlags,
    /// Indexed by [`LinkAttr`].
    pub attrs: AttrSet,
}

impl IfInfoMessage {
    /// An empty message of `kind`, ready for attributes.
    pub fn new(kind: MessageType) -> Self {
        Self {
            header: Header::new(kind, HeaderFlags::empty()),
            family: AddressFamily::AF_UNSPEC,
            link_type: L2IfType::default(),
            index: 0,
            flags: IfInfoFlags::empty(),
            change: IfInfoFlags::empty(),
            attrs: AttrSet::new(usize::from(LinkAttr::MAX)),
        }
    }

    pub(crate) fn parse(header: Header, body: &[u8], decoder: Decoder<'_>) -> Result<Self> {
        let mut c = Cursor::new(body);
        c.require(IfInfoMsg::SIZE)?;
        let family = AddressFamily(c.u8()?);
        let _pad = c.u8()?;
        let link_type = L2IfType(c.u16()?);
        let index = c.u32()?;
        let flags = IfInfoFlags::from_bits_retain(c.u32()?);
        let change = IfInfoFlags::from_bits_retain(c.u32()?);
        let attrs = decoder.attrs(c.rest(), "IFLA", LinkAttr::MAX, |kind| {
            attr_format(LinkAttr(kind), family)
        })?;
        Ok(Self {
            header,
            family,
            link_type,
            index,
            flags,
            change,
            attrs,
        })
    }

    pub fn serialize(&mut self, tx: &mut TxBuffer) -> Result<()> {
        let fixed = IfInfoMsg {
            ifi_family: self.family.0,
            ifi_pad: 0,
            ifi_type: self.link_type.0,
            ifi_index: self.index,
            ifi_flags: self.flags.bits(),
            ifi_change: self.change.bits(),
        };
        let body = tx.add(&mut self.header, IfInfoMsg::SIZE + self.attrs.size())?;
        let (head, attrs) = body.split_at_mut(IfInfoMsg::SIZE);
        head.copy_from_slice(fixed.as_bytes());
        self.attrs.serialize(attrs)
    }

    pub fn attr(&self, kind: LinkAttr) -> Option<&Attr> {
        self.attrs.get(kind.0)
    }

    /// Set an attribute, returning the previous value.
    pub fn set_attr(&mut self, kind: LinkAttr, attr: Attr) -> Option<Attr> {
        self.attrs.set(kind.0, attr)
    }

    /// Interface name (`IFLA_IFNAME`).
    pub fn name(&self) -> Option<&str> {
        self.attr(LinkAttr::IFLA_IFNAME).and_then(Attr::as_str)
    }

    pub fn mtu(&self) -> Option<u32> {
        self.attr(LinkAttr::IFLA_MTU).and_then(Attr::as_u32)
    }

    /// Hardware address, when it is a 6-byte MAC.
    pub fn address(&self) -> Option<EthernetAddress> {
        self.attr(LinkAttr::IFLA_ADDRESS).and_then(Attr::as_ethernet)
    }

    /// Index of the master device (bridge, bond, VRF).
    pub fn master(&self) -> Option<u32> {
        self.attr(LinkAttr::IFLA_MASTER).and_then(Attr::as_u32)
    }

    pub fn oper_state(&self) -> Option<OperState> {
        match self.attr(LinkAttr::IFLA_OPERSTATE) {
            Some(Attr::OperState(state)) => Some(*state),
            _ => None,
        }
    }

    /// Counters from `IFLA_STATS64`, falling back to the 32-bit `IFLA_STATS`.
    pub fn stats(&self) -> Option<LinkStats64> {
        match self.attr(LinkAttr::IFLA_STATS64) {
            Some(Attr::LinkStats64(stats)) => Some(**stats),
            _ => match self.attr(LinkAttr::IFLA_STATS) {
                Some(Attr::LinkStats(stats)) => Some(LinkStats64::from(**stats)),
                _ => None,
            },
        }
    }

    /// Device kind from `IFLA_LINKINFO` (e.g. "bridge", "vlan").
    pub fn kind(&self) -> Option<&str> {
        self.attr(LinkAttr::IFLA_LINKINFO)
            .and_then(Attr::as_array)
            .and_then(|info| info.attrs.get(LinkInfoAttr::IFLA_INFO_KIND.0))
            .and_then(Attr::as_str)
    }

    pub fn is_up(&self) -> bool {
        self.flags.contains(IfInfoFlags::UP)
    }

    pub fn is_loopback(&self) -> bool {
        self.flags.contains(IfInfoFlags::LOOPBACK)
    }

    pub fn render(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.block(self.header.kind, |p| {
            self.header.render(p)?;
            p.field("index", self.index)?;
            p.field("family", self.family)?;
            p.field("type", self.link_type)?;
            p.field("ifinfo flags", self.flags)?;
            if !self.change.is_empty() {
                p.field("changed flags", self.change)?;
            }
            self.attrs
                .render(p, |kind| LinkAttr(kind).to_string())
        })
    }
}

fn attr_format(kind: LinkAttr, family: AddressFamily) -> Format {
    match kind {
        LinkAttr::IFLA_IFNAME
        | LinkAttr::IFLA_QDISC
        | LinkAttr::IFLA_IFALIAS
        | LinkAttr::IFLA_ALT_IFNAME
        | LinkAttr::IFLA_PHYS_PORT_NAME
        | LinkAttr::IFLA_PARENT_DEV_NAME
        | LinkAttr::IFLA_PARENT_DEV_BUS_NAME => Format::String,

        LinkAttr::IFLA_MTU
        | LinkAttr::IFLA_LINK
        | LinkAttr::IFLA_MASTER
        | LinkAttr::IFLA_WEIGHT
        | LinkAttr::IFLA_NET_NS_PID
        | LinkAttr::IFLA_NET_NS_FD
        | LinkAttr::IFLA_EXT_MASK
        | LinkAttr::IFLA_PROMISCUITY
        | LinkAttr::IFLA_NUM_TX_QUEUES
        | LinkAttr::IFLA_NUM_RX_QUEUES
        | LinkAttr::IFLA_TXQLEN
        | LinkAttr::IFLA_GSO_MAX_SEGS
        | LinkAttr::IFLA_GSO_MAX_SIZE
        | LinkAttr::IFLA_CARRIER_CHANGES
        | LinkAttr::IFLA_GROUP
        | LinkAttr::IFLA_NUM_VF
        | LinkAttr::IFLA_NEW_IFINDEX
        | LinkAttr::IFLA_MIN_MTU
        | LinkAttr::IFLA_MAX_MTU
        | LinkAttr::IFLA_CARRIER_UP_COUNT
        | LinkAttr::IFLA_CARRIER_DOWN_COUNT
        | LinkAttr::IFLA_GRO_MAX_SIZE
        | LinkAttr::IFLA_TSO_MAX_SIZE
        | LinkAttr::IFLA_TSO_MAX_SEGS
        | LinkAttr::IFLA_ALLMULTI
        | LinkAttr::IFLA_GSO_IPV4_MAX_SIZE
        | LinkAttr::IFLA_GRO_IPV4_MAX_SIZE => Format::U32,

        LinkAttr::IFLA_LINK_NETNSID | LinkAttr::IFLA_NEW_NETNSID | LinkAttr::IFLA_TARGET_NETNSID => {
            Format::I32
        }

        LinkAttr::IFLA_CARRIER | LinkAttr::IFLA_LINKMODE | LinkAttr::IFLA_PROTO_DOWN => Format::U8,

        LinkAttr::IFLA_OPERSTATE => Format::OperState,
        LinkAttr::IFLA_STATS => Format::LinkStats,
        LinkAttr::IFLA_STATS64 => Format::LinkStats64,

        // Hardware addresses decode by length; tunnels report IP addresses here.
        LinkAttr::IFLA_ADDRESS | LinkAttr::IFLA_BROADCAST | LinkAttr::IFLA_PERM_ADDRESS => {
            Format::Address(AddressFamily::AF_UNSPEC)
        }

        // Bridge ports nest IFLA_BRIDGE_* here, not per-family trees.
        LinkAttr::IFLA_AF_SPEC if family == AddressFamily::AF_BRIDGE => Format::Hex,
        LinkAttr::IFLA_AF_SPEC => Format::AfSpec,
        LinkAttr::IFLA_LINKINFO => Format::LinkInfo,

        _ => Format::Hex,
    }
}
