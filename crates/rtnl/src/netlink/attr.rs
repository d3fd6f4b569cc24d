//! Netlink attribute (rtattr/nlattr) handling.
//!
//! Attributes decode into the closed [`Attr`] enum. Which variant a kind
//! decodes to is decided by the message family through a [`Format`]; kinds
//! this crate has no format for are kept as [`Attr::Hex`].

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::consts::AddressFamily;
use super::error::{Error, Result};
use super::flags::{IfAddrFlags, Ip6IfFlags};
use super::parse::{exact, nla_align, parse_attr, parse_string_from_bytes, parse_u32_table, prefix};
use super::pool::{AttrPool, AttrSet};
use super::render::Printer;
use super::types::inet::{ipv4_devconf_name, ipv6_devconf_name};
use super::types::{
    IfAddrCacheInfo, Inet6Attr, InetAttr, Ip6IfCacheInfo, LinkInfoAttr, LinkStat, LinkStats,
    LinkStats64, NdaCacheInfo, OperState, RtaCacheInfo,
};

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4;

/// Netlink attribute header (mirrors struct nlattr / struct rtattr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    /// Length including header.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

/// Exclusive bound on address families inside `IFLA_AF_SPEC` (`AF_MAX`).
const AF_SPEC_MAX: u16 = 46;

impl NlAttr {
    /// Create a new attribute header.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        }
    }

    /// Get the attribute type without flags.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Check if this is a nested attribute.
    pub fn is_nested(&self) -> bool {
        self.nla_type & NLA_F_NESTED != 0
    }
}

/// Iterator over netlink attributes in a buffer.
///
/// Yields `(kind, payload)` with the flag bits masked off. Fewer than
/// [`NLA_HDRLEN`] trailing bytes are treated as padding. A header whose
/// length is below the header size or past the buffer ends iteration with
/// an error.
pub struct AttrIter<'a> {
    data: &'a [u8],
}

impl<'a> AttrIter<'a> {
    /// Create a new attribute iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = Result<(u16, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < NLA_HDRLEN {
            return None;
        }

        let declared = NlAttr::read_from_prefix(self.data)
            .map(|(hdr, _)| usize::from(hdr.nla_len))
            .unwrap_or(NLA_HDRLEN);
        let mut input = self.data;
        match parse_attr(&mut input) {
            Ok((kind, payload)) => {
                self.data = input;
                Some(Ok((kind & NLA_TYPE_MASK, payload)))
            }
            Err(_) => {
                let actual = self.data.len();
                self.data = &[];
                Some(Err(Error::Truncated {
                    expected: declared.max(NLA_HDRLEN),
                    actual,
                }))
            }
        }
    }
}

/// 48-bit hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EthernetAddress(pub [u8; 6]);

impl fmt::Display for EthernetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a[0], a[1], a[2], a[3], a[4], a[5]
        )
    }
}

/// Decoded attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    String(String),
    Ethernet(EthernetAddress),
    Ip4(Ipv4Addr),
    Ip6(Ipv6Addr),
    OperState(OperState),
    IfAddrFlags(IfAddrFlags),
    Ip6IfFlags(Ip6IfFlags),
    LinkStats(Box<LinkStats>),
    LinkStats64(Box<LinkStats64>),
    IfAddrCacheInfo(IfAddrCacheInfo),
    NdaCacheInfo(NdaCacheInfo),
    RtaCacheInfo(RtaCacheInfo),
    Ip6IfCacheInfo(Ip6IfCacheInfo),
    /// `IPV4_DEVCONF_*` values; entry `i` is kind `i + 1`.
    Ip4DevConf(Vec<u32>),
    /// `DEVCONF_*` values indexed from 0.
    Ip6DevConf(Vec<u32>),
    /// Payload kept verbatim.
    Hex(Vec<u8>),
    /// Nested attribute tree.
    Array(Box<AttrArray>),
}

/// Nested attribute table and the descriptor naming its slots.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrArray {
    pub kind: AttrType,
    pub attrs: AttrSet,
}

/// What the slots of a nested [`AttrArray`] are indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    /// Children of `IFLA_AF_SPEC`, one per address family.
    AddressFamily,
    /// `IFLA_INET_*`.
    Inet,
    /// `IFLA_INET6_*`.
    Inet6,
    /// `IFLA_INFO_*`.
    LinkInfo,
}

impl AttrType {
    /// Display name of slot `index`.
    pub fn name(self, index: u16) -> String {
        match self {
            Self::AddressFamily => u8::try_from(index)
                .map(|af| AddressFamily(af).to_string())
                .unwrap_or_else(|_| index.to_string()),
            Self::Inet => InetAttr(index).to_string(),
            Self::Inet6 => Inet6Attr(index).to_string(),
            Self::LinkInfo => LinkInfoAttr(index).to_string(),
        }
    }
}

impl Attr {
    /// Decode one attribute payload as `format`.
    pub fn parse(format: Format, data: &[u8]) -> Result<Self> {
        Decoder::default().decode(format, data)
    }

    /// Exact, unpadded encoded length of the value.
    pub fn size(&self) -> usize {
        match self {
            Self::I8(_) | Self::U8(_) | Self::OperState(_) => 1,
            Self::I16(_) | Self::U16(_) => 2,
            Self::I32(_) | Self::U32(_) | Self::IfAddrFlags(_) | Self::Ip6IfFlags(_) => 4,
            Self::I64(_) | Self::U64(_) => 8,
            Self::String(s) => s.len() + 1,
            Self::Ethernet(_) => 6,
            Self::Ip4(_) => 4,
            Self::Ip6(_) => 16,
            Self::LinkStats(_) => std::mem::size_of::<LinkStats>(),
            Self::LinkStats64(_) => std::mem::size_of::<LinkStats64>(),
            Self::IfAddrCacheInfo(_) => std::mem::size_of::<IfAddrCacheInfo>(),
            Self::NdaCacheInfo(_) => std::mem::size_of::<NdaCacheInfo>(),
            Self::RtaCacheInfo(_) => std::mem::size_of::<RtaCacheInfo>(),
            Self::Ip6IfCacheInfo(_) => std::mem::size_of::<Ip6IfCacheInfo>(),
            Self::Ip4DevConf(v) | Self::Ip6DevConf(v) => v.len() * 4,
            Self::Hex(b) => b.len(),
            Self::Array(a) => a.attrs.size(),
        }
    }

    /// Encode into `buf`, which must be exactly [`size`](Self::size) bytes.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<()> {
        let size = self.size();
        if buf.len() != size {
            return Err(Error::Truncated {
                expected: size,
                actual: buf.len(),
            });
        }
        match self {
            Self::I8(v) => buf.copy_from_slice(&v.to_ne_bytes()),
            Self::I16(v) => buf.copy_from_slice(&v.to_ne_bytes()),
            Self::I32(v) => buf.copy_from_slice(&v.to_ne_bytes()),
            Self::I64(v) => buf.copy_from_slice(&v.to_ne_bytes()),
            Self::U8(v) => buf.copy_from_slice(&v.to_ne_bytes()),
            Self::U16(v) => buf.copy_from_slice(&v.to_ne_bytes()),
            Self::U32(v) => buf.copy_from_slice(&v.to_ne_bytes()),
            Self::U64(v) => buf.copy_from_slice(&v.to_ne_bytes()),
            Self::String(s) => {
                let (text, nul) = buf.split_at_mut(s.len());
                text.copy_from_slice(s.as_bytes());
                nul.fill(0);
            }
            Self::Ethernet(a) => buf.copy_from_slice(&a.0),
            Self::Ip4(a) => buf.copy_from_slice(&a.octets()),
            Self::Ip6(a) => buf.copy_from_slice(&a.octets()),
            Self::OperState(s) => buf.copy_from_slice(&[s.0]),
            Self::IfAddrFlags(f) => buf.copy_from_slice(&f.bits().to_ne_bytes()),
            Self::Ip6IfFlags(f) => buf.copy_from_slice(&f.bits().to_ne_bytes()),
            Self::LinkStats(s) => buf.copy_from_slice(s.as_bytes()),
            Self::LinkStats64(s) => buf.copy_from_slice(s.as_bytes()),
            Self::IfAddrCacheInfo(c) => buf.copy_from_slice(c.as_bytes()),
            Self::NdaCacheInfo(c) => buf.copy_from_slice(c.as_bytes()),
            Self::RtaCacheInfo(c) => buf.copy_from_slice(c.as_bytes()),
            Self::Ip6IfCacheInfo(c) => buf.copy_from_slice(c.as_bytes()),
            Self::Ip4DevConf(v) | Self::Ip6DevConf(v) => {
                for (chunk, value) in buf.chunks_exact_mut(4).zip(v) {
                    chunk.copy_from_slice(&value.to_ne_bytes());
                }
            }
            Self::Hex(b) => buf.copy_from_slice(b),
            Self::Array(a) => a.attrs.serialize(buf)?,
        }
        Ok(())
    }

    /// Whether the value renders as an indented block rather than inline.
    pub fn is_multiline(&self) -> bool {
        matches!(
            self,
            Self::LinkStats(_)
                | Self::LinkStats64(_)
                | Self::IfAddrCacheInfo(_)
                | Self::NdaCacheInfo(_)
                | Self::RtaCacheInfo(_)
                | Self::Ip6IfCacheInfo(_)
                | Self::Ip4DevConf(_)
                | Self::Ip6DevConf(_)
                | Self::Array(_)
        )
    }

    /// Render the value; multi-line values write one line per field.
    pub fn render(&self, p: &mut Printer<'_>) -> fmt::Result {
        match self {
            Self::LinkStats(s) => render_stats(p, s.iter()),
            Self::LinkStats64(s) => render_stats(p, s.iter()),
            Self::IfAddrCacheInfo(c) => {
                p.field("prefered", c.prefered)?;
                p.field("valid", c.valid)?;
                p.field("created", c.cstamp)?;
                p.field("updated", c.tstamp)
            }
            Self::NdaCacheInfo(c) => {
                p.field("confirmed", c.ndm_confirmed)?;
                p.field("used", c.ndm_used)?;
                p.field("updated", c.ndm_updated)?;
                p.field("refcnt", c.ndm_refcnt)
            }
            Self::RtaCacheInfo(c) => {
                p.field("clntref", c.clntref)?;
                p.field("lastuse", c.lastuse)?;
                p.field("expires", c.expires)?;
                p.field("error", c.error)?;
                p.field("used", c.used)
            }
            Self::Ip6IfCacheInfo(c) => {
                p.field("max reasm len", c.max_reasm_len)?;
                p.field("tstamp", c.tstamp)?;
                p.field("reachable time", c.reachable_time)?;
                p.field("retrans time", c.retrans_time)
            }
            Self::Ip4DevConf(v) => render_devconf(p, v, ipv4_devconf_name),
            Self::Ip6DevConf(v) => render_devconf(p, v, ipv6_devconf_name),
            Self::Array(a) => a.attrs.render(p, |kind| a.kind.name(kind)),
            single => p.line(format_args!("{single}")),
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Self::U8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Self::U16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// IP address, for `Ip4` and `Ip6` values.
    pub fn as_ip(&self) -> Option<IpAddr> {
        match self {
            Self::Ip4(a) => Some(IpAddr::V4(*a)),
            Self::Ip6(a) => Some(IpAddr::V6(*a)),
            _ => None,
        }
    }

    pub fn as_ethernet(&self) -> Option<EthernetAddress> {
        match self {
            Self::Ethernet(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&AttrArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::Ethernet(a) => write!(f, "{a}"),
            Self::Ip4(a) => write!(f, "{a}"),
            Self::Ip6(a) => write!(f, "{a}"),
            Self::OperState(s) => write!(f, "{s}"),
            Self::IfAddrFlags(flags) => write!(f, "{flags}"),
            Self::Ip6IfFlags(flags) => write!(f, "{flags}"),
            Self::Hex(bytes) => bytes.iter().try_for_each(|b| write!(f, "{b:02x}")),
            multiline => multiline.render(&mut Printer::new(f)),
        }
    }
}

fn render_stats(p: &mut Printer<'_>, counters: impl Iterator<Item = (LinkStat, u64)>) -> fmt::Result {
    for (stat, value) in counters {
        if value != 0 || stat == LinkStat::RX_PACKETS || stat == LinkStat::TX_PACKETS {
            p.field(&stat.to_string(), value)?;
        }
    }
    Ok(())
}

fn render_devconf(
    p: &mut Printer<'_>,
    values: &[u32],
    name: fn(usize) -> Option<&'static str>,
) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if *value == 0 {
            continue;
        }
        match name(i) {
            Some(name) => p.field(name, value)?,
            None => p.field(&i.to_string(), value)?,
        }
    }
    Ok(())
}

impl AttrSet {
    /// Encoded size of every present attribute, headers and padding included.
    pub fn size(&self) -> usize {
        self.iter()
            .map(|(_, attr)| NLA_HDRLEN + nla_align(attr.size()))
            .sum()
    }

    /// Encode present attributes as TLVs into `buf` of exactly
    /// [`size`](Self::size) bytes.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<()> {
        let size = self.size();
        if buf.len() != size {
            return Err(Error::Truncated {
                expected: size,
                actual: buf.len(),
            });
        }

        let mut rest = buf;
        for (kind, attr) in self.iter() {
            let len = attr.size();
            if NLA_HDRLEN + len > usize::from(u16::MAX) {
                return Err(Error::InvalidAttribute(format!(
                    "attribute {kind} too long: {len} bytes"
                )));
            }
            let (record, tail) = rest.split_at_mut(NLA_HDRLEN + nla_align(len));
            let (header, body) = record.split_at_mut(NLA_HDRLEN);
            header.copy_from_slice(NlAttr::new(kind, len).as_bytes());
            let (value, padding) = body.split_at_mut(len);
            attr.serialize(value)?;
            padding.fill(0);
            rest = tail;
        }
        Ok(())
    }

    /// Render each present attribute as `NAME: value` or a `NAME:` block.
    pub fn render(&self, p: &mut Printer<'_>, name: impl Fn(u16) -> String) -> fmt::Result {
        for (kind, attr) in self.iter() {
            if attr.is_multiline() {
                p.block(name(kind), |p| attr.render(p))?;
            } else {
                p.field(&name(kind), attr)?;
            }
        }
        Ok(())
    }
}

/// How the payload of one attribute kind decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    String,
    /// IP or hardware address. A message family of INET or INET6 requires
    /// the matching length; otherwise the length decides.
    Address(AddressFamily),
    Ip6,
    OperState,
    IfAddrFlags,
    Ip6IfFlags,
    LinkStats,
    LinkStats64,
    IfAddrCacheInfo,
    NdaCacheInfo,
    RtaCacheInfo,
    Ip6IfCacheInfo,
    Ip4DevConf,
    Ip6DevConf,
    AfSpec,
    Inet,
    Inet6,
    LinkInfo,
    Hex,
}

/// Attribute decoder drawing slot tables from an optional pool.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Decoder<'p> {
    pool: Option<&'p Arc<AttrPool>>,
}

impl<'p> Decoder<'p> {
    pub(crate) fn new(pool: Option<&'p Arc<AttrPool>>) -> Self {
        Self { pool }
    }

    fn slots(&self, len: u16) -> AttrSet {
        match self.pool {
            Some(pool) => pool.slots(usize::from(len)),
            None => AttrSet::new(usize::from(len)),
        }
    }

    /// Decode a TLV run into a table of `max` slots.
    ///
    /// A kind at or past `max` fails with [`Error::UnknownAttribute`]. A
    /// repeated kind keeps the last occurrence.
    pub(crate) fn attrs(
        &self,
        data: &[u8],
        family: &'static str,
        max: u16,
        format: impl Fn(u16) -> Format,
    ) -> Result<AttrSet> {
        let mut set = self.slots(max);
        for item in AttrIter::new(data) {
            let (kind, payload) = item?;
            if kind >= max {
                return Err(Error::UnknownAttribute { family, kind, max });
            }
            let attr = self.decode(format(kind), payload)?;
            set.set(kind, attr);
        }
        Ok(set)
    }

    pub(crate) fn decode(&self, format: Format, data: &[u8]) -> Result<Attr> {
        let attr = match format {
            Format::I8 => Attr::I8(exact(data)?),
            Format::I16 => Attr::I16(exact(data)?),
            Format::I32 => Attr::I32(exact(data)?),
            Format::I64 => Attr::I64(exact(data)?),
            Format::U8 => Attr::U8(exact(data)?),
            Format::U16 => Attr::U16(exact(data)?),
            Format::U32 => Attr::U32(exact(data)?),
            Format::U64 => Attr::U64(exact(data)?),
            Format::String => Attr::String(parse_string_from_bytes(data)),
            Format::Address(family) => decode_address(family, data)?,
            Format::Ip6 => Attr::Ip6(Ipv6Addr::from(exact::<[u8; 16]>(data)?)),
            Format::OperState => Attr::OperState(OperState(exact(data)?)),
            Format::IfAddrFlags => Attr::IfAddrFlags(IfAddrFlags::from_bits_retain(exact(data)?)),
            Format::Ip6IfFlags => Attr::Ip6IfFlags(Ip6IfFlags::from_bits_retain(exact(data)?)),
            Format::LinkStats => Attr::LinkStats(Box::new(prefix(data)?)),
            Format::LinkStats64 => Attr::LinkStats64(Box::new(prefix(data)?)),
            Format::IfAddrCacheInfo => Attr::IfAddrCacheInfo(exact(data)?),
            Format::NdaCacheInfo => Attr::NdaCacheInfo(exact(data)?),
            Format::RtaCacheInfo => Attr::RtaCacheInfo(exact(data)?),
            Format::Ip6IfCacheInfo => Attr::Ip6IfCacheInfo(exact(data)?),
            Format::Ip4DevConf => Attr::Ip4DevConf(devconf(data)?),
            Format::Ip6DevConf => Attr::Ip6DevConf(devconf(data)?),
            Format::AfSpec => self.array(data, AttrType::AddressFamily, "AF", AF_SPEC_MAX, af_spec_format)?,
            Format::Inet => self.array(data, AttrType::Inet, "IFLA_INET", InetAttr::MAX, inet_format)?,
            Format::Inet6 => self.array(data, AttrType::Inet6, "IFLA_INET6", Inet6Attr::MAX, inet6_format)?,
            Format::LinkInfo => {
                self.array(data, AttrType::LinkInfo, "IFLA_INFO", LinkInfoAttr::MAX, link_info_format)?
            }
            Format::Hex => Attr::Hex(data.to_vec()),
        };
        Ok(attr)
    }

    fn array(
        &self,
        data: &[u8],
        kind: AttrType,
        family: &'static str,
        max: u16,
        format: fn(u16) -> Format,
    ) -> Result<Attr> {
        let attrs = self.attrs(data, family, max, format)?;
        Ok(Attr::Array(Box::new(AttrArray { kind, attrs })))
    }
}

fn decode_address(family: AddressFamily, data: &[u8]) -> Result<Attr> {
    let required = match family {
        AddressFamily::AF_INET => Some(4),
        AddressFamily::AF_INET6 => Some(16),
        _ => None,
    };
    if let Some(expected) = required
        && data.len() != expected
    {
        return Err(Error::Truncated {
            expected,
            actual: data.len(),
        });
    }

    let attr = match data.len() {
        4 => Attr::Ip4(Ipv4Addr::from(exact::<[u8; 4]>(data)?)),
        16 => Attr::Ip6(Ipv6Addr::from(exact::<[u8; 16]>(data)?)),
        6 => Attr::Ethernet(EthernetAddress(exact(data)?)),
        _ => Attr::Hex(data.to_vec()),
    };
    Ok(attr)
}

fn devconf(data: &[u8]) -> Result<Vec<u32>> {
    let mut input = data;
    parse_u32_table(&mut input).map_err(|_| {
        Error::InvalidAttribute(format!(
            "device config of {} bytes is not a non-empty multiple of 4",
            data.len()
        ))
    })
}

fn af_spec_format(kind: u16) -> Format {
    match kind {
        k if k == u16::from(AddressFamily::AF_INET.0) => Format::Inet,
        k if k == u16::from(AddressFamily::AF_INET6.0) => Format::Inet6,
        _ => Format::Hex,
    }
}

fn inet_format(kind: u16) -> Format {
    match InetAttr(kind) {
        InetAttr::IFLA_INET_CONF => Format::Ip4DevConf,
        _ => Format::Hex,
    }
}

fn inet6_format(kind: u16) -> Format {
    match Inet6Attr(kind) {
        Inet6Attr::IFLA_INET6_FLAGS => Format::Ip6IfFlags,
        Inet6Attr::IFLA_INET6_CONF => Format::Ip6DevConf,
        Inet6Attr::IFLA_INET6_CACHEINFO => Format::Ip6IfCacheInfo,
        Inet6Attr::IFLA_INET6_TOKEN => Format::Ip6,
        Inet6Attr::IFLA_INET6_ADDR_GEN_MODE => Format::U8,
        Inet6Attr::IFLA_INET6_RA_MTU => Format::U32,
        _ => Format::Hex,
    }
}

fn link_info_format(kind: u16) -> Format {
    match LinkInfoAttr(kind) {
        LinkInfoAttr::IFLA_INFO_KIND | LinkInfoAttr::IFLA_INFO_SLAVE_KIND => Format::String,
        _ => Format::Hex,
    }
}
