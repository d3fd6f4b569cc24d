//! Route wire types: `rtmsg`, `RTA_*` kinds and the route enumerations.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::consts::named_consts;

/// Route message (struct rtmsg).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RtMsg {
    pub rtm_family: u8,
    pub rtm_dst_len: u8,
    pub rtm_src_len: u8,
    pub rtm_tos: u8,
    pub rtm_table: u8,
    pub rtm_protocol: u8,
    pub rtm_scope: u8,
    pub rtm_type: u8,
    pub rtm_flags: u32,
}

impl RtMsg {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

named_consts! {
    /// Route attribute kind (`RTA_*`).
    pub struct RouteAttr(u16) {
        RTA_UNSPEC = 0 => "UNSPEC",
        RTA_DST = 1 => "DST",
        RTA_SRC = 2 => "SRC",
        RTA_IIF = 3 => "IIF",
        RTA_OIF = 4 => "OIF",
        RTA_GATEWAY = 5 => "GATEWAY",
        RTA_PRIORITY = 6 => "PRIORITY",
        RTA_PREFSRC = 7 => "PREFSRC",
        RTA_METRICS = 8 => "METRICS",
        RTA_MULTIPATH = 9 => "MULTIPATH",
        RTA_PROTOINFO = 10 => "PROTOINFO",
        RTA_FLOW = 11 => "FLOW",
        RTA_CACHEINFO = 12 => "CACHEINFO",
        RTA_SESSION = 13 => "SESSION",
        RTA_MP_ALGO = 14 => "MP_ALGO",
        RTA_TABLE = 15 => "TABLE",
        RTA_MARK = 16 => "MARK",
        RTA_MFC_STATS = 17 => "MFC_STATS",
        RTA_VIA = 18 => "VIA",
        RTA_NEWDST = 19 => "NEWDST",
        RTA_PREF = 20 => "PREF",
        RTA_ENCAP_TYPE = 21 => "ENCAP_TYPE",
        RTA_ENCAP = 22 => "ENCAP",
        RTA_EXPIRES = 23 => "EXPIRES",
        RTA_PAD = 24 => "PAD",
        RTA_UID = 25 => "UID",
        RTA_TTL_PROPAGATE = 26 => "TTL_PROPAGATE",
        RTA_IP_PROTO = 27 => "IP_PROTO",
        RTA_SPORT = 28 => "SPORT",
        RTA_DPORT = 29 => "DPORT",
        RTA_NH_ID = 30 => "NH_ID",
    }
}

impl RouteAttr {
    pub const MAX: u16 = 31;
}

named_consts! {
    /// Route and address scope (`RT_SCOPE_*`).
    pub struct RtScope(u8) {
        UNIVERSE = 0 => "Universe",
        SITE = 200 => "Site",
        LINK = 253 => "Link",
        HOST = 254 => "Host",
        NOWHERE = 255 => "Nowhere",
    }
}

named_consts! {
    /// Route type (`RTN_*`).
    pub struct RouteType(u8) {
        UNSPEC = 0 => "UNSPEC",
        UNICAST = 1 => "UNICAST",
        LOCAL = 2 => "LOCAL",
        BROADCAST = 3 => "BROADCAST",
        ANYCAST = 4 => "ANYCAST",
        MULTICAST = 5 => "MULTICAST",
        BLACKHOLE = 6 => "DROP",
        UNREACHABLE = 7 => "UNREACHABLE",
        PROHIBIT = 8 => "PROHIBIT",
        THROW = 9 => "THROW",
        NAT = 10 => "NAT",
        XRESOLVE = 11 => "XRESOLVE",
    }
}

named_consts! {
    /// Originator of a route (`RTPROT_*`).
    pub struct RouteProtocol(u8) {
        UNSPEC = 0 => "UNSPEC",
        REDIRECT = 1 => "REDIRECT",
        KERNEL = 2 => "KERNEL",
        BOOT = 3 => "BOOT",
        STATIC = 4 => "STATIC",
        GATED = 8 => "GATED",
        RA = 9 => "RA",
        MRT = 10 => "MRT",
        ZEBRA = 11 => "ZEBRA",
        BIRD = 12 => "BIRD",
        DNROUTED = 13 => "DNROUTED",
        XORP = 14 => "XORP",
        NTK = 15 => "NTK",
        DHCP = 16 => "DHCP",
        MROUTED = 17 => "MROUTED",
        KEEPALIVED = 18 => "KEEPALIVED",
        BABEL = 42 => "BABEL",
        OPENR = 99 => "OPENR",
        BGP = 186 => "BGP",
        ISIS = 187 => "ISIS",
        OSPF = 188 => "OSPF",
        RIP = 189 => "RIP",
        EIGRP = 192 => "EIGRP",
    }
}

named_consts! {
    /// Well-known routing table ids (`RT_TABLE_*`).
    pub struct RouteTable(u32) {
        UNSPEC = 0 => "unspec",
        COMPAT = 252 => "compat",
        DEFAULT = 253 => "default",
        MAIN = 254 => "main",
        LOCAL = 255 => "local",
    }
}

/// Route cache info (struct rta_cacheinfo).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RtaCacheInfo {
    pub clntref: u32,
    pub lastuse: u32,
    pub expires: i32,
    pub error: u32,
    pub used: u32,
    pub id: u32,
    pub ts: u32,
    pub tsage: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(RtMsg::SIZE, 12);
        assert_eq!(std::mem::size_of::<RtaCacheInfo>(), 32);
    }

    #[test]
    fn test_names() {
        assert_eq!(RouteType::BLACKHOLE.to_string(), "DROP");
        assert_eq!(RtScope::LINK.to_string(), "Link");
        assert_eq!(RouteProtocol::BABEL.0, 42);
        assert_eq!(RouteTable::MAIN.to_string(), "main");
        assert_eq!(RouteAttr::RTA_ENCAP.0, 22);
    }
}
