//! Link (interface) wire types: `ifinfomsg`, `IFLA_*` kinds and statistics.

use std::ops::Index;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::consts::named_consts;

/// Interface info message (struct ifinfomsg).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct IfInfoMsg {
    /// Address family (AF_UNSPEC for most link operations).
    pub ifi_family: u8,
    /// Padding.
    pub ifi_pad: u8,
    /// Device type (ARPHRD_*).
    pub ifi_type: u16,
    /// Interface index.
    pub ifi_index: u32,
    /// Device flags (IFF_*).
    pub ifi_flags: u32,
    /// Change mask.
    pub ifi_change: u32,
}

impl IfInfoMsg {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

named_consts! {
    /// Link attribute kind (`IFLA_*`).
    pub struct LinkAttr(u16) {
        IFLA_UNSPEC = 0 => "UNSPEC",
        IFLA_ADDRESS = 1 => "ADDRESS",
        IFLA_BROADCAST = 2 => "BROADCAST",
        IFLA_IFNAME = 3 => "IFNAME",
        IFLA_MTU = 4 => "MTU",
        IFLA_LINK = 5 => "LINK",
        IFLA_QDISC = 6 => "QDISC",
        IFLA_STATS = 7 => "STATS",
        IFLA_COST = 8 => "COST",
        IFLA_PRIORITY = 9 => "PRIORITY",
        IFLA_MASTER = 10 => "MASTER",
        IFLA_WIRELESS = 11 => "WIRELESS",
        IFLA_PROTINFO = 12 => "PROTINFO",
        IFLA_TXQLEN = 13 => "TXQLEN",
        IFLA_MAP = 14 => "MAP",
        IFLA_WEIGHT = 15 => "WEIGHT",
        IFLA_OPERSTATE = 16 => "OPERSTATE",
        IFLA_LINKMODE = 17 => "LINKMODE",
        IFLA_LINKINFO = 18 => "LINKINFO",
        IFLA_NET_NS_PID = 19 => "NET_NS_PID",
        IFLA_IFALIAS = 20 => "IFALIAS",
        IFLA_NUM_VF = 21 => "NUM_VF",
        IFLA_VFINFO_LIST = 22 => "VFINFO_LIST",
        IFLA_STATS64 = 23 => "STATS64",
        IFLA_VF_PORTS = 24 => "VF_PORTS",
        IFLA_PORT_SELF = 25 => "PORT_SELF",
        IFLA_AF_SPEC = 26 => "AF_SPEC",
        IFLA_GROUP = 27 => "GROUP",
        IFLA_NET_NS_FD = 28 => "NET_NS_FD",
        IFLA_EXT_MASK = 29 => "EXT_MASK",
        IFLA_PROMISCUITY = 30 => "PROMISCUITY",
        IFLA_NUM_TX_QUEUES = 31 => "NUM_TX_QUEUES",
        IFLA_NUM_RX_QUEUES = 32 => "NUM_RX_QUEUES",
        IFLA_CARRIER = 33 => "CARRIER",
        IFLA_PHYS_PORT_ID = 34 => "PHYS_PORT_ID",
        IFLA_CARRIER_CHANGES = 35 => "CARRIER_CHANGES",
        IFLA_PHYS_SWITCH_ID = 36 => "PHYS_SWITCH_ID",
        IFLA_LINK_NETNSID = 37 => "LINK_NETNSID",
        IFLA_PHYS_PORT_NAME = 38 => "PHYS_PORT_NAME",
        IFLA_PROTO_DOWN = 39 => "PROTO_DOWN",
        IFLA_GSO_MAX_SEGS = 40 => "GSO_MAX_SEGS",
        IFLA_GSO_MAX_SIZE = 41 => "GSO_MAX_SIZE",
        IFLA_PAD = 42 => "PAD",
        IFLA_XDP = 43 => "XDP",
        IFLA_EVENT = 44 => "EVENT",
        IFLA_NEW_NETNSID = 45 => "NEW_NETNSID",
        IFLA_TARGET_NETNSID = 46 => "TARGET_NETNSID",
        IFLA_CARRIER_UP_COUNT = 47 => "CARRIER_UP_COUNT",
        IFLA_CARRIER_DOWN_COUNT = 48 => "CARRIER_DOWN_COUNT",
        IFLA_NEW_IFINDEX = 49 => "NEW_IFINDEX",
        IFLA_MIN_MTU = 50 => "MIN_MTU",
        IFLA_MAX_MTU = 51 => "MAX_MTU",
        IFLA_PROP_LIST = 52 => "PROP_LIST",
        IFLA_ALT_IFNAME = 53 => "ALT_IFNAME",
        IFLA_PERM_ADDRESS = 54 => "PERM_ADDRESS",
        IFLA_PROTO_DOWN_REASON = 55 => "PROTO_DOWN_REASON",
        IFLA_PARENT_DEV_NAME = 56 => "PARENT_DEV_NAME",
        IFLA_PARENT_DEV_BUS_NAME = 57 => "PARENT_DEV_BUS_NAME",
        IFLA_GRO_MAX_SIZE = 58 => "GRO_MAX_SIZE",
        IFLA_TSO_MAX_SIZE = 59 => "TSO_MAX_SIZE",
        IFLA_TSO_MAX_SEGS = 60 => "TSO_MAX_SEGS",
        IFLA_ALLMULTI = 61 => "ALLMULTI",
        IFLA_DEVLINK_PORT = 62 => "DEVLINK_PORT",
        IFLA_GSO_IPV4_MAX_SIZE = 63 => "GSO_IPV4_MAX_SIZE",
        IFLA_GRO_IPV4_MAX_SIZE = 64 => "GRO_IPV4_MAX_SIZE",
        IFLA_DPLL_PIN = 65 => "DPLL_PIN",
        IFLA_MAX_PACING_OFFLOAD_HORIZON = 66 => "MAX_PACING_OFFLOAD_HORIZON",
        IFLA_NETNS_IMMUTABLE = 67 => "NETNS_IMMUTABLE",
        IFLA_HEADROOM = 68 => "HEADROOM",
        IFLA_TAILROOM = 69 => "TAILROOM",
    }
}

impl LinkAttr {
    /// Number of attribute slots in a link message.
    pub const MAX: u16 = 70;
}

named_consts! {
    /// Nested `IFLA_LINKINFO` attribute kind (`IFLA_INFO_*`).
    pub struct LinkInfoAttr(u16) {
        IFLA_INFO_UNSPEC = 0 => "UNSPEC",
        IFLA_INFO_KIND = 1 => "KIND",
        IFLA_INFO_DATA = 2 => "DATA",
        IFLA_INFO_XSTATS = 3 => "XSTATS",
        IFLA_INFO_SLAVE_KIND = 4 => "SLAVE_KIND",
        IFLA_INFO_SLAVE_DATA = 5 => "SLAVE_DATA",
    }
}

impl LinkInfoAttr {
    pub const MAX: u16 = 6;
}

named_consts! {
    /// Hardware type of a link (`ARPHRD_*`).
    pub struct L2IfType(u16) {
        ARPHRD_NETROM = 0 => "NETROM",
        ARPHRD_ETHER = 1 => "ETHER",
        ARPHRD_EETHER = 2 => "EETHER",
        ARPHRD_AX25 = 3 => "AX25",
        ARPHRD_PRONET = 4 => "PRONET",
        ARPHRD_CHAOS = 5 => "CHAOS",
        ARPHRD_IEEE802 = 6 => "IEEE802",
        ARPHRD_ARCNET = 7 => "ARCNET",
        ARPHRD_APPLETLK = 8 => "APPLETLK",
        ARPHRD_DLCI = 15 => "DLCI",
        ARPHRD_ATM = 19 => "ATM",
        ARPHRD_METRICOM = 23 => "METRICOM",
        ARPHRD_IEEE1394 = 24 => "IEEE1394",
        ARPHRD_EUI64 = 27 => "EUI64",
        ARPHRD_INFINIBAND = 32 => "INFINIBAND",
        ARPHRD_SLIP = 256 => "SLIP",
        ARPHRD_CSLIP = 257 => "CSLIP",
        ARPHRD_SLIP6 = 258 => "SLIP6",
        ARPHRD_CSLIP6 = 259 => "CSLIP6",
        ARPHRD_RSRVD = 260 => "RSRVD",
        ARPHRD_ADAPT = 264 => "ADAPT",
        ARPHRD_ROSE = 270 => "ROSE",
        ARPHRD_X25 = 271 => "X25",
        ARPHRD_HWX25 = 272 => "HWX25",
        ARPHRD_CAN = 280 => "CAN",
        ARPHRD_PPP = 512 => "PPP",
        ARPHRD_HDLC = 513 => "HDLC",
        ARPHRD_LAPB = 516 => "LAPB",
        ARPHRD_DDCMP = 517 => "DDCMP",
        ARPHRD_RAWHDLC = 518 => "RAWHDLC",
        ARPHRD_RAWIP = 519 => "RAWIP",
        ARPHRD_TUNNEL = 768 => "TUNNEL",
        ARPHRD_TUNNEL6 = 769 => "TUNNEL6",
        ARPHRD_FRAD = 770 => "FRAD",
        ARPHRD_SKIP = 771 => "SKIP",
        ARPHRD_LOOPBACK = 772 => "LOOPBACK",
        ARPHRD_LOCALTLK = 773 => "LOCALTLK",
        ARPHRD_FDDI = 774 => "FDDI",
        ARPHRD_BIF = 775 => "BIF",
        ARPHRD_SIT = 776 => "SIT",
        ARPHRD_IPDDP = 777 => "IPDDP",
        ARPHRD_IPGRE = 778 => "IPGRE",
        ARPHRD_PIMREG = 779 => "PIMREG",
        ARPHRD_HIPPI = 780 => "HIPPI",
        ARPHRD_ASH = 781 => "ASH",
        ARPHRD_ECONET = 782 => "ECONET",
        ARPHRD_IRDA = 783 => "IRDA",
        ARPHRD_FCPP = 784 => "FCPP",
        ARPHRD_FCAL = 785 => "FCAL",
        ARPHRD_FCPL = 786 => "FCPL",
        ARPHRD_FCFABRIC = 787 => "FCFABRIC",
        ARPHRD_IEEE802_TR = 800 => "IEEE802_TR",
        ARPHRD_IEEE80211 = 801 => "IEEE80211",
        ARPHRD_IEEE80211_PRISM = 802 => "IEEE80211_PRISM",
        ARPHRD_IEEE80211_RADIOTAP = 803 => "IEEE80211_RADIOTAP",
        ARPHRD_IEEE802154 = 804 => "IEEE802154",
        ARPHRD_IEEE802154_MONITOR = 805 => "IEEE802154_MONITOR",
        ARPHRD_IP6GRE = 823 => "IP6GRE",
        ARPHRD_NETLINK = 824 => "NETLINK",
        ARPHRD_6LOWPAN = 825 => "6LOWPAN",
        ARPHRD_VSOCKMON = 826 => "VSOCKMON",
        ARPHRD_VOID = 0xFFFF => "VOID",
        ARPHRD_NONE = 0xFFFE => "NONE",
    }
}

named_consts! {
    /// RFC 2863 operational state carried in `IFLA_OPERSTATE`.
    pub struct OperState(u8) {
        UNKNOWN = 0 => "unknown",
        NOT_PRESENT = 1 => "not present",
        DOWN = 2 => "down",
        LOWER_LAYER_DOWN = 3 => "lower layer down",
        TESTING = 4 => "testing",
        DORMANT = 5 => "dormant",
        UP = 6 => "up",
    }
}

named_consts! {
    /// Index into the link statistics counter tables.
    pub struct LinkStat(usize) {
        RX_PACKETS = 0 => "Rx Packets",
        TX_PACKETS = 1 => "Tx Packets",
        RX_BYTES = 2 => "Rx Bytes",
        TX_BYTES = 3 => "Tx Bytes",
        RX_ERRORS = 4 => "Rx Errors",
        TX_ERRORS = 5 => "Tx Errors",
        RX_DROPPED = 6 => "Rx Drops",
        TX_DROPPED = 7 => "Tx Drops",
        MULTICAST = 8 => "Rx Multicast Packets",
        COLLISIONS = 9 => "Collisions",
        RX_LENGTH_ERRORS = 10 => "Rx Length Errors",
        RX_OVER_ERRORS = 11 => "Rx Overrun Errors",
        RX_CRC_ERRORS = 12 => "Rx CRC Errors",
        RX_FRAME_ERRORS = 13 => "Rx Frame Errors",
        RX_FIFO_ERRORS = 14 => "Rx Fifo Errors",
        RX_MISSED_ERRORS = 15 => "Rx Missed Errors",
        TX_ABORTED_ERRORS = 16 => "Tx Aborts",
        TX_CARRIER_ERRORS = 17 => "Tx Carrier Errors",
        TX_FIFO_ERRORS = 18 => "Tx Fifo Errors",
        TX_HEARTBEAT_ERRORS = 19 => "Tx Heartbeat Errors",
        TX_WINDOW_ERRORS = 20 => "Tx Window Errors",
        RX_COMPRESSED = 21 => "Rx Compressed Packets",
        TX_COMPRESSED = 22 => "Tx Compressed Packets",
    }
}

/// Number of counters in `rtnl_link_stats` that are decoded.
pub const LINK_STATS_LEN: usize = 23;

/// 32-bit link statistics (`IFLA_STATS`).
///
/// Newer kernels append counters (`rx_nohandler`, ...); only the first
/// [`LINK_STATS_LEN`] are kept.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct LinkStats(pub [u32; LINK_STATS_LEN]);

/// 64-bit link statistics (`IFLA_STATS64`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct LinkStats64(pub [u64; LINK_STATS_LEN]);

impl Index<LinkStat> for LinkStats {
    type Output = u32;

    fn index(&self, stat: LinkStat) -> &u32 {
        &self.0[stat.0]
    }
}

impl Index<LinkStat> for LinkStats64 {
    type Output = u64;

    fn index(&self, stat: LinkStat) -> &u64 {
        &self.0[stat.0]
    }
}

impl LinkStats64 {
    /// Counters as (name, value), in kernel order.
    pub fn iter(&self) -> impl Iterator<Item = (LinkStat, u64)> + '_ {
        self.0.iter().enumerate().map(|(i, v)| (LinkStat(i), *v))
    }

    pub fn total_packets(&self) -> u64 {
        self[LinkStat::RX_PACKETS] + self[LinkStat::TX_PACKETS]
    }

    pub fn total_bytes(&self) -> u64 {
        self[LinkStat::RX_BYTES] + self[LinkStat::TX_BYTES]
    }
}

impl LinkStats {
    /// Counters as (name, value), in kernel order.
    pub fn iter(&self) -> impl Iterator<Item = (LinkStat, u64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, v)| (LinkStat(i), u64::from(*v)))
    }
}

impl From<LinkStats> for LinkStats64 {
    fn from(stats: LinkStats) -> Self {
        Self(stats.0.map(u64::from))
    }
}
