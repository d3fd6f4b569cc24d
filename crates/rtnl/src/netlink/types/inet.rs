//! Per-family link configuration nested under `IFLA_AF_SPEC`.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::consts::named_consts;

named_consts! {
    /// IPv4 link attribute kind (`IFLA_INET_*`).
    pub struct InetAttr(u16) {
        IFLA_INET_UNSPEC = 0 => "UNSPEC",
        IFLA_INET_CONF = 1 => "CONF",
    }
}

impl InetAttr {
    pub const MAX: u16 = 2;
}

named_consts! {
    /// IPv6 link attribute kind (`IFLA_INET6_*`).
    pub struct Inet6Attr(u16) {
        IFLA_INET6_UNSPEC = 0 => "UNSPEC",
        IFLA_INET6_FLAGS = 1 => "FLAGS",
        IFLA_INET6_CONF = 2 => "CONF",
        IFLA_INET6_STATS = 3 => "STATS",
        IFLA_INET6_MCAST = 4 => "MULTICAST",
        IFLA_INET6_CACHEINFO = 5 => "CACHEINFO",
        IFLA_INET6_ICMP6STATS = 6 => "ICMP6STATS",
        IFLA_INET6_TOKEN = 7 => "TOKEN",
        IFLA_INET6_ADDR_GEN_MODE = 8 => "ADDR_GEN_MODE",
        IFLA_INET6_RA_MTU = 9 => "RA_MTU",
    }
}

impl Inet6Attr {
    pub const MAX: u16 = 10;
}

/// IPv6 interface timers (struct ifla_cacheinfo).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Ip6IfCacheInfo {
    pub max_reasm_len: u32,
    /// Creation timestamp, hundredths of seconds since boot.
    pub tstamp: u32,
    /// Milliseconds.
    pub reachable_time: u32,
    /// Milliseconds.
    pub retrans_time: u32,
}

/// Names of `IPV4_DEVCONF_*` entries. Entry `i` is kind `i + 1`; the kernel
/// table has no slot for kind 0.
pub static IPV4_DEVCONF_NAMES: [&str; 29] = [
    "Forwarding",
    "Multicast Forwarding",
    "Proxy ARP",
    "Accept Redirects",
    "Secure Redirects",
    "Send Redirects",
    "Shared Media",
    "Rp Filter",
    "Accept Source Route",
    "BOOTP Relay",
    "Log Martians",
    "Tag",
    "ARP Filter",
    "Medium ID",
    "No Xfrm",
    "No Policy",
    "Force IGMP Version",
    "ARP Announce",
    "ARP Ignore",
    "Promote Secondaries",
    "ARP Accept",
    "ARP Notify",
    "Accept Local",
    "Src Vmark",
    "Proxy ARP Pvlan",
    "Route Localnet",
    "IGMPV2 Unsolicited Report Interval",
    "IGMPV3 Unsolicited Report Interval",
    "Ignore Routes With Linkdown",
];

/// Names of `DEVCONF_*` (IPv6) entries, indexed from 0.
pub static IPV6_DEVCONF_NAMES: [&str; 40] = [
    "Forwarding",
    "Hop Limit",
    "MTU",
    "Accept RA",
    "Accept Redirects",
    "Autoconf",
    "DAD Transmits",
    "Router Solicits",
    "Router Solicit Interval",
    "Router Solicit Delay",
    "Use Temp Address",
    "Temp Valid Left",
    "Temp Preferred Left",
    "Regen Max Retry",
    "Max Desync Factor",
    "Max Addresses",
    "Force MLD Version",
    "Accept RA Default Router",
    "Accept RA Pinfo",
    "Accept RA Router Pref",
    "Router Probe Interval",
    "Accept Ra Rt Info Max Plen",
    "Proxy Ndp",
    "Optimistic DAD",
    "Accept Source Route",
    "Multicast Forwarding",
    "Disable IPV6",
    "Accept Dad",
    "Force Tllao",
    "Ndisc Notify",
    "Mldv1 Unsolicited Report Interval",
    "Mldv2 Unsolicited Report Interval",
    "Suppress Frag Ndisc",
    "Accept Ra From Local",
    "Use Optimistic",
    "Accept Ra MTU",
    "Stable Secret",
    "Use OIF Addrs Only",
    "Accept RA Min Hop Limit",
    "Ignore Routes With Linkdown",
];

/// Display name of the `index`-th value of an IPv4 devconf table.
pub fn ipv4_devconf_name(index: usize) -> Option<&'static str> {
    IPV4_DEVCONF_NAMES.get(index).copied()
}

/// Display name of the `index`-th value of an IPv6 devconf table.
pub fn ipv6_devconf_name(index: usize) -> Option<&'static str> {
    IPV6_DEVCONF_NAMES.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devconf_names() {
        assert_eq!(ipv4_devconf_name(0), Some("Forwarding"));
        assert_eq!(ipv4_devconf_name(28), Some("Ignore Routes With Linkdown"));
        assert_eq!(ipv4_devconf_name(29), None);
        assert_eq!(ipv6_devconf_name(2), Some("MTU"));
        assert_eq!(ipv6_devconf_name(40), None);
    }

    #[test]
    fn test_inet6_names() {
        assert_eq!(Inet6Attr::IFLA_INET6_MCAST.to_string(), "MULTICAST");
        assert_eq!(Inet6Attr(9).to_string(), "RA_MTU");
        assert_eq!(InetAttr::IFLA_INET_CONF.to_string(), "CONF");
        assert_eq!(std::mem::size_of::<Ip6IfCacheInfo>(), 16);
    }
}
