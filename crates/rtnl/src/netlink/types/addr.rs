//! Address wire types: `ifaddrmsg`, `IFA_*` kinds and cache info.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::consts::named_consts;

/// Interface address message (struct ifaddrmsg).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct IfAddrMsg {
    /// Address family.
    pub ifa_family: u8,
    /// Prefix length.
    pub ifa_prefixlen: u8,
    /// Low 8 bits of the address flags (IFA_F_*).
    pub ifa_flags: u8,
    /// Address scope (RT_SCOPE_*).
    pub ifa_scope: u8,
    /// Interface index.
    pub ifa_index: u32,
}

impl IfAddrMsg {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

named_consts! {
    /// Address attribute kind (`IFA_*`).
    pub struct AddrAttr(u16) {
        IFA_UNSPEC = 0 => "UNSPEC",
        IFA_ADDRESS = 1 => "ADDRESS",
        IFA_LOCAL = 2 => "LOCAL",
        IFA_LABEL = 3 => "LABEL",
        IFA_BROADCAST = 4 => "BROADCAST",
        IFA_ANYCAST = 5 => "ANYCAST",
        IFA_CACHEINFO = 6 => "CACHEINFO",
        IFA_MULTICAST = 7 => "MULTICAST",
        IFA_FLAGS = 8 => "FLAGS",
        IFA_RT_PRIORITY = 9 => "RT_PRIORITY",
        IFA_TARGET_NETNSID = 10 => "TARGET_NETNSID",
        IFA_PROTO = 11 => "PROTO",
    }
}

impl AddrAttr {
    pub const MAX: u16 = 12;
}

/// Address lifetimes (struct ifa_cacheinfo).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct IfAddrCacheInfo {
    /// Preferred lifetime in seconds.
    pub prefered: u32,
    /// Valid lifetime in seconds.
    pub valid: u32,
    /// Creation timestamp (hundredths of seconds since boot).
    pub cstamp: u32,
    /// Last update timestamp.
    pub tstamp: u32,
}

impl IfAddrCacheInfo {
    /// Lifetime value meaning "forever".
    pub const INFINITY: u32 = u32::MAX;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(IfAddrMsg::SIZE, 8);
        assert_eq!(std::mem::size_of::<IfAddrCacheInfo>(), 16);
    }

    #[test]
    fn test_names() {
        assert_eq!(AddrAttr::IFA_LABEL.to_string(), "LABEL");
        assert_eq!(AddrAttr::IFA_FLAGS.0, 8);
        assert_eq!(AddrAttr(12).name(), None);
    }
}
