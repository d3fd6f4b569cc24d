//! Numeric enumerations shared by every NETLINK_ROUTE message.
//!
//! Kernel enumerations are open: the kernel may send values this crate does
//! not know yet. They are therefore modelled as transparent newtypes with
//! associated constants instead of closed Rust enums, and unknown values
//! survive a decode/encode round trip unchanged.

/// Declare a newtype over an integer with named constants and a name table.
///
/// Generates associated constants, `name()`, `From` conversions in both
/// directions and a `Display` that prints the symbolic name or, for
/// unknown values, the number.
macro_rules! named_consts {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($repr:ty) {
            $(
                $(#[$cmeta:meta])*
                $konst:ident = $value:expr => $label:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        $vis struct $name(pub $repr);

        impl $name {
            $(
                $(#[$cmeta])*
                pub const $konst: Self = Self($value);
            )*

            /// Symbolic name of this value, if known.
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $( v if v == $value => Some($label), )*
                    _ => None,
                }
            }
        }

        impl From<$repr> for $name {
            fn from(v: $repr) -> Self {
                Self(v)
            }
        }

        impl From<$name> for $repr {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "{}", self.0),
                }
            }
        }
    };
}

pub(crate) use named_consts;

named_consts! {
    /// Netlink message type (`nlmsg_type`).
    pub struct MessageType(u16) {
        NLMSG_NOOP = 1 => "NLMSG_NOOP",
        NLMSG_ERROR = 2 => "NLMSG_ERROR",
        NLMSG_DONE = 3 => "NLMSG_DONE",
        NLMSG_OVERRUN = 4 => "NLMSG_OVERRUN",

        RTM_NEWLINK = 16 => "RTM_NEWLINK",
        RTM_DELLINK = 17 => "RTM_DELLINK",
        RTM_GETLINK = 18 => "RTM_GETLINK",
        RTM_SETLINK = 19 => "RTM_SETLINK",

        RTM_NEWADDR = 20 => "RTM_NEWADDR",
        RTM_DELADDR = 21 => "RTM_DELADDR",
        RTM_GETADDR = 22 => "RTM_GETADDR",

        RTM_NEWROUTE = 24 => "RTM_NEWROUTE",
        RTM_DELROUTE = 25 => "RTM_DELROUTE",
        RTM_GETROUTE = 26 => "RTM_GETROUTE",

        RTM_NEWNEIGH = 28 => "RTM_NEWNEIGH",
        RTM_DELNEIGH = 29 => "RTM_DELNEIGH",
        RTM_GETNEIGH = 30 => "RTM_GETNEIGH",

        RTM_NEWRULE = 32 => "RTM_NEWRULE",
        RTM_DELRULE = 33 => "RTM_DELRULE",
        RTM_GETRULE = 34 => "RTM_GETRULE",

        RTM_NEWQDISC = 36 => "RTM_NEWQDISC",
        RTM_DELQDISC = 37 => "RTM_DELQDISC",
        RTM_GETQDISC = 38 => "RTM_GETQDISC",

        RTM_NEWTCLASS = 40 => "RTM_NEWTCLASS",
        RTM_DELTCLASS = 41 => "RTM_DELTCLASS",
        RTM_GETTCLASS = 42 => "RTM_GETTCLASS",

        RTM_NEWTFILTER = 44 => "RTM_NEWTFILTER",
        RTM_DELTFILTER = 45 => "RTM_DELTFILTER",
        RTM_GETTFILTER = 46 => "RTM_GETTFILTER",

        RTM_NEWACTION = 48 => "RTM_NEWACTION",
        RTM_DELACTION = 49 => "RTM_DELACTION",
        RTM_GETACTION = 50 => "RTM_GETACTION",

        RTM_NEWPREFIX = 52 => "RTM_NEWPREFIX",
        RTM_GETMULTICAST = 58 => "RTM_GETMULTICAST",
        RTM_GETANYCAST = 62 => "RTM_GETANYCAST",

        RTM_NEWNEIGHTBL = 64 => "RTM_NEWNEIGHTBL",
        RTM_GETNEIGHTBL = 66 => "RTM_GETNEIGHTBL",
        RTM_SETNEIGHTBL = 67 => "RTM_SETNEIGHTBL",

        RTM_NEWNDUSEROPT = 68 => "RTM_NEWNDUSEROPT",

        RTM_NEWADDRLABEL = 72 => "RTM_NEWADDRLABEL",
        RTM_DELADDRLABEL = 73 => "RTM_DELADDRLABEL",
        RTM_GETADDRLABEL = 74 => "RTM_GETADDRLABEL",

        RTM_GETDCB = 78 => "RTM_GETDCB",
        RTM_SETDCB = 79 => "RTM_SETDCB",

        RTM_NEWNETCONF = 80 => "RTM_NEWNETCONF",
        RTM_GETNETCONF = 82 => "RTM_GETNETCONF",

        RTM_NEWMDB = 84 => "RTM_NEWMDB",
        RTM_DELMDB = 85 => "RTM_DELMDB",
        RTM_GETMDB = 86 => "RTM_GETMDB",

        RTM_NEWNSID = 88 => "RTM_NEWNSID",
        RTM_DELNSID = 89 => "RTM_DELNSID",
        RTM_GETNSID = 90 => "RTM_GETNSID",
    }
}

impl MessageType {
    /// Check if this is one of the netlink control types (NOOP..OVERRUN).
    pub fn is_control(self) -> bool {
        (1..=4).contains(&self.0)
    }
}

named_consts! {
    /// RTNetlink multicast group, as a bit index.
    ///
    /// The bind mask bit for a group is `1 << group`.
    pub struct MulticastGroup(u32) {
        RTNLGRP_LINK = 0 => "LINK",
        RTNLGRP_NOTIFY = 1 => "NOTIFY",
        RTNLGRP_NEIGH = 2 => "NEIGH",
        RTNLGRP_TC = 3 => "TC",
        RTNLGRP_IPV4_IFADDR = 4 => "IPV4_IFADDR",
        RTNLGRP_IPV4_MROUTE = 5 => "IPV4_MROUTE",
        RTNLGRP_IPV4_ROUTE = 6 => "IPV4_ROUTE",
        RTNLGRP_IPV4_RULE = 7 => "IPV4_RULE",
        RTNLGRP_IPV6_IFADDR = 8 => "IPV6_IFADDR",
        RTNLGRP_IPV6_MROUTE = 9 => "IPV6_MROUTE",
        RTNLGRP_IPV6_ROUTE = 10 => "IPV6_ROUTE",
        RTNLGRP_IPV6_IFINFO = 11 => "IPV6_IFINFO",
        RTNLGRP_DECNET_IFADDR = 12 => "DECNET_IFADDR",
        RTNLGRP_NOP2 = 13 => "NOP2",
        RTNLGRP_DECNET_ROUTE = 14 => "DECNET_ROUTE",
        RTNLGRP_DECNET_RULE = 15 => "DECNET_RULE",
        RTNLGRP_NOP4 = 16 => "NOP4",
        RTNLGRP_IPV6_PREFIX = 17 => "IPV6_PREFIX",
        RTNLGRP_IPV6_RULE = 18 => "IPV6_RULE",
        RTNLGRP_ND_USEROPT = 19 => "ND_USEROPT",
        RTNLGRP_PHONET_IFADDR = 20 => "PHONET_IFADDR",
        RTNLGRP_PHONET_ROUTE = 21 => "PHONET_ROUTE",
        RTNLGRP_DCB = 22 => "DCB",
        RTNLGRP_IPV4_NETCONF = 23 => "IPV4_NETCONF",
        RTNLGRP_IPV6_NETCONF = 24 => "IPV6_NETCONF",
        RTNLGRP_MDB = 25 => "MDB",
        RTNLGRP_MPLS_ROUTE = 26 => "MPLS_ROUTE",
        RTNLGRP_NSID = 27 => "NSID",
        /// Placeholder that joins nothing.
        NOOP = u32::MAX => "NOOP",
    }
}

impl MulticastGroup {
    /// Groups joined when the caller does not choose any.
    pub const DEFAULT: &'static [MulticastGroup] = &[
        Self::RTNLGRP_LINK,
        Self::RTNLGRP_NEIGH,
        Self::RTNLGRP_IPV4_IFADDR,
        Self::RTNLGRP_IPV4_ROUTE,
        Self::RTNLGRP_IPV4_MROUTE,
        Self::RTNLGRP_IPV6_IFADDR,
        Self::RTNLGRP_IPV6_ROUTE,
        Self::RTNLGRP_IPV6_MROUTE,
    ];

    /// Bind mask for a set of groups. `NOOP` and indices past 31 are skipped.
    pub fn mask(groups: &[MulticastGroup]) -> u32 {
        groups
            .iter()
            .filter(|g| **g != Self::NOOP)
            .filter_map(|g| 1u32.checked_shl(g.0))
            .fold(0, |mask, bit| mask | bit)
    }
}

named_consts! {
    /// Address family (`AF_*`).
    pub struct AddressFamily(u8) {
        AF_UNSPEC = 0 => "UNSPEC",
        AF_UNIX = 1 => "UNIX",
        AF_INET = 2 => "INET",
        AF_AX25 = 3 => "AX25",
        AF_IPX = 4 => "IPX",
        AF_APPLETALK = 5 => "APPLETALK",
        AF_NETROM = 6 => "NETROM",
        AF_BRIDGE = 7 => "BRIDGE",
        AF_ATMPVC = 8 => "ATMPVC",
        AF_X25 = 9 => "X25",
        AF_INET6 = 10 => "INET6",
        AF_ROSE = 11 => "ROSE",
        AF_DECNET = 12 => "DECNET",
        AF_NETBEUI = 13 => "NETBEUI",
        AF_SECURITY = 14 => "SECURITY",
        AF_KEY = 15 => "KEY",
        AF_NETLINK = 16 => "NETLINK",
        AF_PACKET = 17 => "PACKET",
        AF_ASH = 18 => "ASH",
        AF_ECONET = 19 => "ECONET",
        AF_ATMSVC = 20 => "ATMSVC",
        AF_RDS = 21 => "RDS",
        AF_SNA = 22 => "SNA",
        AF_IRDA = 23 => "IRDA",
        AF_PPPOX = 24 => "PPPOX",
        AF_WANPIPE = 25 => "WANPIPE",
        AF_LLC = 26 => "LLC",
        AF_IB = 27 => "IB",
        AF_MPLS = 28 => "MPLS",
        AF_CAN = 29 => "CAN",
        AF_TIPC = 30 => "TIPC",
        AF_BLUETOOTH = 31 => "BLUETOOTH",
        AF_IUCV = 32 => "IUCV",
        AF_RXRPC = 33 => "RXRPC",
        AF_ISDN = 34 => "ISDN",
        AF_PHONET = 35 => "PHONET",
        AF_IEEE802154 = 36 => "IEEE802154",
        AF_CAIF = 37 => "CAIF",
        AF_ALG = 38 => "ALG",
        AF_NFC = 39 => "NFC",
        AF_VSOCK = 40 => "VSOCK",
    }
}

/// Write `names` of the bits set in `bits` joined with `" | "`.
///
/// Bits without a name are collected and printed once in hex.
pub(crate) fn write_flags(
    f: &mut std::fmt::Formatter<'_>,
    bits: u64,
    names: &[(u64, &str)],
) -> std::fmt::Result {
    let mut rest = bits;
    let mut first = true;
    for &(bit, name) in names {
        if bits & bit == bit && bit != 0 {
            if !first {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
            rest &= !bit;
            first = false;
        }
    }
    if rest != 0 {
        if !first {
            f.write_str(" | ")?;
        }
        write!(f, "{:#x}", rest)?;
    } else if first {
        f.write_str("0")?;
    }
    Ok(())
}
