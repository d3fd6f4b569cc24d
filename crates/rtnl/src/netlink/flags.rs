//! Flag sets carried in message headers and fixed message bodies.
//!
//! Every set is built with `from_bits_retain` on decode so bits this crate
//! does not name are preserved and re-encoded as received.

use std::fmt;

use bitflags::bitflags;

use super::consts::write_flags;

macro_rules! flag_display {
    ($name:ident, $names:expr) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_flags(f, u64::from(self.bits()), $names)
            }
        }
    };
}

bitflags! {
    /// Netlink header flags (`NLM_F_*`).
    ///
    /// The GET modifiers (`ROOT`, `MATCH`, `ATOMIC`) and the NEW modifiers
    /// (`REPLACE`, `EXCL`, `CREATE`) share bit values; which meaning applies
    /// depends on the request type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HeaderFlags: u16 {
        const REQUEST = 0x01;
        const MULTI = 0x02;
        const ACK = 0x04;
        const ECHO = 0x08;
        const DUMP_INTR = 0x10;
        const DUMP_FILTERED = 0x20;

        const ROOT = 0x100;
        const MATCH = 0x200;
        const ATOMIC = 0x400;
        const DUMP = 0x100 | 0x200;

        const REPLACE = 0x100;
        const EXCL = 0x200;
        const CREATE = 0x400;
        const APPEND = 0x800;
    }
}

flag_display!(
    HeaderFlags,
    &[
        (0x01, "Request"),
        (0x02, "Multipart"),
        (0x04, "ACK"),
        (0x08, "Echo"),
        (0x10, "Interrupt"),
        (0x20, "Filtered"),
        (0x100, "Root"),
        (0x200, "Match"),
        (0x400, "Atomic"),
        (0x800, "Append"),
    ]
);

bitflags! {
    /// Interface flags (`IFF_*`) of `ifinfomsg`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct IfInfoFlags: u32 {
        const UP = 1 << 0;
        const BROADCAST = 1 << 1;
        const DEBUG = 1 << 2;
        const LOOPBACK = 1 << 3;
        const POINTOPOINT = 1 << 4;
        const NOTRAILERS = 1 << 5;
        const RUNNING = 1 << 6;
        const NOARP = 1 << 7;
        const PROMISC = 1 << 8;
        const ALLMULTI = 1 << 9;
        const MASTER = 1 << 10;
        const SLAVE = 1 << 11;
        const MULTICAST = 1 << 12;
        const PORTSEL = 1 << 13;
        const AUTOMEDIA = 1 << 14;
        const DYNAMIC = 1 << 15;
        const LOWER_UP = 1 << 16;
        const DORMANT = 1 << 17;
        const ECHO = 1 << 18;
    }
}

flag_display!(
    IfInfoFlags,
    &[
        (1 << 0, "Admin Up"),
        (1 << 1, "Broadcast"),
        (1 << 2, "Debug"),
        (1 << 3, "Loopback"),
        (1 << 4, "Point To Point"),
        (1 << 5, "No Trailers"),
        (1 << 6, "Running"),
        (1 << 7, "No ARP"),
        (1 << 8, "Promiscuous"),
        (1 << 9, "All Multicast"),
        (1 << 10, "Master"),
        (1 << 11, "Slave"),
        (1 << 12, "Multicast"),
        (1 << 13, "Portsel"),
        (1 << 14, "Automedia"),
        (1 << 15, "Dynamic"),
        (1 << 16, "Link Up"),
        (1 << 17, "Dormant"),
        (1 << 18, "Echo"),
    ]
);

bitflags! {
    /// Address flags (`IFA_F_*`), 8 bits in `ifaddrmsg`, 32 in `IFA_FLAGS`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct IfAddrFlags: u32 {
        const SECONDARY = 1 << 0;
        const TEMPORARY = 1 << 0;
        const NODAD = 1 << 1;
        const OPTIMISTIC = 1 << 2;
        const DADFAILED = 1 << 3;
        const HOMEADDRESS = 1 << 4;
        const DEPRECATED = 1 << 5;
        const TENTATIVE = 1 << 6;
        const PERMANENT = 1 << 7;
        const MANAGETEMPADDR = 1 << 8;
        const NOPREFIXROUTE = 1 << 9;
        const MCAUTOJOIN = 1 << 10;
        const STABLE_PRIVACY = 1 << 11;
    }
}

flag_display!(
    IfAddrFlags,
    &[
        (1 << 0, "SECONDARY"),
        (1 << 1, "NO_DAD"),
        (1 << 2, "OPTIMISTIC"),
        (1 << 3, "DAD_FAILED"),
        (1 << 4, "HOME_ADDRESS"),
        (1 << 5, "DEPRECATED"),
        (1 << 6, "TENTATIVE"),
        (1 << 7, "PERMANENT"),
        (1 << 8, "MANAGETEMPADDR"),
        (1 << 9, "NO_PREFIX_ROUTE"),
        (1 << 10, "MC_AUTO_JOIN"),
        (1 << 11, "STABLE_PRIVACY"),
    ]
);

bitflags! {
    /// Route flags (`RTM_F_*`) of `rtmsg`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RouteFlags: u32 {
        const NOTIFY = 0x100;
        const CLONED = 0x200;
        const EQUALIZE = 0x400;
        const PREFIX = 0x800;
        const LOOKUP_TABLE = 0x1000;
        const FIB_MATCH = 0x2000;
        const OFFLOAD = 0x4000;
        const TRAP = 0x8000;
    }
}

flag_display!(
    RouteFlags,
    &[
        (0x100, "Notify"),
        (0x200, "Cloned"),
        (0x400, "Multipath equalize"),
        (0x800, "Prefix"),
        (0x1000, "Lookup table"),
        (0x2000, "FIB match"),
        (0x4000, "Offload"),
        (0x8000, "Trap"),
    ]
);

bitflags! {
    /// Neighbor cache states (`NUD_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NeighborState: u16 {
        const INCOMPLETE = 0x01;
        const REACHABLE = 0x02;
        const STALE = 0x04;
        const DELAY = 0x08;
        const PROBE = 0x10;
        const FAILED = 0x20;
        const NOARP = 0x40;
        const PERMANENT = 0x80;
    }
}

impl fmt::Display for NeighborState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        write_flags(
            f,
            u64::from(self.bits()),
            &[
                (0x01, "INCOMPLETE"),
                (0x02, "REACHABLE"),
                (0x04, "STALE"),
                (0x08, "DELAY"),
                (0x10, "PROBE"),
                (0x20, "FAILED"),
                (0x40, "NOARP"),
                (0x80, "PERMANENT"),
            ],
        )
    }
}

bitflags! {
    /// Neighbor flags (`NTF_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NeighborFlags: u8 {
        const USE = 1 << 0;
        const SELF = 1 << 1;
        const MASTER = 1 << 2;
        const PROXY = 1 << 3;
        const EXT_LEARNED = 1 << 4;
        const OFFLOADED = 1 << 5;
        const STICKY = 1 << 6;
        const ROUTER = 1 << 7;
    }
}

flag_display!(
    NeighborFlags,
    &[
        (1 << 0, "USE"),
        (1 << 1, "SELF"),
        (1 << 2, "MASTER"),
        (1 << 3, "PROXY"),
        (1 << 4, "LEARNED"),
        (1 << 5, "OFFLOADED"),
        (1 << 6, "STICKY"),
        (1 << 7, "ROUTER"),
    ]
);

bitflags! {
    /// IPv6 per-interface flags carried in `IFLA_INET6_FLAGS`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Ip6IfFlags: u32 {
        const PREFIX_ONLINK = 0x01;
        const PREFIX_AUTOCONF = 0x02;
        const RS_SENT = 0x10;
        const RA_RCVD = 0x20;
        const RA_MANAGED = 0x40;
        const RA_OTHERCONF = 0x80;
        const READY = 0x8000_0000;
    }
}

flag_display!(
    Ip6IfFlags,
    &[
        (0x01, "Prefix On Link"),
        (0x02, "Prefix Autoconf"),
        (0x10, "RS Sent"),
        (0x20, "RA Received"),
        (0x40, "RA Managed"),
        (0x80, "RA Other Conf"),
        (0x8000_0000, "Ready"),
    ]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_is_root_match() {
        assert_eq!(HeaderFlags::DUMP.bits(), 0x300);
        assert_eq!(HeaderFlags::DUMP, HeaderFlags::ROOT | HeaderFlags::MATCH);
        assert_eq!(
            (HeaderFlags::REQUEST | HeaderFlags::DUMP).to_string(),
            "Request | Root | Match"
        );
    }

    #[test]
    fn test_loopback_flags_display() {
        let flags = IfInfoFlags::UP | IfInfoFlags::LOOPBACK | IfInfoFlags::RUNNING;
        assert_eq!(flags.bits(), 0x49);
        assert_eq!(flags.to_string(), "Admin Up | Loopback | Running");
    }

    #[test]
    fn test_unknown_bits_are_retained() {
        let flags = IfInfoFlags::from_bits_retain(0x0100_0001);
        assert_eq!(flags.bits(), 0x0100_0001);
        assert_eq!(flags.to_string(), "Admin Up | 0x1000000");
    }

    #[test]
    fn test_neighbor_state_display() {
        assert_eq!(NeighborState::empty().to_string(), "NONE");
        assert_eq!(
            (NeighborState::REACHABLE | NeighborState::PERMANENT).to_string(),
            "REACHABLE | PERMANENT"
        );
    }

    #[test]
    fn test_ip6_if_flags() {
        let flags = Ip6IfFlags::READY | Ip6IfFlags::RS_SENT;
        assert_eq!(flags.bits(), 0x8000_0010);
        assert_eq!(flags.to_string(), "RS Sent | Ready");
    }
}
