//! Namespace ID wire types and constants.
//!
//! These are used for RTM_NEWNSID, RTM_DELNSID, and RTM_GETNSID messages
//! which track network namespace IDs.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::consts::named_consts;

named_consts! {
    /// Namespace ID attribute kind (`NETNSA_*`).
    pub struct NetnsAttr(u16) {
        NETNSA_NONE = 0 => "NONE",
        /// Namespace ID (i32).
        NETNSA_NSID = 1 => "NSID",
        /// Process ID (u32).
        NETNSA_PID = 2 => "PID",
        /// File descriptor (u32).
        NETNSA_FD = 3 => "FD",
        /// Target namespace ID for queries (i32).
        NETNSA_TARGET_NSID = 4 => "TARGET_NSID",
        /// Current namespace ID (i32).
        NETNSA_CURRENT_NSID = 5 => "CURRENT_NSID",
    }
}

impl NetnsAttr {
    pub const MAX: u16 = 6;
}

/// NSID value reported for a peer namespace that has no id assigned.
pub const NETNSA_NSID_NOT_ASSIGNED: i32 = -1;

/// rtgenmsg structure.
///
/// The body of generic dump requests. Namespace messages pad it to 4 bytes
/// before their attributes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RtGenMsg {
    /// Address family (usually AF_UNSPEC = 0)
    pub rtgen_family: u8,
}

impl RtGenMsg {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Size of this struct inside namespace messages (includes padding to 4 bytes).
    pub const fn padded_size() -> usize {
        4 // 1 byte + 3 bytes padding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtgenmsg_size() {
        assert_eq!(RtGenMsg::SIZE, 1);
        assert_eq!(RtGenMsg::padded_size(), 4);
    }

    #[test]
    fn test_names() {
        assert_eq!(NetnsAttr::NETNSA_NSID.to_string(), "NSID");
        assert_eq!(NetnsAttr::NETNSA_CURRENT_NSID.0, 5);
    }
}
