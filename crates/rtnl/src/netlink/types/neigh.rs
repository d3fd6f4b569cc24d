//! Neighbor (ARP/NDP) wire types.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::consts::named_consts;

/// Neighbor message (struct ndmsg).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NdMsg {
    /// Address family.
    pub ndm_family: u8,
    /// Padding.
    pub ndm_pad1: u8,
    /// Padding.
    pub ndm_pad2: u16,
    /// Interface index.
    pub ndm_ifindex: u32,
    /// Neighbor state (NUD_*).
    pub ndm_state: u16,
    /// Neighbor flags (NTF_*).
    pub ndm_flags: u8,
    /// Neighbor type (RTN_*).
    pub ndm_type: u8,
}

impl NdMsg {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

named_consts! {
    /// Neighbor attribute kind (`NDA_*`).
    pub struct NeighborAttr(u16) {
        NDA_UNSPEC = 0 => "UNSPEC",
        NDA_DST = 1 => "DST",
        NDA_LLADDR = 2 => "LLADDR",
        NDA_CACHEINFO = 3 => "CACHEINFO",
        NDA_PROBES = 4 => "PROBES",
        NDA_VLAN = 5 => "VLAN",
        NDA_PORT = 6 => "PORT",
        NDA_VNI = 7 => "VNI",
        NDA_IFINDEX = 8 => "IFINDEX",
        NDA_MASTER = 9 => "MASTER",
        NDA_LINK_NETNSID = 10 => "LINK_NETNSID",
        NDA_SRC_VNI = 11 => "SRC_VNI",
        NDA_PROTOCOL = 12 => "PROTOCOL",
        NDA_NH_ID = 13 => "NH_ID",
        NDA_FDB_EXT_ATTRS = 14 => "FDB_EXT_ATTRS",
        NDA_FLAGS_EXT = 15 => "FLAGS_EXT",
        NDA_NDM_STATE_MASK = 16 => "NDM_STATE_MASK",
        NDA_NDM_FLAGS_MASK = 17 => "NDM_FLAGS_MASK",
    }
}

impl NeighborAttr {
    pub const MAX: u16 = 18;
}

/// Neighbor cache info (struct nda_cacheinfo).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NdaCacheInfo {
    pub ndm_confirmed: u32,
    pub ndm_used: u32,
    pub ndm_updated: u32,
    pub ndm_refcnt: u32,
}
