//! RTNetlink message type definitions.

pub mod addr;
pub mod inet;
pub mod link;
pub mod neigh;
pub mod nsid;
pub mod route;

// Re-export commonly used types
pub use addr::{AddrAttr, IfAddrCacheInfo, IfAddrMsg};
pub use inet::{Inet6Attr, InetAttr, Ip6IfCacheInfo};
pub use link::{IfInfoMsg, L2IfType, LinkAttr, LinkInfoAttr, LinkStat, LinkStats, LinkStats64, OperState};
pub use neigh::{NdMsg, NdaCacheInfo, NeighborAttr};
pub use nsid::{NetnsAttr, RtGenMsg};
pub use route::{RouteAttr, RouteProtocol, RouteTable, RouteType, RtMsg, RtScope, RtaCacheInfo};
