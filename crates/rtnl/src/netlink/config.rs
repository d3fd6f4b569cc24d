//! Connection configuration.

use std::path::{Path, PathBuf};

use super::consts::{AddressFamily, MessageType, MulticastGroup};

/// One dump issued by [`Connection::listen`](super::Connection::listen)
/// before it switches to streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenRequest {
    pub kind: MessageType,
    pub family: AddressFamily,
}

impl ListenRequest {
    pub const fn new(kind: MessageType, family: AddressFamily) -> Self {
        Self { kind, family }
    }

    /// Placeholder that is skipped. Listening with only this request
    /// streams multicast without an initial dump.
    pub const NOOP: Self = Self::new(MessageType::NLMSG_NOOP, AddressFamily::AF_UNSPEC);

    pub const LINKS: &'static [Self] = &[Self::new(MessageType::RTM_GETLINK, AddressFamily::AF_PACKET)];

    pub const ADDRESSES: &'static [Self] = &[
        Self::new(MessageType::RTM_GETADDR, AddressFamily::AF_INET),
        Self::new(MessageType::RTM_GETADDR, AddressFamily::AF_INET6),
    ];

    pub const ROUTES: &'static [Self] = &[
        Self::new(MessageType::RTM_GETROUTE, AddressFamily::AF_INET),
        Self::new(MessageType::RTM_GETROUTE, AddressFamily::AF_INET6),
    ];

    pub const NEIGHBORS: &'static [Self] = &[
        Self::new(MessageType::RTM_GETNEIGH, AddressFamily::AF_INET),
        Self::new(MessageType::RTM_GETNEIGH, AddressFamily::AF_INET6),
    ];

    pub const NSIDS: &'static [Self] = &[Self::new(MessageType::RTM_GETNSID, AddressFamily::AF_UNSPEC)];

    /// Links first so addresses and routes can be resolved against them.
    pub const DEFAULT: &'static [Self] = &[
        Self::new(MessageType::RTM_GETLINK, AddressFamily::AF_PACKET),
        Self::new(MessageType::RTM_GETADDR, AddressFamily::AF_INET),
        Self::new(MessageType::RTM_GETROUTE, AddressFamily::AF_INET),
        Self::new(MessageType::RTM_GETNEIGH, AddressFamily::AF_INET),
        Self::new(MessageType::RTM_GETADDR, AddressFamily::AF_INET6),
        Self::new(MessageType::RTM_GETNEIGH, AddressFamily::AF_INET6),
        Self::new(MessageType::RTM_GETROUTE, AddressFamily::AF_INET6),
    ];

    pub fn is_noop(&self) -> bool {
        self.kind == MessageType::NLMSG_NOOP
    }
}

/// Settings for [`Connection::open`](super::Connection::open).
///
/// # Example
///
/// ```ignore
/// use rtnl::netlink::{Config, Connection, ListenRequest, MulticastGroup};
///
/// let config = Config::new()
///     .groups(&[MulticastGroup::RTNLGRP_LINK])
///     .listen_requests(ListenRequest::LINKS)
///     .receive_buffer(4 << 20);
/// let (conn, messages) = Connection::open(config)?;
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) groups: Vec<MulticastGroup>,
    pub(crate) receive_buffer: usize,
    pub(crate) send_buffer: usize,
    pub(crate) verify_buffers: bool,
    pub(crate) channel_depth: usize,
    pub(crate) pool_capacity: usize,
    pub(crate) dump_attempts: u32,
    pub(crate) listen_requests: Vec<ListenRequest>,
    pub(crate) namespace: Option<PathBuf>,
    pub(crate) listen_all_nsid: bool,
}

impl Config {
    pub const DEFAULT_BUFFER: usize = 1024 << 10;
    pub const DEFAULT_CHANNEL_DEPTH: usize = 64;
    pub const DEFAULT_POOL_CAPACITY: usize = 256;
    pub const DEFAULT_DUMP_ATTEMPTS: u32 = 5;

    pub fn new() -> Self {
        Self::default()
    }

    /// Multicast groups to join. `NOOP` entries are ignored; an
    /// empty list selects [`MulticastGroup::DEFAULT`].
    pub fn groups(mut self, groups: &[MulticastGroup]) -> Self {
        self.groups = groups.to_vec();
        self
    }

    /// `SO_RCVBUF` request in bytes; 0 keeps the kernel default.
    pub fn receive_buffer(mut self, bytes: usize) -> Self {
        self.receive_buffer = bytes;
        self
    }

    /// `SO_SNDBUF` request in bytes; 0 keeps the kernel default.
    pub fn send_buffer(mut self, bytes: usize) -> Self {
        self.send_buffer = bytes;
        self
    }

    /// Fail [`Connection::open`](super::Connection::open) when the kernel
    /// grants less buffer space than requested. Otherwise the shortfall is
    /// only logged.
    pub fn verify_buffers(mut self, verify: bool) -> Self {
        self.verify_buffers = verify;
        self
    }

    /// Capacity of the decoded-message channel.
    pub fn channel_depth(mut self, depth: usize) -> Self {
        self.channel_depth = depth.max(1);
        self
    }

    /// Idle attribute tables kept for reuse.
    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Times a dump request is sent before an error reply fails `listen`.
    pub fn dump_attempts(mut self, attempts: u32) -> Self {
        self.dump_attempts = attempts.max(1);
        self
    }

    /// Dumps issued by `listen` when called with no requests.
    pub fn listen_requests(mut self, requests: &[ListenRequest]) -> Self {
        self.listen_requests = requests.to_vec();
        self
    }

    /// Open the socket inside the network namespace at `path`
    /// (e.g. `/var/run/netns/blue` or `/proc/<pid>/ns/net`).
    pub fn namespace(mut self, path: impl AsRef<Path>) -> Self {
        self.namespace = Some(path.as_ref().to_path_buf());
        self
    }

    /// Also receive notifications from every peer namespace that has an
    /// nsid assigned here (`NETLINK_LISTEN_ALL_NSID`). Each such message
    /// carries the id in [`Header::nsid`](super::Header::nsid).
    pub fn listen_all_nsid(mut self, enable: bool) -> Self {
        self.listen_all_nsid = enable;
        self
    }

    /// Bitmask of joined groups, `1 << group` each.
    pub(crate) fn group_mask(&self) -> u32 {
        if self.groups.is_empty() {
            MulticastGroup::mask(MulticastGroup::DEFAULT)
        } else {
            MulticastGroup::mask(&self.groups)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            groups: MulticastGroup::DEFAULT.to_vec(),
            receive_buffer: Self::DEFAULT_BUFFER,
            send_buffer: Self::DEFAULT_BUFFER,
            verify_buffers: false,
            channel_depth: Self::DEFAULT_CHANNEL_DEPTH,
            pool_capacity: Self::DEFAULT_POOL_CAPACITY,
            dump_attempts: Self::DEFAULT_DUMP_ATTEMPTS,
            listen_requests: ListenRequest::DEFAULT.to_vec(),
            namespace: None,
            listen_all_nsid: false,
        }
    }
}
