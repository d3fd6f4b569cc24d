//! NETLINK_ROUTE socket and the transport seam used by [`Connection`](super::Connection).

use std::fs::File;
use std::future::Future;
use std::io;
use std::mem;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;
use std::ptr;

use bytes::BytesMut;
use netlink_sys::{Socket, SocketAddr, protocols};
use tokio::io::Interest;
use tokio::io::unix::AsyncFd;
use tracing::{debug, warn};

use super::config::Config;
use super::error::{Error, Result};

/// Datagram transport carrying netlink records.
///
/// [`NetlinkSocket`] is the real implementation. Anything else that moves
/// whole datagrams (an in-memory pair in tests, for instance) can drive a
/// [`Connection`](super::Connection) too.
pub trait Transport: Send + Sync + 'static {
    /// Port id the kernel assigned at bind.
    fn port_id(&self) -> u32;

    /// Write one datagram, returning the number of bytes accepted.
    fn send(&self, buf: &[u8]) -> impl Future<Output = io::Result<usize>> + Send;

    /// Read one datagram, appending it to `buf`.
    ///
    /// A [`Datagram`] of length zero means the peer is gone.
    fn recv(&self, buf: &mut BytesMut) -> impl Future<Output = io::Result<Datagram>> + Send;
}

/// One datagram read by a [`Transport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Datagram {
    /// Bytes appended to the read buffer.
    pub len: usize,
    /// Namespace id the kernel attached, present only for broadcasts from
    /// a peer namespace on a socket listening on all namespaces.
    pub nsid: Option<i32>,
}

/// Non-blocking `AF_NETLINK`/`NETLINK_ROUTE` socket registered with tokio.
pub struct NetlinkSocket {
    fd: AsyncFd<Socket>,
    port_id: u32,
}

impl NetlinkSocket {
    /// Create, bind and size a socket as described by `config`.
    ///
    /// When `config` names a network namespace the calling thread enters it
    /// for the duration of socket creation and returns to its own namespace
    /// afterwards. The socket stays in the namespace it was created in.
    pub fn open(config: &Config) -> Result<Self> {
        match &config.namespace {
            Some(path) => Self::open_in_namespace(config, path),
            None => Self::create(config),
        }
    }

    fn open_in_namespace(config: &Config, path: &Path) -> Result<Self> {
        let target = File::open(path).map_err(|e| {
            Error::InvalidMessage(format!("cannot open namespace '{}': {}", path.display(), e))
        })?;
        let current = File::open("/proc/self/ns/net")
            .map_err(|e| Error::InvalidMessage(format!("cannot open current namespace: {}", e)))?;

        // SAFETY: both descriptors stay open for the duration of the calls
        // and refer to network namespace files.
        let ret = unsafe { libc::setns(target.as_raw_fd(), libc::CLONE_NEWNET) };
        if ret < 0 {
            return Err(Error::Io(io::Error::last_os_error()));
        }

        let result = Self::create(config);

        // SAFETY: see above.
        let restore = unsafe { libc::setns(current.as_raw_fd(), libc::CLONE_NEWNET) };
        if restore < 0 {
            warn!(
                error = %io::Error::last_os_error(),
                "failed to restore original network namespace"
            );
        }

        result
    }

    fn create(config: &Config) -> Result<Self> {
        let mut socket = Socket::new(protocols::NETLINK_ROUTE)?;
        socket.set_non_blocking(true)?;

        let groups = config.group_mask();
        let mut addr = SocketAddr::new(0, groups);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;
        let port_id = addr.port_number();

        if config.listen_all_nsid {
            socket.set_listen_all_namespaces(true)?;
        }

        let fd = socket.as_raw_fd();
        if config.receive_buffer > 0 {
            set_buffer(fd, &RCVBUF, config.receive_buffer, config.verify_buffers)?;
        }
        if config.send_buffer > 0 {
            set_buffer(fd, &SNDBUF, config.send_buffer, config.verify_buffers)?;
        }

        debug!(
            port_id,
            groups,
            all_nsid = config.listen_all_nsid,
            "netlink socket bound"
        );

        // SAFETY: the socket owns its descriptor and moves into the AsyncFd,
        // which keeps it open and unchanged until it is dropped.
        let fd = unsafe { AsyncFd::register(socket) }.map_err(io::Error::from)?;
        Ok(Self { fd, port_id })
    }

    pub fn port_id(&self) -> u32 {
        self.port_id
    }

    /// Effective `SO_RCVBUF` as reported by the kernel.
    pub fn receive_buffer(&self) -> Result<usize> {
        Ok(getsockopt_int(self.as_raw_fd(), RCVBUF.option)?)
    }

    /// Effective `SO_SNDBUF` as reported by the kernel.
    pub fn send_buffer(&self) -> Result<usize> {
        Ok(getsockopt_int(self.as_raw_fd(), SNDBUF.option)?)
    }
}

impl Transport for NetlinkSocket {
    fn port_id(&self) -> u32 {
        self.port_id
    }

    async fn send(&self, buf: &[u8]) -> io::Result<usize> {
        loop {
            let mut guard = self.fd.ready(Interest::WRITABLE).await?;
            match guard.try_io(|inner| inner.get_ref().send(buf, 0)) {
                Ok(result) => return result,
                Err(_would_block) => continue,
            }
        }
    }

    async fn recv(&self, buf: &mut BytesMut) -> io::Result<Datagram> {
        loop {
            let mut guard = self.fd.ready(Interest::READABLE).await?;
            match guard.try_io(|inner| recv_datagram(inner.get_ref().as_raw_fd(), buf)) {
                Ok(result) => return result,
                Err(_would_block) => continue,
            }
        }
    }
}

impl AsRawFd for NetlinkSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.get_ref().as_raw_fd()
    }
}

impl std::fmt::Debug for NetlinkSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetlinkSocket")
            .field("fd", &self.as_raw_fd())
            .field("port_id", &self.port_id)
            .finish()
    }
}

/// `recvmsg` into the spare capacity of `buf`, picking up the nsid control
/// message when the kernel sends one.
fn recv_datagram(fd: RawFd, buf: &mut BytesMut) -> io::Result<Datagram> {
    let spare = buf.spare_capacity_mut();
    let mut iov = libc::iovec {
        iov_base: spare.as_mut_ptr().cast(),
        iov_len: spare.len(),
    };
    let mut control = [0u64; 8];

    // SAFETY: msghdr is plain data and all-zero is a valid value.
    let mut msg: libc::msghdr = unsafe { mem::zeroed() };
    msg.msg_iov = &mut iov;
    msg.msg_iovlen = 1;
    msg.msg_control = control.as_mut_ptr().cast();
    msg.msg_controllen = mem::size_of_val(&control) as _;

    // SAFETY: iov covers the spare capacity of buf and msg_control the
    // local control array. Both outlive the call.
    let n = unsafe { libc::recvmsg(fd, &mut msg, 0) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }
    let len = n as usize;
    // SAFETY: the kernel initialised the first len bytes of spare capacity.
    unsafe { buf.set_len(buf.len() + len) };

    Ok(Datagram {
        len,
        nsid: control_nsid(&msg),
    })
}

/// The `NETLINK_LISTEN_ALL_NSID` value among the control messages of `msg`.
fn control_nsid(msg: &libc::msghdr) -> Option<i32> {
    // SAFETY: msg_control and msg_controllen describe an initialised control
    // buffer. The CMSG helpers never step past msg_controllen and a header
    // is only read after a non-null check.
    unsafe {
        let mut cmsg = libc::CMSG_FIRSTHDR(msg);
        while !cmsg.is_null() {
            let hdr = &*cmsg;
            if hdr.cmsg_level == libc::SOL_NETLINK
                && hdr.cmsg_type == libc::NETLINK_LISTEN_ALL_NSID
                && hdr.cmsg_len as usize >= libc::CMSG_LEN(mem::size_of::<i32>() as u32) as usize
            {
                return Some(ptr::read_unaligned(libc::CMSG_DATA(cmsg).cast::<i32>()));
            }
            cmsg = libc::CMSG_NXTHDR(msg, cmsg);
        }
    }
    None
}

struct BufferOption {
    option: libc::c_int,
    name: &'static str,
    sysctl: &'static str,
}

const RCVBUF: BufferOption = BufferOption {
    option: libc::SO_RCVBUF,
    name: "SO_RCVBUF",
    sysctl: "net.core.rmem_max",
};

const SNDBUF: BufferOption = BufferOption {
    option: libc::SO_SNDBUF,
    name: "SO_SNDBUF",
    sysctl: "net.core.wmem_max",
};

/// Request `bytes` for a socket buffer and read back what the kernel granted.
/// A clamped buffer fails with `verify`, and is logged otherwise.
fn set_buffer(fd: RawFd, opt: &BufferOption, bytes: usize, verify: bool) -> Result<()> {
    let value = libc::c_int::try_from(bytes).unwrap_or(libc::c_int::MAX);
    setsockopt_int(fd, opt.option, value)?;

    let actual = getsockopt_int(fd, opt.option)?;
    if actual >= bytes {
        return Ok(());
    }
    let err = Error::BufferClamped {
        option: opt.name,
        sysctl: opt.sysctl,
        requested: bytes,
        actual,
    };
    if verify {
        return Err(err);
    }
    warn!("{err}");
    Ok(())
}

fn setsockopt_int(fd: RawFd, option: libc::c_int, value: libc::c_int) -> io::Result<()> {
    // SAFETY: value outlives the call and the length matches its type.
    let ret = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            option,
            (&value as *const libc::c_int).cast(),
            mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn getsockopt_int(fd: RawFd, option: libc::c_int) -> io::Result<usize> {
    let mut value: libc::c_int = 0;
    let mut len = mem::size_of::<libc::c_int>() as libc::socklen_t;
    // SAFETY: value and len are valid for writes and len holds value's size.
    let ret = unsafe {
        libc::getsockopt(
            fd,
            libc::SOL_SOCKET,
            option,
            (&mut value as *mut libc::c_int).cast(),
            &mut len,
        )
    };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(usize::try_from(value).unwrap_or(0))
}
