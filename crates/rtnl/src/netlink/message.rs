//! Netlink message header and alignment.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::consts::MessageType;
use super::error::{Error, Result};
use super::flags::HeaderFlags;
use super::render::Printer;

/// Netlink message header alignment.
pub const NLMSG_ALIGNTO: usize = 4;

/// Align a length to NLMSG_ALIGNTO boundary.
#[inline]
pub const fn nlmsg_align(len: usize) -> usize {
    (len + NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

/// Size of the netlink message header.
pub const NLMSG_HDRLEN: usize = nlmsg_align(std::mem::size_of::<NlMsgHdr>());

/// Netlink message header (mirrors struct nlmsghdr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgHdr {
    /// Length of message including header.
    pub nlmsg_len: u32,
    /// Message type.
    pub nlmsg_type: u16,
    /// Additional flags.
    pub nlmsg_flags: u16,
    /// Sequence number.
    pub nlmsg_seq: u32,
    /// Sending process port ID.
    pub nlmsg_pid: u32,
}

/// Decoded netlink header.
///
/// `length` is the unpadded size of the whole record. It is recomputed by
/// [`TxBuffer::add`](super::builder::TxBuffer::add) on every serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub length: u32,
    pub kind: MessageType,
    pub flags: HeaderFlags,
    /// Zero on kernel-originated messages and on requests not yet framed.
    pub sequence: u32,
    pub port_id: u32,
    /// Namespace id of the sender, stamped on received messages when the
    /// socket listens on all namespaces. Never written to the wire.
    pub nsid: Option<i32>,
}

impl Header {
    /// Create a header for a new request of `kind`.
    pub fn new(kind: MessageType, flags: HeaderFlags) -> Self {
        Self {
            length: NLMSG_HDRLEN as u32,
            kind,
            flags,
            sequence: 0,
            port_id: 0,
            nsid: None,
        }
    }

    /// Decode a header from the front of `data`.
    ///
    /// The input does not need to be aligned; the header is copied out.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (raw, _) = NlMsgHdr::read_from_prefix(data).map_err(|_| Error::Truncated {
            expected: NLMSG_HDRLEN,
            actual: data.len(),
        })?;
        Ok(raw.into())
    }

    /// Encode into the first [`NLMSG_HDRLEN`] bytes of `buf`.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<()> {
        let raw = NlMsgHdr::from(*self);
        raw.write_to_prefix(buf).map_err(|_| Error::Truncated {
            expected: NLMSG_HDRLEN,
            actual: buf.len(),
        })
    }

    /// Payload length (total length minus header).
    pub fn payload_len(&self) -> usize {
        (self.length as usize).saturating_sub(NLMSG_HDRLEN)
    }

    /// Check if this message has the multi flag.
    pub fn is_multi(&self) -> bool {
        self.flags.contains(HeaderFlags::MULTI)
    }

    /// Check if the kernel flagged this dump as interrupted.
    pub fn is_dump_interrupted(&self) -> bool {
        self.flags.contains(HeaderFlags::DUMP_INTR)
    }

    /// Render `len`, `seq`, `pid` and `flags`, led by `nsid` when stamped.
    pub fn render(&self, p: &mut Printer<'_>) -> std::fmt::Result {
        if let Some(nsid) = self.nsid {
            p.field("nsid", nsid)?;
        }
        p.field("len", self.length)?;
        p.field("seq", self.sequence)?;
        p.field("pid", self.port_id)?;
        if !self.flags.is_empty() {
            p.field("flags", self.flags)?;
        }
        Ok(())
    }
}

impl From<NlMsgHdr> for Header {
    fn from(raw: NlMsgHdr) -> Self {
        Self {
            length: raw.nlmsg_len,
            kind: MessageType(raw.nlmsg_type),
            flags: HeaderFlags::from_bits_retain(raw.nlmsg_flags),
            sequence: raw.nlmsg_seq,
            port_id: raw.nlmsg_pid,
            nsid: None,
        }
    }
}

impl From<Header> for NlMsgHdr {
    fn from(h: Header) -> Self {
        Self {
            nlmsg_len: h.length,
            nlmsg_type: h.kind.0,
            nlmsg_flags: h.flags.bits(),
            nlmsg_seq: h.sequence,
            nlmsg_pid: h.port_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        assert_eq!(std::mem::size_of::<NlMsgHdr>(), 16);
        assert_eq!(NLMSG_HDRLEN, 16);
        assert_eq!(nlmsg_align(0), 0);
        assert_eq!(nlmsg_align(1), 4);
        assert_eq!(nlmsg_align(17), 20);
    }

    #[test]
    fn test_header_parse() {
        let mut data = Vec::new();
        data.extend_from_slice(&32u32.to_ne_bytes());
        data.extend_from_slice(&16u16.to_ne_bytes());
        data.extend_from_slice(&0x0302u16.to_ne_bytes());
        data.extend_from_slice(&7u32.to_ne_bytes());
        data.extend_from_slice(&1234u32.to_ne_bytes());

        let h = Header::parse(&data).unwrap();
        assert_eq!(h.length, 32);
        assert_eq!(h.kind, MessageType::RTM_NEWLINK);
        assert!(h.is_multi());
        assert!(h.flags.contains(HeaderFlags::DUMP));
        assert_eq!(h.sequence, 7);
        assert_eq!(h.port_id, 1234);
        assert_eq!(h.payload_len(), 16);
    }

    #[test]
    fn test_header_parse_unaligned() {
        let mut data = vec![0u8; 17];
        let h = Header {
            length: 16,
            kind: MessageType::NLMSG_DONE,
            flags: HeaderFlags::MULTI,
            sequence: 3,
            port_id: 9,
            nsid: None,
        };
        h.write_to(&mut data[1..]).unwrap();
        assert_eq!(Header::parse(&data[1..]).unwrap(), h);
    }

    #[test]
    fn test_header_render() {
        let h = Header {
            length: 20,
            kind: MessageType::NLMSG_DONE,
            flags: HeaderFlags::MULTI,
            sequence: 4,
            port_id: 77,
            nsid: None,
        };
        let text = crate::netlink::render::to_string(|p| h.render(p));
        assert_eq!(text, "len: 20\nseq: 4\npid: 77\nflags: Multipart\n");

        let quiet = Header::default();
        let text = crate::netlink::render::to_string(|p| quiet.render(p));
        assert!(!text.contains("flags"));
        assert!(!text.contains("nsid"));
    }

    #[test]
    fn test_header_render_nsid() {
        let h = Header {
            nsid: Some(3),
            ..Header::new(MessageType::RTM_NEWLINK, HeaderFlags::empty())
        };
        let text = crate::netlink::render::to_string(|p| h.render(p));
        assert_eq!(text, "nsid: 3\nlen: 16\nseq: 0\npid: 0\n");

        // the id is local state only
        let mut data = [0u8; NLMSG_HDRLEN];
        h.write_to(&mut data).unwrap();
        assert_eq!(Header::parse(&data).unwrap().nsid, None);
    }

    #[test]
    fn test_header_short() {
        let err = Header::parse(&[0u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                expected: 16,
                actual: 10
            }
        ));
        assert!(Header::default().write_to(&mut [0u8; 8]).is_err());
    }
}
