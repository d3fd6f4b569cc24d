//! Control messages: error/ack replies and generic dump requests.

use std::fmt;
use std::io;

use zerocopy::IntoBytes;

use crate::netlink::builder::TxBuffer;
use crate::netlink::consts::{AddressFamily, MessageType};
use crate::netlink::error::{Error, Result};
use crate::netlink::flags::HeaderFlags;
use crate::netlink::message::{Header, NLMSG_HDRLEN, NlMsgHdr};
use crate::netlink::parse::Cursor;
use crate::netlink::render::Printer;

/// `NLMSG_ERROR` reply. An `errno` of 0 is a positive acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub header: Header,
    /// Negative errno, or 0 for an ack.
    pub errno: i32,
    /// Header of the request this reply answers.
    pub request: Header,
}

impl ErrorMessage {
    /// Size of the fixed `nlmsgerr` body.
    pub const BODY_LEN: usize = 4 + NLMSG_HDRLEN;

    pub fn new(errno: i32, request: Header) -> Self {
        Self {
            header: Header::new(MessageType::NLMSG_ERROR, HeaderFlags::empty()),
            errno,
            request,
        }
    }

    /// Decode the body. Trailing bytes (the echoed request payload and any
    /// extended ack attributes) are ignored.
    pub fn parse(header: Header, body: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(body);
        c.require(Self::BODY_LEN)?;
        let errno = c.i32()?;
        let request = Header::parse(c.bytes(NLMSG_HDRLEN)?)?;
        Ok(Self {
            header,
            errno,
            request,
        })
    }

    pub fn serialize(&mut self, tx: &mut TxBuffer) -> Result<()> {
        let body = tx.add(&mut self.header, Self::BODY_LEN)?;
        let (errno, request) = body.split_at_mut(4);
        errno.copy_from_slice(&self.errno.to_ne_bytes());
        request.copy_from_slice(NlMsgHdr::from(self.request).as_bytes());
        Ok(())
    }

    /// Whether this is an acknowledgement rather than a failure.
    pub fn is_ack(&self) -> bool {
        self.errno == 0
    }

    /// `Ok(())` for an ack, the kernel error otherwise.
    pub fn to_result(&self) -> Result<()> {
        if self.is_ack() {
            Ok(())
        } else {
            Err(Error::from_errno(self.errno))
        }
    }

    pub fn render(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.block(self.header.kind, |p| {
            self.header.render(p)?;
            if self.is_ack() {
                p.field("error", "none")?;
            } else {
                p.field(
                    "error",
                    io::Error::from_raw_os_error(self.errno.saturating_abs()),
                )?;
            }
            p.block(format_args!("req: {}", self.request.kind), |p| {
                self.request.render(p)
            })
        })
    }
}

/// Body-less request or notification carrying only an address family
/// (struct rtgenmsg). Used for dump requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenMessage {
    pub header: Header,
    pub family: AddressFamily,
}

impl GenMessage {
    /// A dump request for `kind` restricted to `family`.
    pub fn dump(kind: MessageType, family: AddressFamily) -> Self {
        Self {
            header: Header::new(kind, HeaderFlags::REQUEST | HeaderFlags::DUMP),
            family,
        }
    }

    pub fn parse(header: Header, body: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(body);
        let family = AddressFamily(c.u8()?);
        Ok(Self { header, family })
    }

    pub fn serialize(&mut self, tx: &mut TxBuffer) -> Result<()> {
        let body = tx.add(&mut self.header, 1)?;
        body[0] = self.family.0;
        Ok(())
    }

    pub fn render(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.block(self.header.kind, |p| {
            self.header.render(p)?;
            p.field("family", self.family)
        })
    }
}

/// Render a body-less `NLMSG_NOOP` / `NLMSG_DONE`.
pub(crate) fn render_bare(header: &Header, p: &mut Printer<'_>) -> fmt::Result {
    p.block(header.kind, |p| header.render(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::render;

    #[test]
    fn test_error_parse_ignores_trailer() {
        let request = Header {
            length: 32,
            kind: MessageType::RTM_NEWLINK,
            flags: HeaderFlags::REQUEST | HeaderFlags::ACK,
            sequence: 5,
            port_id: 900,
            nsid: None,
        };
        let mut body = (-libc::EPERM).to_ne_bytes().to_vec();
        body.extend_from_slice(NlMsgHdr::from(request).as_bytes());
        body.extend_from_slice(&[0xaa; 16]);

        let header = Header::new(MessageType::NLMSG_ERROR, HeaderFlags::empty());
        let msg = ErrorMessage::parse(header, &body).unwrap();
        assert_eq!(msg.errno, -libc::EPERM);
        assert_eq!(msg.request, request);
        assert!(!msg.is_ack());
        assert!(msg.to_result().unwrap_err().is_permission_denied());
    }

    #[test]
    fn test_error_short_body() {
        let header = Header::new(MessageType::NLMSG_ERROR, HeaderFlags::empty());
        assert!(matches!(
            ErrorMessage::parse(header, &[0u8; 12]),
            Err(Error::Truncated {
                expected: 20,
                actual: 12
            })
        ));
    }

    #[test]
    fn test_ack_render() {
        let mut request = Header::new(MessageType::RTM_NEWADDR, HeaderFlags::empty());
        request.sequence = 3;
        let msg = ErrorMessage::new(0, request);
        assert!(msg.to_result().is_ok());
        let text = render::to_string(|p| msg.render(p));
        assert!(text.starts_with("NLMSG_ERROR:\n"));
        assert!(text.contains("    error: none\n"));
        assert!(text.contains("    req: RTM_NEWADDR:\n        len: 16\n        seq: 3\n"));
    }

    #[test]
    fn test_gen_dump_request() {
        let mut tx = TxBuffer::new(10);
        let mut msg = GenMessage::dump(MessageType::RTM_GETROUTE, AddressFamily::AF_INET6);
        msg.serialize(&mut tx).unwrap();
        assert_eq!(msg.header.length, 17);
        assert_eq!(tx.as_bytes()[16], 10);

        let parsed = GenMessage::parse(msg.header, &tx.as_bytes()[16..17]).unwrap();
        assert_eq!(parsed, msg);
    }
}
