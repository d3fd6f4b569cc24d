//! Transmit buffer that frames requests back to back.

use super::error::{Error, Result};
use super::flags::HeaderFlags;
use super::message::{Header, NLMSG_HDRLEN, nlmsg_align};

/// Accumulates framed netlink records until they are flushed.
///
/// Records are 4-byte aligned, with zeroed padding. Sequence numbers are
/// assigned from a counter that starts at 1 and never yields 0, which is
/// reserved for kernel-originated messages.
#[derive(Debug, Clone)]
pub struct TxBuffer {
    buf: Vec<u8>,
    port_id: u32,
    next_seq: u32,
}

impl TxBuffer {
    /// Create an empty buffer stamping `port_id` on every record.
    pub fn new(port_id: u32) -> Self {
        Self {
            buf: Vec::with_capacity(4096),
            port_id,
            next_seq: 1,
        }
    }

    pub fn port_id(&self) -> u32 {
        self.port_id
    }

    fn next_sequence(&mut self) -> u32 {
        let seq = self.next_seq;
        self.next_seq = match self.next_seq.wrapping_add(1) {
            0 => 1,
            n => n,
        };
        seq
    }

    /// Append one record and return its zeroed body of `body_len` bytes.
    ///
    /// Sets `header.length` to the unpadded record size, adds `REQUEST`,
    /// stamps the port id and, when `header.sequence` is 0, assigns the next
    /// sequence number. The updated header is written in front of the body.
    pub fn add(&mut self, header: &mut Header, body_len: usize) -> Result<&mut [u8]> {
        let len = NLMSG_HDRLEN + body_len;
        header.length = u32::try_from(len)
            .map_err(|_| Error::InvalidMessage(format!("record of {len} bytes is too long")))?;
        header.flags |= HeaderFlags::REQUEST;
        header.port_id = self.port_id;
        if header.sequence == 0 {
            header.sequence = self.next_sequence();
        }

        let start = self.buf.len();
        self.buf.resize(start + nlmsg_align(len), 0);
        let record = &mut self.buf[start..];
        header.write_to(record)?;
        Ok(&mut record[NLMSG_HDRLEN..len])
    }

    /// Bytes framed so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop every framed record.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Drop records framed after the buffer was `len` bytes long.
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::consts::MessageType;

    #[test]
    fn test_add_frames_record() {
        let mut tx = TxBuffer::new(4242);
        let mut header = Header::new(MessageType::RTM_GETLINK, HeaderFlags::DUMP);
        let body = tx.add(&mut header, 1).unwrap();
        assert_eq!(body.len(), 1);
        body[0] = 17;

        assert_eq!(header.length, 17);
        assert_eq!(header.sequence, 1);
        assert_eq!(header.port_id, 4242);
        assert!(header.flags.contains(HeaderFlags::REQUEST | HeaderFlags::DUMP));

        assert_eq!(tx.len(), 20);
        let written = Header::parse(tx.as_bytes()).unwrap();
        assert_eq!(written, header);
        assert_eq!(&tx.as_bytes()[16..], &[17, 0, 0, 0]);
    }

    #[test]
    fn test_existing_sequence_kept() {
        let mut tx = TxBuffer::new(1);
        let mut first = Header::new(MessageType::RTM_GETADDR, HeaderFlags::empty());
        tx.add(&mut first, 0).unwrap();

        let mut fixed = Header::new(MessageType::RTM_GETADDR, HeaderFlags::empty());
        fixed.sequence = 99;
        tx.add(&mut fixed, 8).unwrap();
        assert_eq!(fixed.sequence, 99);

        let mut next = Header::new(MessageType::RTM_GETADDR, HeaderFlags::empty());
        tx.add(&mut next, 0).unwrap();
        assert_eq!(next.sequence, 2);
        assert_eq!(tx.len(), 16 + 24 + 16);

        tx.clear();
        assert!(tx.is_empty());
    }

    #[test]
    fn test_sequence_skips_zero() {
        let mut tx = TxBuffer::new(1);
        tx.next_seq = u32::MAX;
        let mut a = Header::default();
        let mut b = Header::default();
        tx.add(&mut a, 0).unwrap();
        tx.add(&mut b, 0).unwrap();
        assert_eq!(a.sequence, u32::MAX);
        assert_eq!(b.sequence, 1);
    }
}
