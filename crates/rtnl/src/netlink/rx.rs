//! Receive buffer that reassembles netlink records across reads.

use bytes::{Buf, Bytes, BytesMut};

use super::error::{Error, Result};
use super::message::{NLMSG_HDRLEN, nlmsg_align};

/// Default space reserved before each read.
pub const RX_CHUNK: usize = 32 * 1024;

/// Accumulates raw reads and yields complete, aligned records.
///
/// A trailing partial record (fewer than [`NLMSG_HDRLEN`] bytes, or fewer
/// than its aligned length) stays buffered until the next read completes
/// it. Yielded records share the buffer's allocation, so the steady state
/// does not allocate per record.
#[derive(Debug)]
pub struct RxBuffer {
    buf: BytesMut,
    chunk: usize,
    nsid: Option<i32>,
}

impl RxBuffer {
    pub fn new(chunk: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(chunk),
            chunk,
            nsid: None,
        }
    }

    /// Buffer to read into, with at least one chunk of spare capacity.
    pub fn read_buf(&mut self) -> &mut BytesMut {
        self.buf.reserve(self.chunk);
        &mut self.buf
    }

    /// Record the namespace id of the datagram just read.
    pub fn set_nsid(&mut self, nsid: Option<i32>) {
        self.nsid = nsid;
    }

    /// Namespace id of the most recent datagram.
    pub fn nsid(&self) -> Option<i32> {
        self.nsid
    }

    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Split off the next complete record, trimmed to its header length.
    ///
    /// Returns `None` when only a partial record remains. A header whose
    /// length is below [`NLMSG_HDRLEN`] cannot be resynchronised: the whole
    /// buffer is discarded and an error returned.
    pub fn next_record(&mut self) -> Option<Result<Bytes>> {
        if self.buf.len() < NLMSG_HDRLEN {
            return None;
        }
        let len = (&self.buf[..4]).get_u32_ne() as usize;
        if len < NLMSG_HDRLEN {
            let dropped = self.buf.len();
            self.buf.clear();
            return Some(Err(Error::InvalidMessage(format!(
                "record length {len} below header size, dropped {dropped} buffered bytes"
            ))));
        }

        let aligned = nlmsg_align(len);
        if self.buf.len() < aligned {
            return None;
        }
        let mut record = self.buf.split_to(aligned).freeze();
        record.truncate(len);
        Some(Ok(record))
    }

    /// Bytes held for the next record.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl Default for RxBuffer {
    fn default() -> Self {
        Self::new(RX_CHUNK)
    }
}
