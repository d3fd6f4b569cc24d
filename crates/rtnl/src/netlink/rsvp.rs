//! Correlation of requests with their `NLMSG_ERROR` replies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::trace;

use super::error::{Error, Result};
use super::messages::ErrorMessage;

/// Registered waiter. `token` tells a reservation apart from a later one
/// that reused its sequence number.
#[derive(Debug)]
struct Waiter {
    token: u64,
    tx: oneshot::Sender<ErrorMessage>,
}

#[derive(Debug, Default)]
struct Waiters {
    by_seq: HashMap<u32, Waiter>,
    next_token: u64,
    closed: bool,
}

/// In-flight reservations keyed by request sequence number.
///
/// The lock is only held for map operations, never across an await.
#[derive(Debug, Default)]
pub struct Pending {
    inner: Mutex<Waiters>,
}

impl Pending {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Waiters> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a waiter for `seq`.
    ///
    /// Fails with [`Error::Closed`] once [`cancel_all`](Self::cancel_all)
    /// has run, and with [`Error::InvalidMessage`] while another reservation
    /// holds `seq`.
    pub fn register(self: &Arc<Self>, seq: u32) -> Result<Reservation> {
        let mut waiters = self.lock();
        if waiters.closed {
            return Err(Error::Closed);
        }
        if waiters.by_seq.contains_key(&seq) {
            return Err(Error::InvalidMessage(format!(
                "sequence {seq} already awaits a reply"
            )));
        }
        let token = waiters.next_token;
        waiters.next_token += 1;
        let (tx, rx) = oneshot::channel();
        waiters.by_seq.insert(seq, Waiter { token, tx });
        Ok(Reservation {
            seq,
            token,
            rx,
            pending: Arc::clone(self),
        })
    }

    /// Hand `reply` to the waiter registered for its request sequence.
    ///
    /// Returns the reply back when nobody is waiting for it, so the caller
    /// can forward it instead.
    pub fn resolve(&self, reply: ErrorMessage) -> Option<ErrorMessage> {
        let waiter = self.lock().by_seq.remove(&reply.request.sequence);
        match waiter {
            Some(Waiter { tx, .. }) => match tx.send(reply) {
                Ok(()) => None,
                // Waiter gave up between lookup and send.
                Err(reply) => Some(reply),
            },
            None => Some(reply),
        }
    }

    /// Unregister `seq` if it still belongs to the reservation holding
    /// `token`.
    fn remove(&self, seq: u32, token: u64) {
        let mut waiters = self.lock();
        if waiters.by_seq.get(&seq).is_some_and(|w| w.token == token) {
            waiters.by_seq.remove(&seq);
        }
    }

    /// Drop every waiter, waking each with [`Error::Cancelled`], and refuse
    /// new registrations.
    pub fn cancel_all(&self) {
        let mut waiters = self.lock();
        waiters.closed = true;
        let n = waiters.by_seq.len();
        waiters.by_seq.clear();
        if n > 0 {
            trace!(cancelled = n, "reservations cancelled");
        }
    }

    /// Outstanding reservations.
    pub fn len(&self) -> usize {
        self.lock().by_seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A request awaiting its error or ack reply.
///
/// Dropping the reservation unregisters it.
#[derive(Debug)]
pub struct Reservation {
    seq: u32,
    token: u64,
    rx: oneshot::Receiver<ErrorMessage>,
    pending: Arc<Pending>,
}

impl Reservation {
    /// Sequence number the request was sent with.
    pub fn sequence(&self) -> u32 {
        self.seq
    }

    /// Wait for the reply. Resolves to [`Error::Cancelled`] if the connection
    /// closes first.
    pub async fn wait(mut self) -> Result<ErrorMessage> {
        (&mut self.rx).await.map_err(|_| Error::Cancelled)
    }

    /// Like [`wait`](Self::wait), failing with [`Error::Timeout`] after
    /// `timeout`.
    pub async fn wait_timeout(self, timeout: Duration) -> Result<ErrorMessage> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| Error::Timeout)?
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.pending.remove(self.seq, self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::consts::MessageType;
    use crate::netlink::flags::HeaderFlags;
    use crate::netlink::message::Header;

    fn reply(seq: u32, errno: i32) -> ErrorMessage {
        let mut request = Header::new(MessageType::RTM_NEWLINK, HeaderFlags::REQUEST | HeaderFlags::ACK);
        request.sequence = seq;
        ErrorMessage::new(errno, request)
    }

    #[tokio::test]
    async fn test_resolve_matching_sequence() {
        let pending = Pending::new();
        let rsvp = pending.register(7).unwrap();
        assert_eq!(rsvp.sequence(), 7);

        assert!(pending.resolve(reply(8, 0)).is_some());
        assert!(pending.resolve(reply(7, -1)).is_none());
        assert!(pending.is_empty());

        let got = rsvp.wait().await.unwrap();
        assert_eq!(got.errno, -1);
        assert_eq!(got.to_result().unwrap_err().errno(), Some(1));
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let pending = Pending::new();
        let a = pending.register(1).unwrap();
        let b = pending.register(2).unwrap();
        pending.cancel_all();

        assert!(matches!(a.wait().await, Err(Error::Cancelled)));
        assert!(matches!(b.wait().await, Err(Error::Cancelled)));
        assert!(matches!(pending.register(3), Err(Error::Closed)));
    }

    #[tokio::test]
    async fn test_timeout_unregisters() {
        let pending = Pending::new();
        let rsvp = pending.register(9).unwrap();
        let err = rsvp.wait_timeout(Duration::from_millis(10)).await.unwrap_err();
        assert!(err.is_timeout());
        assert!(pending.is_empty());
        assert!(pending.resolve(reply(9, 0)).is_some());
    }

    #[tokio::test]
    async fn test_duplicate_sequence_rejected() {
        let pending = Pending::new();
        let first = pending.register(5).unwrap();
        assert!(matches!(pending.register(5), Err(Error::InvalidMessage(_))));

        assert!(pending.resolve(reply(5, 0)).is_none());
        let second = pending.register(5).unwrap();
        // The resolved reservation must not unregister its successor.
        assert!(first.wait().await.unwrap().is_ack());
        assert_eq!(pending.len(), 1);

        assert!(pending.resolve(reply(5, -1)).is_none());
        assert_eq!(second.wait().await.unwrap().errno, -1);
    }

    #[test]
    fn test_drop_unregisters() {
        let pending = Pending::new();
        let rsvp = pending.register(4).unwrap();
        assert_eq!(pending.len(), 1);
        drop(rsvp);
        assert!(pending.is_empty());
    }
}
