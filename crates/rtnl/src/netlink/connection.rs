//! NETLINK_ROUTE session: framed transmit, correlated replies and the
//! dump-then-stream receive loop.
//!
//! A [`Connection`] is shared between the task running [`Connection::listen`]
//! and any number of tasks sending requests. Replies to requests sent through
//! [`Connection::rsvp`] are routed back to the caller; everything else the
//! kernel sends ends up on the [`MessageStream`] returned by
//! [`Connection::open`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use rtnl::netlink::{Config, Connection, ListenRequest, Message};
//! use rtnl::netlink::messages::IfInfoMessage;
//! use rtnl::netlink::consts::MessageType;
//!
//! let (conn, mut messages) = Connection::open(Config::default())?;
//! let conn = Arc::new(conn);
//! let listener = tokio::spawn({
//!     let conn = conn.clone();
//!     async move { conn.listen(ListenRequest::LINKS).await }
//! });
//!
//! let mut up = IfInfoMessage::new(MessageType::RTM_NEWLINK);
//! up.index = 1;
//! conn.ack(&mut Message::Link(up), Duration::from_secs(1)).await?;
//!
//! conn.close();
//! listener.await??;
//! ```

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace, warn};

use super::builder::TxBuffer;
use super::config::{Config, ListenRequest};
use super::consts::{AddressFamily, MessageType};
use super::error::{Error, Result};
use super::flags::HeaderFlags;
use super::messages::{ErrorMessage, GenMessage, Message};
use super::pool::AttrPool;
use super::rsvp::{Pending, Reservation};
use super::rx::RxBuffer;
use super::socket::{Datagram, NetlinkSocket, Transport};
use super::stream::MessageStream;

/// How a dump request ended.
enum DumpOutcome {
    Done,
    Failed(i32),
    Closed,
}

/// A NETLINK_ROUTE session over a [`Transport`].
pub struct Connection<T: Transport = NetlinkSocket> {
    transport: T,
    tx: tokio::sync::Mutex<TxBuffer>,
    pending: Arc<Pending>,
    output: Mutex<Option<mpsc::Sender<Message>>>,
    closed: watch::Sender<bool>,
    listening: AtomicBool,
    pool: Arc<AttrPool>,
    config: Config,
}

impl Connection<NetlinkSocket> {
    /// Open a socket as described by `config`.
    ///
    /// Nothing is received until [`listen`](Self::listen) runs.
    pub fn open(config: Config) -> Result<(Self, MessageStream)> {
        let socket = NetlinkSocket::open(&config)?;
        Ok(Self::with_transport(socket, config))
    }
}

impl<T: Transport> Connection<T> {
    /// Build a session over an already bound transport.
    pub fn with_transport(transport: T, config: Config) -> (Self, MessageStream) {
        let (out_tx, out_rx) = mpsc::channel(config.channel_depth);
        let (closed, _) = watch::channel(false);
        let conn = Self {
            tx: tokio::sync::Mutex::new(TxBuffer::new(transport.port_id())),
            transport,
            pending: Pending::new(),
            output: Mutex::new(Some(out_tx)),
            closed,
            listening: AtomicBool::new(false),
            pool: AttrPool::new(config.pool_capacity),
            config,
        };
        (conn, MessageStream::new(out_rx))
    }

    pub fn port_id(&self) -> u32 {
        self.transport.port_id()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    // ========================================================================
    // Transmit
    // ========================================================================

    /// Frame `msg` into the transmit buffer without sending it.
    ///
    /// Returns the sequence number the record carries.
    pub async fn tx_add(&self, msg: &mut Message) -> Result<u32> {
        let mut tx = self.tx.lock().await;
        Self::frame(&mut tx, msg)
    }

    /// Send everything framed so far.
    pub async fn tx_flush(&self) -> Result<()> {
        let mut tx = self.tx.lock().await;
        self.flush_locked(&mut tx).await
    }

    /// Frame and send `msg`, returning its sequence number.
    pub async fn tx(&self, msg: &mut Message) -> Result<u32> {
        let mut tx = self.tx.lock().await;
        let seq = Self::frame(&mut tx, msg)?;
        self.flush_locked(&mut tx).await?;
        Ok(seq)
    }

    /// Send `msg` with `ACK` set and reserve its reply.
    ///
    /// The request always gets a fresh sequence number, so a message can be
    /// sent again while an earlier reservation for it is outstanding. The
    /// reply only arrives while [`listen`](Self::listen) is running.
    pub async fn rsvp(&self, msg: &mut Message) -> Result<Reservation> {
        let header = msg.header_mut();
        header.flags |= HeaderFlags::ACK;
        header.sequence = 0;
        let mut tx = self.tx.lock().await;
        let seq = Self::frame(&mut tx, msg)?;
        let reservation = match self.pending.register(seq) {
            Ok(r) => r,
            Err(e) => {
                tx.clear();
                return Err(e);
            }
        };
        self.flush_locked(&mut tx).await?;
        trace!(seq, kind = %msg.kind(), "reserved reply");
        Ok(reservation)
    }

    /// Send `msg` and wait up to `timeout` for the kernel's acknowledgement.
    pub async fn ack(&self, msg: &mut Message, timeout: Duration) -> Result<()> {
        let reservation = self.rsvp(msg).await?;
        reservation.wait_timeout(timeout).await?.to_result()
    }

    /// Send a dump request for `kind` restricted to `family`.
    ///
    /// Replies arrive on the message stream, ending with `Done`.
    pub async fn dump(&self, kind: MessageType, family: AddressFamily) -> Result<u32> {
        self.tx(&mut Message::Generic(GenMessage::dump(kind, family)))
            .await
    }

    fn frame(tx: &mut TxBuffer, msg: &mut Message) -> Result<u32> {
        let mark = tx.len();
        if let Err(e) = msg.serialize(tx) {
            tx.truncate(mark);
            return Err(e);
        }
        Ok(msg.header().sequence)
    }

    async fn flush_locked(&self, tx: &mut TxBuffer) -> Result<()> {
        if self.is_closed() {
            tx.clear();
            return Err(Error::Closed);
        }
        let result = self.send_all(tx.as_bytes()).await;
        tx.clear();
        result
    }

    async fn send_all(&self, buf: &[u8]) -> Result<()> {
        let mut sent = 0;
        while sent < buf.len() {
            let n = self.transport.send(&buf[sent..]).await?;
            if n == 0 {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "netlink socket accepted no bytes",
                )));
            }
            sent += n;
        }
        Ok(())
    }

    // ========================================================================
    // Receive
    // ========================================================================

    /// Run the receive loop until [`close`](Self::close) or a socket error.
    ///
    /// Each request is dumped in turn, waiting for its `Done` before the next
    /// is sent. `NOOP` requests are skipped; an empty slice uses the
    /// configured [`listen_requests`](Config::listen_requests). After the
    /// dumps the loop streams every multicast notification.
    ///
    /// Returns `Ok(())` when closed. Only one `listen` may run per
    /// connection.
    pub async fn listen(&self, requests: &[ListenRequest]) -> Result<()> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyListening);
        }
        let output = self
            .output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(Error::Closed)?;

        let requests = if requests.is_empty() {
            self.config.listen_requests.clone()
        } else {
            requests.to_vec()
        };

        let mut closed = self.closed.subscribe();
        let mut rx = RxBuffer::default();
        let result = self.run(&requests, &output, &mut closed, &mut rx).await;

        drop(output);
        self.pending.cancel_all();
        match &result {
            Ok(()) => debug!("receive loop stopped"),
            Err(e) => warn!(error = %e, "receive loop failed"),
        }
        result
    }

    async fn run(
        &self,
        requests: &[ListenRequest],
        output: &mpsc::Sender<Message>,
        closed: &mut watch::Receiver<bool>,
        rx: &mut RxBuffer,
    ) -> Result<()> {
        for req in requests.iter().filter(|r| !r.is_noop()) {
            if !self.dump_with_retry(req, output, closed, rx).await? {
                return Ok(());
            }
        }

        debug!(port_id = self.port_id(), "streaming");
        loop {
            // Anything read past the last dump's Done is already buffered.
            while let Some(record) = rx.next_record() {
                let Some(msg) = self.dispatch(record, rx.nsid()) else {
                    continue;
                };
                if !self.forward(output, msg, closed).await {
                    return Ok(());
                }
            }
            if !self.fill(closed, rx).await? {
                return Ok(());
            }
        }
    }

    /// Dump one request, retrying on error replies. Returns `false` if the
    /// connection closed meanwhile.
    async fn dump_with_retry(
        &self,
        req: &ListenRequest,
        output: &mpsc::Sender<Message>,
        closed: &mut watch::Receiver<bool>,
        rx: &mut RxBuffer,
    ) -> Result<bool> {
        let attempts = self.config.dump_attempts;
        for attempt in 1..=attempts {
            let seq = match self.dump(req.kind, req.family).await {
                Err(Error::Closed) => return Ok(false),
                seq => seq?,
            };
            debug!(kind = %req.kind, family = %req.family, seq, attempt, "dump requested");

            match self.await_dump(seq, output, closed, rx).await? {
                DumpOutcome::Done => return Ok(true),
                DumpOutcome::Closed => return Ok(false),
                DumpOutcome::Failed(errno) => {
                    let err = Error::from_errno(errno);
                    warn!(
                        kind = %req.kind,
                        family = %req.family,
                        attempt,
                        attempts,
                        error = %err,
                        "dump request failed"
                    );
                    if attempt == attempts {
                        return Err(err);
                    }
                }
            }
        }
        Ok(true)
    }

    async fn await_dump(
        &self,
        seq: u32,
        output: &mpsc::Sender<Message>,
        closed: &mut watch::Receiver<bool>,
        rx: &mut RxBuffer,
    ) -> Result<DumpOutcome> {
        loop {
            // Records left over from the previous read come first.
            while let Some(record) = rx.next_record() {
                let Some(msg) = self.dispatch(record, rx.nsid()) else {
                    continue;
                };
                let done_flags = match &msg {
                    Message::Error(e) if self.answers_dump(e, seq) => {
                        return Ok(DumpOutcome::Failed(e.errno));
                    }
                    Message::Done(h) if h.sequence == seq => Some(h.flags),
                    _ => None,
                };
                if !self.forward(output, msg, closed).await {
                    return Ok(DumpOutcome::Closed);
                }
                if let Some(flags) = done_flags {
                    if flags.contains(HeaderFlags::DUMP_INTR) {
                        warn!(seq, "dump was interrupted, results may be inconsistent");
                    }
                    trace!(seq, "dump done");
                    return Ok(DumpOutcome::Done);
                }
            }
            if !self.fill(closed, rx).await? {
                return Ok(DumpOutcome::Closed);
            }
        }
    }

    fn answers_dump(&self, reply: &ErrorMessage, seq: u32) -> bool {
        !reply.is_ack() && reply.request.sequence == seq && reply.request.port_id == self.port_id()
    }

    /// Read one datagram into `rx`. Returns `false` if closed first.
    async fn fill(&self, closed: &mut watch::Receiver<bool>, rx: &mut RxBuffer) -> Result<bool> {
        tokio::select! {
            biased;
            _ = closed_signal(closed) => Ok(false),
            read = self.transport.recv(rx.read_buf()) => match read? {
                Datagram { len: 0, .. } => Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "netlink transport closed",
                ))),
                Datagram { len, nsid } => {
                    trace!(bytes = len, ?nsid, "received");
                    rx.set_nsid(nsid);
                    Ok(true)
                }
            },
        }
    }

    /// Decode one record and route correlated replies. Returns the message
    /// if it should be forwarded.
    ///
    /// `nsid` is the namespace id of the datagram the record arrived in.
    fn dispatch(&self, record: Result<Bytes>, nsid: Option<i32>) -> Option<Message> {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "discarding receive buffer");
                return None;
            }
        };
        let mut msg = match Message::parse_pooled(&record, &self.pool) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, len = record.len(), "dropping undecodable record");
                return None;
            }
        };
        msg.header_mut().nsid = nsid;
        trace!(kind = %msg.kind(), seq = msg.header().sequence, "dispatch");

        match msg {
            Message::Error(reply) if reply.request.port_id == self.port_id() => {
                let seq = reply.request.sequence;
                match self.pending.resolve(reply) {
                    None => {
                        trace!(seq, "reply delivered");
                        None
                    }
                    Some(reply) => Some(Message::Error(reply)),
                }
            }
            msg => Some(msg),
        }
    }

    /// Push `msg` to the stream, waiting for capacity. Returns `false` if
    /// the connection closed first.
    async fn forward(
        &self,
        output: &mpsc::Sender<Message>,
        msg: Message,
        closed: &mut watch::Receiver<bool>,
    ) -> bool {
        tokio::select! {
            biased;
            _ = closed_signal(closed) => false,
            sent = output.send(msg) => {
                if let Err(mpsc::error::SendError(msg)) = sent {
                    trace!(kind = %msg.kind(), "stream dropped, discarding message");
                }
                true
            }
        }
    }

    /// Stop the receive loop, end the message stream and cancel every
    /// outstanding reservation. Idempotent.
    pub fn close(&self) {
        if self.closed.send_replace(true) {
            return;
        }
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.pending.cancel_all();
        debug!(port_id = self.port_id(), "connection closed");
    }
}

/// Resolves once `close` has been called.
async fn closed_signal(closed: &mut watch::Receiver<bool>) {
    let _ = closed.wait_for(|&c| c).await;
}

impl<T: Transport> std::fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("port_id", &self.port_id())
            .field("listening", &self.listening.load(Ordering::Relaxed))
            .field("closed", &self.is_closed())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        self.pending.cancel_all();
    }
}
