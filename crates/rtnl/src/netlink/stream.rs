//! Stream of decoded messages produced by [`Connection::listen`].
//!
//! # Example
//!
//! ```ignore
//! use rtnl::netlink::{Config, Connection, Message};
//! use tokio_stream::StreamExt;
//!
//! let (conn, mut messages) = Connection::open(Config::default())?;
//! let conn = std::sync::Arc::new(conn);
//! tokio::spawn({
//!     let conn = conn.clone();
//!     async move { conn.listen(&[]).await }
//! });
//!
//! while let Some(msg) = messages.next().await {
//!     if let Message::Link(link) = &msg {
//!         println!("{} {}", link.index, link.name().unwrap_or("?"));
//!     }
//! }
//! ```
//!
//! [`Connection::listen`]: super::Connection::listen

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;

use super::messages::Message;

/// Receiving half of a connection's output channel.
///
/// Yields dump replies (including the terminating `Done`), multicast
/// notifications and error replies nobody reserved. Ends when the
/// connection closes or its receive loop exits.
#[derive(Debug)]
pub struct MessageStream {
    rx: mpsc::Receiver<Message>,
}

impl MessageStream {
    pub(crate) fn new(rx: mpsc::Receiver<Message>) -> Self {
        Self { rx }
    }

    /// Next message, or `None` once the connection is closed.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Next message if one is already queued.
    pub fn try_recv(&mut self) -> Option<Message> {
        self.rx.try_recv().ok()
    }

    /// Stop accepting messages. Already queued messages can still be read.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl Stream for MessageStream {
    type Item = Message;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
