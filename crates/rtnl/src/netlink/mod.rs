//! Async NETLINK_ROUTE session for Linux.
//!
//! A [`Connection`] owns one `AF_NETLINK` socket. It frames requests into a
//! transmit buffer, decodes every record the kernel sends into a
//! [`Message`], routes error/ack replies back to the request that reserved
//! them and pushes everything else onto a [`MessageStream`].
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use rtnl::netlink::{Config, Connection, ListenRequest, Message};
//! use tokio_stream::StreamExt;
//!
//! let (conn, mut messages) = Connection::open(Config::default())?;
//! let conn = Arc::new(conn);
//! tokio::spawn({
//!     let conn = conn.clone();
//!     async move { conn.listen(ListenRequest::DEFAULT).await }
//! });
//!
//! while let Some(msg) = messages.next().await {
//!     match &msg {
//!         Message::Link(link) => println!("link {} {:?}", link.index, link.name()),
//!         Message::Address(addr) => println!("addr {:?}", addr.address()),
//!         Message::Done(_) => println!("-- dump done"),
//!         _ => print!("{msg}"),
//!     }
//! }
//! ```

pub mod attr;
pub mod builder;
pub mod config;
pub mod connection;
pub mod consts;
mod error;
#[cfg(test)]
mod fixtures;
pub mod flags;
pub mod message;
pub mod messages;
pub mod parse;
pub mod pool;
pub mod render;
pub mod rsvp;
pub mod rx;
pub mod socket;
pub mod stream;
pub mod types;

pub use attr::{Attr, EthernetAddress, Format};
pub use builder::TxBuffer;
pub use config::{Config, ListenRequest};
pub use connection::Connection;
pub use consts::{AddressFamily, MessageType, MulticastGroup};
pub use error::{Error, Result};
pub use flags::HeaderFlags;
pub use message::{Header, NLMSG_HDRLEN};
pub use messages::Message;
pub use pool::{AttrPool, AttrSet};
pub use rsvp::Reservation;
pub use socket::{Datagram, NetlinkSocket, Transport};
pub use stream::MessageStream;
