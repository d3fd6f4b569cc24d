//! Async NETLINK_ROUTE socket core for Linux.
//!
//! This crate opens an `AF_NETLINK` / `NETLINK_ROUTE` socket, frames
//! requests, decodes link, address, route, neighbor and namespace-id
//! records into typed messages and streams them to the caller: first the
//! replies to an initial set of dumps, then every multicast notification
//! the socket is subscribed to.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rtnl::{Config, Connection, ListenRequest, Message};
//!
//! #[tokio::main]
//! async fn main() -> rtnl::Result<()> {
//!     let (conn, mut messages) = Connection::open(Config::default())?;
//!     let conn = Arc::new(conn);
//!     let listener = tokio::spawn({
//!         let conn = conn.clone();
//!         async move { conn.listen(ListenRequest::LINKS).await }
//!     });
//!
//!     while let Some(msg) = messages.recv().await {
//!         if let Message::Done(_) = msg {
//!             break;
//!         }
//!         print!("{msg}");
//!     }
//!
//!     conn.close();
//!     listener.await.expect("listener panicked")
//! }
//! ```

pub mod netlink;

// Re-export common types at crate root for convenience
pub use netlink::{
    Config, Connection, Error, ListenRequest, Message, MessageStream, MulticastGroup, Result,
};
