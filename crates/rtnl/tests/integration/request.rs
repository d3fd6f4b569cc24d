//! Acknowledged request integration tests.

use std::time::Duration;

use rtnl::netlink::consts::MessageType;
use rtnl::netlink::flags::IfInfoFlags;
use rtnl::netlink::messages::IfInfoMessage;
use rtnl::netlink::{Connection, ListenRequest, Message};
use rtnl::{Config, Error, Result};

use crate::common::{self, TestNamespace, WAIT, next_matching};

fn set_link(index: u32, up: bool) -> Message {
    let mut link = IfInfoMessage::new(MessageType::RTM_NEWLINK);
    link.index = index;
    link.change = IfInfoFlags::UP;
    if up {
        link.flags = IfInfoFlags::UP;
    }
    Message::Link(link)
}

#[tokio::test]
async fn test_ack_brings_link_up() -> Result<()> {
    require_root!();
    common::init_tracing();

    let ns = TestNamespace::new("ackup")?;
    ns.add_dummy("dummy0")?;
    let index = ns.ifindex("dummy0")?;
    let (conn, mut stream, listener) = ns.listen(Config::new(), &[ListenRequest::NOOP])?;

    conn.ack(&mut set_link(index, true), WAIT).await?;

    let state = ns.exec("ip", &["link", "show", "dummy0"])?;
    assert!(state.contains("UP"), "dummy0 should be up: {state}");

    // The change is also broadcast to the LINK group.
    let link = next_matching(&mut stream, |m| match m {
        Message::Link(l) if l.index == index && l.is_up() => Some(l),
        _ => None,
    })
    .await;
    assert_eq!(link.name(), Some("dummy0"));

    conn.close();
    listener.await.expect("listener panicked")?;
    Ok(())
}

#[tokio::test]
async fn test_kernel_error_reply() -> Result<()> {
    require_root!();
    common::init_tracing();

    let ns = TestNamespace::new("ackerr")?;
    let (conn, _stream, listener) = ns.listen(Config::new(), &[ListenRequest::NOOP])?;

    let mut missing = IfInfoMessage::new(MessageType::RTM_DELLINK);
    missing.index = 4242;
    let err = conn
        .ack(&mut Message::Link(missing), WAIT)
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
    assert!(matches!(err, Error::Kernel { errno, .. } if errno == libc::ENODEV));

    conn.close();
    listener.await.expect("listener panicked")?;
    Ok(())
}

#[tokio::test]
async fn test_reservation_cancelled_by_close() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("cancel")?;
    ns.add_dummy("dummy0")?;
    let index = ns.ifindex("dummy0")?;
    // No listener: the ack can never be read, only cancelled.
    let (conn, _stream) = Connection::open(ns.config())?;

    let rsvp = conn.rsvp(&mut set_link(index, false)).await?;
    conn.close();
    let waited = tokio::time::timeout(Duration::from_secs(1), rsvp.wait())
        .await
        .expect("reservation not cancelled");
    assert!(matches!(waited, Err(Error::Cancelled)));
    Ok(())
}

#[tokio::test]
async fn test_socket_buffers_applied() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("bufs")?;
    let config = ns
        .config()
        .receive_buffer(64 << 10)
        .send_buffer(64 << 10)
        .verify_buffers(true);
    let (conn, _stream) = Connection::open(config)?;
    assert!(conn.transport().receive_buffer()? >= 64 << 10);
    assert!(conn.transport().send_buffer()? >= 64 << 10);
    assert_ne!(conn.port_id(), 0);
    Ok(())
}
