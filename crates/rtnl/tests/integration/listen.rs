//! Dump and multicast integration tests.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use rtnl::netlink::flags::IfInfoFlags;
use rtnl::netlink::{ListenRequest, Message, MulticastGroup};
use rtnl::{Config, Result};

use crate::common::{self, TestNamespace, next, next_matching};

#[tokio::test]
async fn test_loopback_link_dump() -> Result<()> {
    require_root!();
    common::init_tracing();

    let ns = TestNamespace::new("lodump")?;
    ns.link_up("lo")?;
    let (conn, mut stream, listener) = ns.listen(Config::new(), ListenRequest::LINKS)?;

    let Message::Link(lo) = next(&mut stream).await else {
        panic!("expected a link");
    };
    assert_eq!(lo.index, 1);
    assert_eq!(lo.name(), Some("lo"));
    assert!(
        lo.flags
            .contains(IfInfoFlags::UP | IfInfoFlags::LOOPBACK | IfInfoFlags::RUNNING)
    );
    assert!(lo.is_loopback());
    assert_eq!(lo.mtu(), Some(65536));

    let Message::Done(done) = next(&mut stream).await else {
        panic!("expected the dump to end");
    };
    assert_eq!(done.port_id, conn.port_id());

    conn.close();
    listener.await.expect("listener panicked")?;
    assert!(stream.recv().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_loopback_address_dump() -> Result<()> {
    require_root!();
    common::init_tracing();

    let ns = TestNamespace::new("addrdump")?;
    ns.link_up("lo")?;
    let (conn, mut stream, listener) = ns.listen(Config::new(), ListenRequest::ADDRESSES)?;

    let Message::Address(v4) = next(&mut stream).await else {
        panic!("expected an IPv4 address");
    };
    assert_eq!(v4.address(), Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    assert_eq!(v4.prefix_len, 8);
    assert_eq!(v4.label(), Some("lo"));
    assert!(matches!(next(&mut stream).await, Message::Done(_)));

    let Message::Address(v6) = next(&mut stream).await else {
        panic!("expected an IPv6 address");
    };
    assert_eq!(v6.address(), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    assert_eq!(v6.prefix_len, 128);
    assert!(matches!(next(&mut stream).await, Message::Done(_)));

    conn.close();
    listener.await.expect("listener panicked")?;
    Ok(())
}

#[tokio::test]
async fn test_link_notification_after_dump() -> Result<()> {
    require_root!();
    common::init_tracing();

    let ns = TestNamespace::new("notify")?;
    let config = Config::new().groups(&[MulticastGroup::RTNLGRP_LINK]);
    let (conn, mut stream, listener) = ns.listen(config, ListenRequest::LINKS)?;

    next_matching(&mut stream, |m| matches!(m, Message::Done(_)).then_some(())).await;

    ns.add_dummy("dummy0")?;
    let dummy = next_matching(&mut stream, |m| match m {
        Message::Link(link) if link.name() == Some("dummy0") => Some(link),
        _ => None,
    })
    .await;
    assert_eq!(dummy.kind(), Some("dummy"));
    assert_eq!(dummy.header.sequence, 0);
    assert_eq!(dummy.index, ns.ifindex("dummy0")?);

    conn.close();
    listener.await.expect("listener panicked")?;
    Ok(())
}

#[tokio::test]
async fn test_address_notification_streams_only() -> Result<()> {
    require_root!();
    common::init_tracing();

    let ns = TestNamespace::new("addrnotify")?;
    ns.add_dummy("dummy0")?;
    ns.link_up("dummy0")?;
    let config = Config::new().groups(&[MulticastGroup::RTNLGRP_IPV4_IFADDR]);
    let (conn, mut stream, listener) = ns.listen(config, &[ListenRequest::NOOP])?;

    ns.add_addr("dummy0", "10.11.12.13/24")?;
    let addr = next_matching(&mut stream, |m| match m {
        Message::Address(a) => Some(a),
        _ => None,
    })
    .await;
    assert_eq!(addr.address(), Some(IpAddr::V4(Ipv4Addr::new(10, 11, 12, 13))));
    assert_eq!(addr.prefix_len, 24);
    assert_eq!(addr.index, ns.ifindex("dummy0")?);

    conn.close();
    listener.await.expect("listener panicked")?;
    Ok(())
}
