//! Kernel-shaped records for unit tests.

use zerocopy::IntoBytes;

use super::consts::{AddressFamily, MessageType};
use super::flags::HeaderFlags;
use super::message::{Header, NLMSG_HDRLEN, NlMsgHdr, nlmsg_align};
use super::types::addr::AddrAttr;
use super::types::inet::InetAttr;
use super::types::link::{LinkAttr, LinkStat, LinkStats64};
use super::types::neigh::{NdaCacheInfo, NeighborAttr};
use super::types::route::RouteAttr;

/// Port id used as "our" socket in session fixtures.
pub const PORT: u32 = 4242;

/// A record of `kind` with `body`, padded to 4 bytes. `length` is unpadded.
pub fn record(kind: MessageType, body: &[u8]) -> Vec<u8> {
    let header = Header {
        length: (NLMSG_HDRLEN + body.len()) as u32,
        kind,
        ..Default::default()
    };
    let mut out = NlMsgHdr::from(header).as_bytes().to_vec();
    out.extend_from_slice(body);
    out.resize(nlmsg_align(out.len()), 0);
    out
}

/// Append one TLV and grow the header length to cover it.
pub fn push_attr(record: &mut Vec<u8>, kind: u16, payload: &[u8]) {
    record.resize(nlmsg_align(record.len()), 0);
    record.extend_from_slice(&((4 + payload.len()) as u16).to_ne_bytes());
    record.extend_from_slice(&kind.to_ne_bytes());
    record.extend_from_slice(payload);
    record.resize(nlmsg_align(record.len()), 0);
    set_length(record);
}

/// Encode a nested TLV run.
pub fn tlvs(attrs: &[(u16, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();
    for (kind, payload) in attrs {
        out.extend_from_slice(&((4 + payload.len()) as u16).to_ne_bytes());
        out.extend_from_slice(&kind.to_ne_bytes());
        out.extend_from_slice(payload);
        out.resize(nlmsg_align(out.len()), 0);
    }
    out
}

fn set_length(record: &mut [u8]) {
    let len = record.len() as u32;
    record[..4].copy_from_slice(&len.to_ne_bytes());
}

/// Overwrite flags, sequence and port id of the record's header.
pub fn stamp(record: &mut [u8], flags: HeaderFlags, sequence: u32, port_id: u32) {
    record[6..8].copy_from_slice(&flags.bits().to_ne_bytes());
    record[8..12].copy_from_slice(&sequence.to_ne_bytes());
    record[12..16].copy_from_slice(&port_id.to_ne_bytes());
}

fn dump_part(mut record: Vec<u8>) -> Vec<u8> {
    stamp(&mut record, HeaderFlags::MULTI, 1, PORT);
    record
}

/// `NLMSG_DONE` ending the dump with `sequence`.
pub fn done(sequence: u32) -> Vec<u8> {
    let mut out = record(MessageType::NLMSG_DONE, &0i32.to_ne_bytes());
    stamp(&mut out, HeaderFlags::MULTI, sequence, 0);
    out
}

/// `NLMSG_ERROR` answering the request `sequence` sent from `port_id`.
pub fn error_reply(errno: i32, kind: MessageType, sequence: u32, port_id: u32) -> Vec<u8> {
    let request = Header {
        length: NLMSG_HDRLEN as u32,
        kind,
        flags: HeaderFlags::REQUEST | HeaderFlags::ACK,
        sequence,
        port_id,
        nsid: None,
    };
    let mut body = errno.to_ne_bytes().to_vec();
    body.extend_from_slice(NlMsgHdr::from(request).as_bytes());
    let mut out = record(MessageType::NLMSG_ERROR, &body);
    stamp(&mut out, HeaderFlags::empty(), sequence, port_id);
    out
}

/// `lo` as reported by a link dump: index 1, UP | LOOPBACK | RUNNING.
pub fn link_loopback() -> Vec<u8> {
    let mut body = vec![0u8, 0];
    body.extend_from_slice(&772u16.to_ne_bytes());
    body.extend_from_slice(&1u32.to_ne_bytes());
    body.extend_from_slice(&0x49u32.to_ne_bytes());
    body.extend_from_slice(&0u32.to_ne_bytes());

    let mut stats = LinkStats64::default();
    stats.0[LinkStat::RX_PACKETS.0] = 12;
    stats.0[LinkStat::TX_PACKETS.0] = 12;
    stats.0[LinkStat::RX_BYTES.0] = 1008;
    stats.0[LinkStat::TX_BYTES.0] = 1008;

    let mut out = record(MessageType::RTM_NEWLINK, &body);
    push_attr(&mut out, LinkAttr::IFLA_IFNAME.0, b"lo\0");
    push_attr(&mut out, LinkAttr::IFLA_TXQLEN.0, &1000u32.to_ne_bytes());
    push_attr(&mut out, LinkAttr::IFLA_OPERSTATE.0, &[0]);
    push_attr(&mut out, LinkAttr::IFLA_LINKMODE.0, &[0]);
    push_attr(&mut out, LinkAttr::IFLA_MTU.0, &65536u32.to_ne_bytes());
    push_attr(&mut out, LinkAttr::IFLA_GROUP.0, &0u32.to_ne_bytes());
    push_attr(&mut out, LinkAttr::IFLA_QDISC.0, b"noqueue\0");
    push_attr(&mut out, LinkAttr::IFLA_CARRIER.0, &[1]);
    push_attr(&mut out, LinkAttr::IFLA_ADDRESS.0, &[0; 6]);
    push_attr(&mut out, LinkAttr::IFLA_BROADCAST.0, &[0; 6]);
    push_attr(&mut out, LinkAttr::IFLA_STATS64.0, stats.as_bytes());
    push_attr(&mut out, LinkAttr::IFLA_XDP.0, &tlvs(&[(1, &[0, 0, 0, 0])]));
    dump_part(out)
}

/// A link whose `IFLA_AF_SPEC` carries an `AF_INET` device config of [1, 0, 1].
pub fn link_with_af_spec(family: AddressFamily) -> Vec<u8> {
    let mut body = vec![family.0, 0];
    body.extend_from_slice(&1u16.to_ne_bytes());
    body.extend_from_slice(&5u32.to_ne_bytes());
    body.extend_from_slice(&0x1003u32.to_ne_bytes());
    body.extend_from_slice(&0u32.to_ne_bytes());

    let mut conf = Vec::new();
    for v in [1u32, 0, 1] {
        conf.extend_from_slice(&v.to_ne_bytes());
    }
    let inet = tlvs(&[(InetAttr::IFLA_INET_CONF.0, &conf)]);
    let spec = tlvs(&[(u16::from(AddressFamily::AF_INET.0), &inet)]);

    let mut out = record(MessageType::RTM_NEWLINK, &body);
    push_attr(&mut out, LinkAttr::IFLA_IFNAME.0, b"br0\0");
    push_attr(&mut out, LinkAttr::IFLA_AF_SPEC.0, &spec);
    dump_part(out)
}

/// 127.0.0.1/8 on `lo`.
pub fn addr_ipv4_loopback() -> Vec<u8> {
    let mut body = vec![2u8, 8, 0x80, 254];
    body.extend_from_slice(&1u32.to_ne_bytes());

    let mut cache = Vec::new();
    for v in [u32::MAX, u32::MAX, 250, 250] {
        cache.extend_from_slice(&v.to_ne_bytes());
    }

    let mut out = record(MessageType::RTM_NEWADDR, &body);
    push_attr(&mut out, AddrAttr::IFA_ADDRESS.0, &[127, 0, 0, 1]);
    push_attr(&mut out, AddrAttr::IFA_LOCAL.0, &[127, 0, 0, 1]);
    push_attr(&mut out, AddrAttr::IFA_LABEL.0, b"lo\0");
    push_attr(&mut out, AddrAttr::IFA_FLAGS.0, &0x80u32.to_ne_bytes());
    push_attr(&mut out, AddrAttr::IFA_CACHEINFO.0, &cache);
    dump_part(out)
}

/// `default via 192.168.1.1 dev 2 proto dhcp metric 100`.
pub fn route_ipv4_default() -> Vec<u8> {
    let mut body = vec![2u8, 0, 0, 0, 254, 16, 0, 1];
    body.extend_from_slice(&0u32.to_ne_bytes());

    let mut out = record(MessageType::RTM_NEWROUTE, &body);
    push_attr(&mut out, RouteAttr::RTA_TABLE.0, &254u32.to_ne_bytes());
    push_attr(&mut out, RouteAttr::RTA_PRIORITY.0, &100u32.to_ne_bytes());
    push_attr(&mut out, RouteAttr::RTA_GATEWAY.0, &[192, 168, 1, 1]);
    push_attr(&mut out, RouteAttr::RTA_OIF.0, &2u32.to_ne_bytes());
    push_attr(&mut out, RouteAttr::RTA_PREFSRC.0, &[192, 168, 1, 10]);
    dump_part(out)
}

/// A reachable ARP entry for 192.168.1.1 on ifindex 2.
pub fn neigh_ipv4_reachable() -> Vec<u8> {
    let mut body = vec![2u8, 0, 0, 0];
    body.extend_from_slice(&2u32.to_ne_bytes());
    body.extend_from_slice(&0x02u16.to_ne_bytes());
    body.extend_from_slice(&[0, 1]);

    let cache = NdaCacheInfo {
        ndm_confirmed: 1200,
        ndm_used: 1200,
        ndm_updated: 1200,
        ndm_refcnt: 1,
    };

    let mut out = record(MessageType::RTM_NEWNEIGH, &body);
    push_attr(&mut out, NeighborAttr::NDA_DST.0, &[192, 168, 1, 1]);
    push_attr(&mut out, NeighborAttr::NDA_LLADDR.0, &[0x52, 0x54, 0x00, 0x12, 0x34, 0x56]);
    push_attr(&mut out, NeighborAttr::NDA_CACHEINFO.0, cache.as_bytes());
    push_attr(&mut out, NeighborAttr::NDA_PROBES.0, &0u32.to_ne_bytes());
    dump_part(out)
}
