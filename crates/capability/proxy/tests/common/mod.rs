//! 代理集成测试共用的报文构造与测试传输。
#![allow(dead_code)]

use async_trait::async_trait;
use domain::Criteria;
use oftee_tee::{Destination, Endpoint, EndpointSpec, Endpoints, TeeError, Transport};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

pub const ETH_ARP: u16 = 0x0806;
pub const ETH_IPV4: u16 = 0x0800;

pub fn header(version: u8, msg_type: u8, length: usize, xid: u32) -> Vec<u8> {
    let mut buf = vec![version, msg_type];
    buf.extend_from_slice(&(length as u16).to_be_bytes());
    buf.extend_from_slice(&xid.to_be_bytes());
    buf
}

/// 目的/源 MAC + EtherType + 负载
pub fn ethernet_frame(ether_type: u16, payload_len: usize) -> Vec<u8> {
    let mut frame = vec![0xff; 6];
    frame.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    frame.extend_from_slice(&ether_type.to_be_bytes());
    frame.extend((0..payload_len).map(|i| i as u8));
    frame
}

/// OpenFlow 1.3 Packet-In，match 为空的 OXM（4 字节，补齐到 8）。
pub fn packet_in_v13(xid: u32, frame: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0xffff_ffffu32.to_be_bytes());
    body.extend_from_slice(&(frame.len() as u16).to_be_bytes());
    body.push(0); // reason
    body.push(0); // table_id
    body.extend_from_slice(&0x0102_0304_0506_0708u64.to_be_bytes());
    body.extend_from_slice(&[0x00, 0x01, 0x00, 0x04, 0, 0, 0, 0]);
    body.extend_from_slice(&[0, 0]);
    body.extend_from_slice(frame);

    let mut msg = header(0x04, 10, 8 + body.len(), xid);
    msg.extend_from_slice(&body);
    msg
}

pub fn packet_in_v10(xid: u32, frame: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x0000_0100u32.to_be_bytes());
    body.extend_from_slice(&(frame.len() as u16).to_be_bytes());
    body.extend_from_slice(&3u16.to_be_bytes()); // in_port
    body.push(1); // reason
    body.push(0);
    body.extend_from_slice(frame);

    let mut msg = header(0x01, 10, 8 + body.len(), xid);
    msg.extend_from_slice(&body);
    msg
}

pub fn features_reply(version: u8, xid: u32, dpid: u64) -> Vec<u8> {
    let mut msg = header(version, 6, 32, xid);
    msg.extend_from_slice(&dpid.to_be_bytes());
    msg.extend_from_slice(&256u32.to_be_bytes()); // n_buffers
    msg.push(254); // n_tables
    msg.push(0); // auxiliary_id
    msg.extend_from_slice(&[0, 0]);
    msg.extend_from_slice(&0x4fu32.to_be_bytes()); // capabilities
    msg.extend_from_slice(&0u32.to_be_bytes());
    msg
}

pub fn echo_request(version: u8, xid: u32, payload: &[u8]) -> Vec<u8> {
    let mut msg = header(version, 2, 8 + payload.len(), xid);
    msg.extend_from_slice(payload);
    msg
}

/// 每次最多返回一个字节的读端，用于验证分片读取下的重组。
pub struct OneByteReader {
    data: Vec<u8>,
    pos: usize,
}

impl OneByteReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }
}

impl AsyncRead for OneByteReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        if self.pos < self.data.len() && buf.remaining() > 0 {
            let byte = self.data[self.pos];
            buf.put_slice(&[byte]);
            self.pos += 1;
        }
        Poll::Ready(Ok(()))
    }
}

pub type Recorded = Arc<Mutex<Vec<Vec<u8>>>>;

/// 记录收到报文的测试传输。
pub struct Recorder {
    seen: Recorded,
}

#[async_trait]
impl Transport for Recorder {
    async fn write(&self, message: &[u8]) -> Result<(), TeeError> {
        self.seen.lock().expect("lock").push(message.to_vec());
        Ok(())
    }
}

/// 按给定规则构造记录型端点，返回端点列表及各端点的记录。
pub fn recording_endpoints(rules: &[Criteria]) -> (Arc<Endpoints>, Vec<Recorded>) {
    let mut endpoints = Vec::new();
    let mut records = Vec::new();
    for (i, criteria) in rules.iter().enumerate() {
        let seen: Recorded = Arc::new(Mutex::new(Vec::new()));
        let spec = EndpointSpec {
            destination: Destination::Tcp(format!("recorder-{}:1", i)),
            criteria: *criteria,
        };
        endpoints.push(Endpoint::new(
            spec,
            Arc::new(Recorder {
                seen: Arc::clone(&seen),
            }),
        ));
        records.push(seen);
    }
    (Arc::new(Endpoints::new(endpoints)), records)
}

pub fn recorded(record: &Recorded) -> Vec<Vec<u8>> {
    record.lock().expect("lock").clone()
}
