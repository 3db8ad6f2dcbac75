//! 设备 → 控制器方向的报文转发
//!
//! 每条报文的处理流程：
//!
//! ```text
//! 读报文头 ──► 分类
//!               ├─ Packet-In（已知版本）──► 读子头 ──► 分块读入帧 ──► 整条转发 ──► tee
//!               ├─ Features-Reply ────────► 读入正文 ──► 取 DPID ──► 整条转发
//!               └─ 其他 ──────────────────► 分块流式转发（不缓存整条报文）
//! ```
//!
//! 读取量严格等于报文头声明的长度。

use domain::Criteria;
use oftee_protocol::{
    BUFFER_SIZE, HEADER_LEN, Header, PacketIn, PacketInLayout, ProtocolError, datapath_id,
    link_type,
};
use oftee_tee::{Delivery, Endpoints};
use oftee_telemetry::{record_link_type_decode_failure, record_message_forwarded, record_packet_in};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const LOG_TARGET: &str = "oftee.session";

/// 单条报文的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forwarded {
    /// 直接透传到控制器
    PassThrough { msg_type: u8, length: u16 },
    /// Packet-In：已转发并按链路类型分发
    PacketIn {
        length: u16,
        link_type: Option<u16>,
        delivery: Delivery,
    },
    /// Features-Reply：已转发，附带 DPID
    FeaturesReply { length: u16, dpid: Option<u64> },
}

/// 单个设备连接的报文转发器
pub struct MessageForwarder<R, W> {
    reader: R,
    controller: W,
    endpoints: Arc<Endpoints>,
    /// 分块读取的复用缓冲区
    scratch: Vec<u8>,
    /// 整条报文的重组缓冲区
    message: Vec<u8>,
}

impl<R, W> MessageForwarder<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, controller: W, endpoints: Arc<Endpoints>) -> Self {
        Self {
            reader,
            controller,
            endpoints,
            scratch: vec![0u8; BUFFER_SIZE],
            message: Vec::with_capacity(BUFFER_SIZE),
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.controller)
    }

    /// 读取并转发下一条报文。
    ///
    /// 在报文边界处对端关闭时返回 [`ProtocolError::Closed`]。
    pub async fn forward_next(&mut self) -> Result<Forwarded, ProtocolError> {
        let header = self.read_header().await?;
        self.forward(header).await
    }

    /// 读取下一条报文的头部。
    ///
    /// 只有这一步可以安全地中途取消：此时尚未向控制器或端点写入任何字节。
    pub async fn read_header(&mut self) -> Result<Header, ProtocolError> {
        Header::read_from(&mut self.reader).await
    }

    /// 转发已读到头部的报文，写完整条报文（含 tee）后才返回。
    pub async fn forward(&mut self, header: Header) -> Result<Forwarded, ProtocolError> {
        let forwarded = if header.is_packet_in() {
            match PacketInLayout::for_version(header.version) {
                Some(layout) => self.packet_in(&header, layout).await?,
                None => self.pass_through(&header).await?,
            }
        } else if header.is_features_reply() {
            self.features_reply(&header).await?
        } else {
            self.pass_through(&header).await?
        };

        record_message_forwarded();
        Ok(forwarded)
    }

    /// 非 Packet-In：报文头之后的字节分块搬运，不缓存整条报文，不做 tee。
    async fn pass_through(&mut self, header: &Header) -> Result<Forwarded, ProtocolError> {
        debug!(
            target: LOG_TARGET,
            of_version = header.version,
            of_message = header.type_name(),
            of_transaction = header.xid,
            length = header.length,
            "SENDING: SDN controller"
        );

        self.controller.write_all(&header.encode()).await?;
        let mut left = header.body_len();
        while left > 0 {
            let want = left.min(BUFFER_SIZE);
            let n = self.reader.read(&mut self.scratch[..want]).await?;
            if n == 0 {
                return Err(truncated(header));
            }
            self.controller.write_all(&self.scratch[..n]).await?;
            left -= n;
        }
        self.controller.flush().await?;

        Ok(Forwarded::PassThrough {
            msg_type: header.msg_type,
            length: header.length,
        })
    }

    async fn packet_in(
        &mut self,
        header: &Header,
        layout: PacketInLayout,
    ) -> Result<Forwarded, ProtocolError> {
        debug!(
            target: LOG_TARGET,
            of_version = header.version,
            of_message = header.type_name(),
            of_transaction = header.xid,
            length = header.length,
            "SENDING: all end-points"
        );
        record_packet_in();

        let packet_in = PacketIn::read_from(&mut self.reader, header, layout).await?;
        let frame_offset = HEADER_LEN + packet_in.wire_len();

        self.message.clear();
        self.message.extend_from_slice(&header.encode());
        self.message.extend_from_slice(packet_in.as_bytes());
        self.read_body(header, usize::from(header.length) - frame_offset)
            .await?;

        let link_type = link_type(&self.message[frame_offset..]);
        let state = match link_type {
            Some(dl_type) => Criteria::with_dl_type(dl_type),
            None => {
                record_link_type_decode_failure();
                debug!(
                    target: LOG_TARGET,
                    of_transaction = header.xid,
                    frame_length = self.message.len() - frame_offset,
                    "unable to decode link type of packet-in frame"
                );
                Criteria::wildcard()
            }
        };

        self.controller.write_all(&self.message).await?;
        self.controller.flush().await?;

        let delivery = self.endpoints.conditional_write(&self.message, &state).await;
        Ok(Forwarded::PacketIn {
            length: header.length,
            link_type,
            delivery,
        })
    }

    /// Features-Reply 很短，整条读入后取出 DPID 再转发。
    async fn features_reply(&mut self, header: &Header) -> Result<Forwarded, ProtocolError> {
        debug!(
            target: LOG_TARGET,
            of_version = header.version,
            of_message = header.type_name(),
            of_transaction = header.xid,
            length = header.length,
            "SENDING: SDN controller"
        );

        self.message.clear();
        self.message.extend_from_slice(&header.encode());
        self.read_body(header, header.body_len()).await?;
        let dpid = datapath_id(&self.message[HEADER_LEN..]);

        self.controller.write_all(&self.message).await?;
        self.controller.flush().await?;

        Ok(Forwarded::FeaturesReply {
            length: header.length,
            dpid,
        })
    }

    /// 分块读取 `len` 字节追加到重组缓冲区。
    async fn read_body(&mut self, header: &Header, len: usize) -> Result<(), ProtocolError> {
        let mut left = len;
        while left > 0 {
            let want = left.min(BUFFER_SIZE);
            let n = self.reader.read(&mut self.scratch[..want]).await?;
            if n == 0 {
                return Err(truncated(header));
            }
            self.message.extend_from_slice(&self.scratch[..n]);
            left -= n;
        }
        Ok(())
    }
}

fn truncated(header: &Header) -> ProtocolError {
    ProtocolError::Io(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        format!(
            "connection closed inside {} message of {} bytes",
            header.type_name(),
            header.length
        ),
    ))
}
