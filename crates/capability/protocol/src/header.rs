//! OpenFlow 报文头

use crate::error::ProtocolError;
use tokio::io::{AsyncRead, AsyncReadExt};

/// 报文头长度（字节）
pub const HEADER_LEN: usize = 8;

/// 单次读取上限，同时也是转发时复用的缓冲区大小
pub const BUFFER_SIZE: usize = 2048;

pub const VERSION_1_0: u8 = 0x01;
pub const VERSION_1_2: u8 = 0x03;
pub const VERSION_1_3: u8 = 0x04;

pub const TYPE_HELLO: u8 = 0;
pub const TYPE_ECHO_REQUEST: u8 = 2;
pub const TYPE_FEATURES_REPLY: u8 = 6;
pub const TYPE_PACKET_IN: u8 = 10;
pub const TYPE_PACKET_OUT: u8 = 13;

/// OpenFlow 1.0 的报文类型名
const NAMES_1_0: &[&str] = &[
    "Hello",
    "Error",
    "EchoRequest",
    "EchoReply",
    "Vendor",
    "FeaturesRequest",
    "FeaturesReply",
    "GetConfigRequest",
    "GetConfigReply",
    "SetConfig",
    "PacketIn",
    "FlowRemoved",
    "PortStatus",
    "PacketOut",
    "FlowMod",
    "PortMod",
    "StatsRequest",
    "StatsReply",
    "BarrierRequest",
    "BarrierReply",
    "QueueGetConfigRequest",
    "QueueGetConfigReply",
];

/// OpenFlow 1.1 及以后的报文类型名
const NAMES_1_1_PLUS: &[&str] = &[
    "Hello",
    "Error",
    "EchoRequest",
    "EchoReply",
    "Experimenter",
    "FeaturesRequest",
    "FeaturesReply",
    "GetConfigRequest",
    "GetConfigReply",
    "SetConfig",
    "PacketIn",
    "FlowRemoved",
    "PortStatus",
    "PacketOut",
    "FlowMod",
    "GroupMod",
    "PortMod",
    "TableMod",
    "MultipartRequest",
    "MultipartReply",
    "BarrierRequest",
    "BarrierReply",
    "QueueGetConfigRequest",
    "QueueGetConfigReply",
    "RoleRequest",
    "RoleReply",
    "GetAsyncRequest",
    "GetAsyncReply",
    "SetAsync",
    "MeterMod",
];

/// 报文头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub msg_type: u8,
    /// 报文总长度（包含报文头）
    pub length: u16,
    pub xid: u32,
}

impl Header {
    /// 从 8 字节解码并校验长度。
    pub fn decode(buf: &[u8; HEADER_LEN]) -> Result<Self, ProtocolError> {
        let header = Self {
            version: buf[0],
            msg_type: buf[1],
            length: u16::from_be_bytes([buf[2], buf[3]]),
            xid: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
        };
        if usize::from(header.length) < HEADER_LEN {
            return Err(ProtocolError::Framing(format!(
                "declared length {} shorter than header",
                header.length
            )));
        }
        Ok(header)
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0] = self.version;
        buf[1] = self.msg_type;
        buf[2..4].copy_from_slice(&self.length.to_be_bytes());
        buf[4..8].copy_from_slice(&self.xid.to_be_bytes());
        buf
    }

    /// 读取一个报文头。
    ///
    /// 在报文边界处读到 EOF 返回 [`ProtocolError::Closed`]，读到一半返回 IO 错误。
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, ProtocolError>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = [0u8; HEADER_LEN];
        let mut filled = 0;
        while filled < HEADER_LEN {
            let n = reader.read(&mut buf[filled..]).await?;
            if n == 0 {
                if filled == 0 {
                    return Err(ProtocolError::Closed);
                }
                return Err(ProtocolError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed inside message header",
                )));
            }
            filled += n;
        }
        Self::decode(&buf)
    }

    /// 报文头之后的字节数。
    pub fn body_len(&self) -> usize {
        usize::from(self.length) - HEADER_LEN
    }

    pub fn is_packet_in(&self) -> bool {
        self.msg_type == TYPE_PACKET_IN
    }

    pub fn is_features_reply(&self) -> bool {
        self.msg_type == TYPE_FEATURES_REPLY
    }

    /// 报文类型名，仅用于日志。
    pub fn type_name(&self) -> &'static str {
        let names = if self.version == VERSION_1_0 {
            NAMES_1_0
        } else {
            NAMES_1_1_PLUS
        };
        names
            .get(usize::from(self.msg_type))
            .copied()
            .unwrap_or("Unknown")
    }
}
