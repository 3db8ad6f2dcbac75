//! Packet-In 子头
//!
//! 子头在各版本中的布局：
//!
//! ```text
//! 1.0        buffer_id(4) total_len(2) in_port(2) reason(1) pad(1)
//! 1.2        buffer_id(4) total_len(2) reason(1) table_id(1) match(8n) pad(2)
//! 1.3 及以后 buffer_id(4) total_len(2) reason(1) table_id(1) cookie(8) match(8n) pad(2)
//! ```
//!
//! match 以 `type(2) length(2)` 开头，`length` 不含尾部填充，整体按 8 字节对齐。

use crate::error::ProtocolError;
use crate::header::{Header, VERSION_1_0, VERSION_1_2};
use tokio::io::{AsyncRead, AsyncReadExt};

const MATCH_HEADER_LEN: usize = 4;
const MATCH_ALIGN: usize = 8;
const TRAILING_PAD_LEN: usize = 2;

/// 最高支持的协议版本（1.5）
const MAX_VERSION: u8 = 0x06;

/// 按协议版本区分的子头布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketInLayout {
    /// OpenFlow 1.0：固定 10 字节
    V10,
    /// OpenFlow 1.2：带 match，无 cookie
    V12,
    /// OpenFlow 1.3 - 1.5：带 cookie 与 match
    V13,
}

impl PacketInLayout {
    /// 不支持的版本返回 None，此类报文按普通报文透传。
    pub fn for_version(version: u8) -> Option<Self> {
        match version {
            VERSION_1_0 => Some(Self::V10),
            VERSION_1_2 => Some(Self::V12),
            v if (0x04..=MAX_VERSION).contains(&v) => Some(Self::V13),
            _ => None,
        }
    }

    /// match 之前的固定字段长度（1.0 即为整个子头）。
    fn fixed_len(self) -> usize {
        match self {
            Self::V10 => 10,
            Self::V12 => 8,
            Self::V13 => 16,
        }
    }
}

/// 已读取的 Packet-In 子头
///
/// 保留读到的原始字节，重新组装时与线上字节完全一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketIn {
    pub layout: PacketInLayout,
    pub buffer_id: u32,
    pub total_len: u16,
    pub reason: u8,
    pub in_port: Option<u16>,
    pub table_id: Option<u8>,
    pub cookie: Option<u64>,
    raw: Vec<u8>,
}

impl PacketIn {
    /// 在报文头之后读取子头，读取量不超过 `header` 声明的长度。
    pub async fn read_from<R>(
        reader: &mut R,
        header: &Header,
        layout: PacketInLayout,
    ) -> Result<Self, ProtocolError>
    where
        R: AsyncRead + Unpin,
    {
        let available = header.body_len();
        let prefix_len = match layout {
            PacketInLayout::V10 => layout.fixed_len(),
            _ => layout.fixed_len() + MATCH_HEADER_LEN,
        };
        ensure_fits(prefix_len, available)?;

        let mut raw = vec![0u8; prefix_len];
        reader.read_exact(&mut raw).await?;

        if layout != PacketInLayout::V10 {
            let at = layout.fixed_len() + 2;
            let match_len = usize::from(u16::from_be_bytes([raw[at], raw[at + 1]]));
            if match_len < MATCH_HEADER_LEN {
                return Err(ProtocolError::Framing(format!(
                    "match length {} shorter than its header",
                    match_len
                )));
            }
            let padded = match_len.div_ceil(MATCH_ALIGN) * MATCH_ALIGN;
            let total = layout.fixed_len() + padded + TRAILING_PAD_LEN;
            ensure_fits(total, available)?;

            raw.resize(total, 0);
            reader.read_exact(&mut raw[prefix_len..]).await?;
        }

        Ok(Self::from_raw(layout, raw))
    }

    fn from_raw(layout: PacketInLayout, raw: Vec<u8>) -> Self {
        let buffer_id = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let total_len = u16::from_be_bytes([raw[4], raw[5]]);
        let (reason, in_port, table_id, cookie) = match layout {
            PacketInLayout::V10 => (raw[8], Some(u16::from_be_bytes([raw[6], raw[7]])), None, None),
            PacketInLayout::V12 => (raw[6], None, Some(raw[7]), None),
            PacketInLayout::V13 => {
                let mut cookie = [0u8; 8];
                cookie.copy_from_slice(&raw[8..16]);
                (raw[6], None, Some(raw[7]), Some(u64::from_be_bytes(cookie)))
            }
        };
        Self {
            layout,
            buffer_id,
            total_len,
            reason,
            in_port,
            table_id,
            cookie,
            raw,
        }
    }

    /// 子头在线上的字节数。
    pub fn wire_len(&self) -> usize {
        self.raw.len()
    }

    /// 子头原始字节。
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

fn ensure_fits(needed: usize, available: usize) -> Result<(), ProtocolError> {
    if needed > available {
        return Err(ProtocolError::Framing(format!(
            "packet-in sub-header needs {} bytes but message declares {}",
            needed, available
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{HEADER_LEN, TYPE_PACKET_IN, VERSION_1_3};

    fn header(version: u8, body_len: usize) -> Header {
        Header {
            version,
            msg_type: TYPE_PACKET_IN,
            length: (HEADER_LEN + body_len) as u16,
            xid: 7,
        }
    }

    #[test]
    fn layouts_by_version() {
        assert_eq!(PacketInLayout::for_version(0x01), Some(PacketInLayout::V10));
        assert_eq!(PacketInLayout::for_version(0x02), None);
        assert_eq!(PacketInLayout::for_version(0x03), Some(PacketInLayout::V12));
        assert_eq!(PacketInLayout::for_version(0x04), Some(PacketInLayout::V13));
        assert_eq!(PacketInLayout::for_version(0x06), Some(PacketInLayout::V13));
        assert_eq!(PacketInLayout::for_version(0x07), None);
    }

    #[tokio::test]
    async fn reads_v13_sub_header_with_padded_match() {
        let mut bytes = vec![
            0xff, 0xff, 0xff, 0xff, // buffer_id
            0x00, 0x3c, // total_len
            0x01, // reason
            0x02, // table_id
            0, 0, 0, 0, 0, 0, 0, 0x09, // cookie
            0x00, 0x01, 0x00, 0x0c, // match type=OXM length=12
            0x80, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x03, // in_port=3
            0, 0, 0, 0, // match padding to 16
            0, 0, // pad
        ];
        let sub_len = bytes.len();
        bytes.extend_from_slice(&[0xaa; 20]);

        let header = header(VERSION_1_3, bytes.len());
        let mut reader = bytes.as_slice();
        let packet_in = PacketIn::read_from(&mut reader, &header, PacketInLayout::V13)
            .await
            .unwrap();

        assert_eq!(packet_in.wire_len(), sub_len);
        assert_eq!(packet_in.as_bytes(), &bytes[..sub_len]);
        assert_eq!(packet_in.buffer_id, u32::MAX);
        assert_eq!(packet_in.total_len, 60);
        assert_eq!(packet_in.reason, 1);
        assert_eq!(packet_in.table_id, Some(2));
        assert_eq!(packet_in.cookie, Some(9));
        // 帧数据未被消费
        assert_eq!(reader.len(), 20);
    }

    #[tokio::test]
    async fn reads_v10_fixed_sub_header() {
        let bytes = [0, 0, 0, 1, 0, 14, 0, 5, 0, 0, 0xbb, 0xbb];
        let header = header(VERSION_1_0, bytes.len());
        let mut reader = &bytes[..];
        let packet_in = PacketIn::read_from(&mut reader, &header, PacketInLayout::V10)
            .await
            .unwrap();
        assert_eq!(packet_in.wire_len(), 10);
        assert_eq!(packet_in.in_port, Some(5));
        assert_eq!(packet_in.cookie, None);
    }

    #[tokio::test]
    async fn declared_length_too_short_is_framing_error() {
        let bytes = [0u8; 24];
        let header = header(VERSION_1_3, 12);
        let mut reader = &bytes[..];
        let err = PacketIn::read_from(&mut reader, &header, PacketInLayout::V13)
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Framing(_)));
    }

    #[tokio::test]
    async fn match_longer_than_message_is_framing_error() {
        let mut bytes = vec![0u8; 16];
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x40]);
        let header = header(VERSION_1_3, bytes.len() + 8);
        bytes.resize(64, 0);
        let mut reader = bytes.as_slice();
        let err = PacketIn::read_from(&mut reader, &header, PacketInLayout::V13)
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Framing(_)));
    }
}
