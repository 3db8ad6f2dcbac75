//! 以太网帧：只读取链路类型。

/// 目的 MAC + 源 MAC + EtherType
pub const ETHERNET_HEADER_LEN: usize = 14;

const ETHER_TYPE_OFFSET: usize = 12;

/// 小于该值的字段是 802.3 长度而非 EtherType
const MIN_ETHER_TYPE: u16 = 0x0600;

/// 读取以太网帧的链路类型。
///
/// 帧过短或该字段为 802.3 长度时返回 None，调用方按“未提取到字段”处理。
pub fn link_type(frame: &[u8]) -> Option<u16> {
    if frame.len() < ETHERNET_HEADER_LEN {
        return None;
    }
    let value = u16::from_be_bytes([frame[ETHER_TYPE_OFFSET], frame[ETHER_TYPE_OFFSET + 1]]);
    (value >= MIN_ETHER_TYPE).then_some(value)
}
