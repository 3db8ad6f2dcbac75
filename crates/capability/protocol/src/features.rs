//! Features-Reply：仅取出 DPID。

/// DPID 位于 Features-Reply 正文最前面 8 字节
pub const FEATURES_DPID_LEN: usize = 8;

/// 从 Features-Reply 正文（不含报文头）读取 DPID。
pub fn datapath_id(body: &[u8]) -> Option<u64> {
    let bytes: [u8; FEATURES_DPID_LEN] = body.get(..FEATURES_DPID_LEN)?.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}
