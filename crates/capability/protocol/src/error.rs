//! 协议错误类型定义

/// 分帧错误
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// 对端在报文边界处关闭连接
    #[error("connection closed by peer")]
    Closed,

    /// IO 错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 声明长度与实际结构不一致
    #[error("framing error: {0}")]
    Framing(String),
}

impl ProtocolError {
    /// 是否为正常关闭（无需按错误记录）。
    pub fn is_closed(&self) -> bool {
        matches!(self, ProtocolError::Closed)
    }
}
