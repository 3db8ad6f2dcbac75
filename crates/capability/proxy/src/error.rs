//! 代理错误类型定义

use oftee_inject::InjectError;
use oftee_protocol::ProtocolError;
use oftee_tee::TeeError;

/// 代理错误
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// 无法监听设备侧地址
    #[error("unable to listen on '{addr}': {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// 无法连接控制器
    #[error("unable to connect to controller '{addr}': {source}")]
    Controller {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// 分帧或传输错误
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// 端点配置错误
    #[error(transparent)]
    Tee(#[from] TeeError),

    /// 写入设备失败
    #[error("device write failed: {0}")]
    Device(#[from] InjectError),
}
