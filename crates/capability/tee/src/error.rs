//! tee 错误类型定义

/// 端点配置与写入错误
#[derive(Debug, thiserror::Error)]
pub enum TeeError {
    /// 未知的描述项
    #[error("unknown end point term '{0}'")]
    UnknownTerm(String),

    /// 描述项缺少 `=`
    #[error("malformed end point term '{0}'")]
    MalformedTerm(String),

    /// 描述项取值无法解析
    #[error("invalid value '{value}' for term '{term}': {reason}")]
    InvalidValue {
        term: String,
        value: String,
        reason: String,
    },

    /// 目标地址无法解析
    #[error("invalid end point address '{0}': {1}")]
    InvalidAddress(String, String),

    /// TCP 目标连接失败
    #[error("unable to connect to end point '{addr}': {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// IO 错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP 投递失败
    #[error("http error: {0}")]
    Http(String),
}
