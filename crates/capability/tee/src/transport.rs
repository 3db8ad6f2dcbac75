//! 传输抽象：TCP 直连与 HTTP POST 两种实现。
//!
//! 写入为单次尽力投递，不重试、不重连。

use crate::error::TeeError;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// HTTP 投递使用的 Content-Type
pub const OCTET_STREAM: &str = "application/octet-stream";

/// 可写入报文的目标。
#[async_trait]
pub trait Transport: Send + Sync {
    /// 写入一条完整报文。
    async fn write(&self, message: &[u8]) -> Result<(), TeeError>;
}

/// TCP 直连目标
///
/// 多个会话共享同一目标时，写锁保证每条报文整体写完后才会写入下一条。
pub struct TcpTransport {
    addr: String,
    stream: Mutex<TcpStream>,
}

impl TcpTransport {
    /// 连接到 `host:port`。
    pub async fn connect(addr: &str) -> Result<Self, TeeError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| TeeError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self::from_stream(addr, stream))
    }

    pub fn from_stream(addr: impl Into<String>, stream: TcpStream) -> Self {
        Self {
            addr: addr.into(),
            stream: Mutex::new(stream),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn write(&self, message: &[u8]) -> Result<(), TeeError> {
        let mut stream = self.stream.lock().await;
        stream.write_all(message).await?;
        Ok(())
    }
}

/// HTTP 目标，每条报文一次 POST，请求体为原始报文字节。
pub struct HttpTransport {
    url: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    /// 复用已有客户端（连接池在端点之间共享）。
    pub fn with_client(url: Url, client: reqwest::Client) -> Self {
        Self { url, client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn write(&self, message: &[u8]) -> Result<(), TeeError> {
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(message.to_vec())
            .send()
            .await
            .map_err(|err| TeeError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TeeError::Http(format!(
                "{} responded with status {}",
                self.url, status
            )));
        }
        Ok(())
    }
}
