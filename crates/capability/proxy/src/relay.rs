//! 控制器 → 设备方向
//!
//! 控制器报文与管理 API 注入的报文共用同一个 [`DeviceWriter`]，
//! 每次写入持锁写完整条报文，两路来源的报文不会交错。

use crate::error::ProxyError;
use async_trait::async_trait;
use oftee_inject::{InjectError, Injector};
use oftee_protocol::{BUFFER_SIZE, HEADER_LEN, Header, ProtocolError};
use oftee_telemetry::record_message_injected;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::debug;

/// 设备连接写半部
pub struct DeviceWriter<W> {
    inner: Arc<Mutex<Option<W>>>,
}

impl<W> Clone for DeviceWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W> DeviceWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(writer))),
        }
    }

    /// 写入一条完整报文；连接已关闭时返回 [`InjectError::Closed`]。
    pub async fn write(&self, message: &[u8]) -> Result<(), InjectError> {
        let mut guard = self.inner.lock().await;
        let writer = guard.as_mut().ok_or(InjectError::Closed)?;
        writer.write_all(message).await?;
        writer.flush().await?;
        Ok(())
    }

    /// 关闭写半部，之后的写入全部失败。
    pub async fn close(&self) {
        let writer = self.inner.lock().await.take();
        if let Some(mut writer) = writer {
            let _ = writer.shutdown().await;
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.is_none()
    }
}

#[async_trait]
impl<W> Injector for DeviceWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn inject(&self, message: &[u8]) -> Result<(), InjectError> {
        self.write(message).await?;
        record_message_injected();
        Ok(())
    }
}

/// 把控制器发来的报文逐条回传给设备，直到控制器关闭连接。
pub async fn relay_controller<R, W>(reader: R, device: DeviceWriter<W>) -> Result<(), ProxyError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, reader);
    let mut message = Vec::with_capacity(BUFFER_SIZE);
    loop {
        let header = match Header::read_from(&mut reader).await {
            Ok(header) => header,
            Err(ProtocolError::Closed) => {
                debug!(target: "oftee.session", "controller closed connection");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        message.clear();
        message.extend_from_slice(&header.encode());
        message.resize(header.length as usize, 0);
        reader
            .read_exact(&mut message[HEADER_LEN..])
            .await
            .map_err(ProtocolError::from)?;

        debug!(
            target: "oftee.session",
            of_version = header.version,
            of_message = header.type_name(),
            of_transaction = header.xid,
            length = header.length,
            "SENDING: device"
        );
        device.write(&message).await?;
    }
}
