//! 设备侧监听
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let config = ProxyConfig {
//!     listen_on: ":8000".to_string(),
//!     proxy_to: ":8001".to_string(),
//!     tee_to: vec![":8002".to_string()],
//!     share_connections: true,
//! };
//! let server = ProxyServer::new(config, None).await?;
//! server.run().await?;
//! ```

use crate::error::ProxyError;
use crate::session::{SessionContext, run_session};
use domain::listen_addr;
use oftee_inject::MappingSender;
use oftee_tee::Endpoints;
use oftee_telemetry::record_accept_error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};

/// 代理配置
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// 设备侧监听地址
    pub listen_on: String,
    /// 控制器地址
    pub proxy_to: String,
    /// tee 端点描述
    pub tee_to: Vec<String>,
    /// 所有会话共享一组端点连接
    pub share_connections: bool,
}

/// 代理服务器
pub struct ProxyServer {
    config: Arc<ProxyConfig>,
    /// 共享模式下启动时建立的端点
    shared: Option<Arc<Endpoints>>,
    mappings: Option<MappingSender>,
}

impl ProxyServer {
    /// 创建代理服务器；共享模式下此时建立全部端点连接，失败即返回错误。
    pub async fn new(
        config: ProxyConfig,
        mappings: Option<MappingSender>,
    ) -> Result<Self, ProxyError> {
        let shared = if config.share_connections {
            Some(Arc::new(Endpoints::establish(&config.tee_to).await?))
        } else {
            None
        };
        Ok(Self {
            config: Arc::new(config),
            shared,
            mappings,
        })
    }

    /// 绑定监听地址并开始接受连接，正常情况下不返回。
    pub async fn run(self) -> Result<(), ProxyError> {
        let addr = listen_addr(&self.config.listen_on);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ProxyError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!(listen_on = %addr, proxy_to = %self.config.proxy_to, "proxy listening");
        self.serve(listener).await
    }

    /// 在已绑定的监听器上接受连接。accept 失败只记录，不退出。
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ProxyError> {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    info!(%peer, "new device connection");
                    let config = Arc::clone(&self.config);
                    let shared = self.shared.clone();
                    let mappings = self.mappings.clone();
                    tokio::spawn(async move {
                        handle_connection(stream, peer, config, shared, mappings).await;
                    });
                }
                Err(err) => {
                    record_accept_error();
                    error!(error = %err, "failed to accept device connection");
                }
            }
        }
    }
}

/// 独占模式下在会话任务内建立端点，不阻塞 accept 循环。
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    config: Arc<ProxyConfig>,
    shared: Option<Arc<Endpoints>>,
    mappings: Option<MappingSender>,
) {
    let endpoints = match shared {
        Some(endpoints) => endpoints,
        None => match Endpoints::establish(&config.tee_to).await {
            Ok(endpoints) => Arc::new(endpoints),
            Err(err) => {
                warn!(%peer, error = %err, "dropping device connection, unable to create end points");
                return;
            }
        },
    };

    let ctx = SessionContext {
        controller_addr: config.proxy_to.clone(),
        endpoints,
        mappings,
    };
    if let Err(err) = run_session(stream, peer, ctx).await {
        warn!(%peer, error = %err, "device session failed");
    }
}
