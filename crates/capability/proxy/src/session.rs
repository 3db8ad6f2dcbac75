//! 单个设备连接的会话
//!
//! 会话建立时连接控制器，随后两个方向并发运行，任一方向结束即结束会话：
//! - 设备 → 控制器：[`MessageForwarder`] 逐条转发，Features-Reply 时注册注入映射
//! - 控制器 → 设备：[`relay_controller`] 整条回传

use crate::error::ProxyError;
use crate::forwarder::{Forwarded, MessageForwarder};
use crate::relay::{DeviceWriter, relay_controller};
use domain::{connect_addr, format_dpid};
use oftee_inject::{DpidMapping, MappingSender};
use oftee_tee::Endpoints;
use oftee_telemetry::{record_session_closed, record_session_opened};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// 会话所需的共享上下文
#[derive(Clone)]
pub struct SessionContext {
    pub controller_addr: String,
    pub endpoints: Arc<Endpoints>,
    pub mappings: Option<MappingSender>,
}

/// 处理一个设备连接直到任一端关闭。
pub async fn run_session(
    device: TcpStream,
    peer: SocketAddr,
    ctx: SessionContext,
) -> Result<(), ProxyError> {
    let session = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
    let addr = connect_addr(&ctx.controller_addr);
    let controller = TcpStream::connect(&addr)
        .await
        .map_err(|source| ProxyError::Controller {
            addr: addr.clone(),
            source,
        })?;
    let _ = device.set_nodelay(true);
    let _ = controller.set_nodelay(true);

    record_session_opened();
    info!(session, %peer, controller = %addr, "session started");

    let (device_read, device_write) = device.into_split();
    let (controller_read, controller_write) = controller.into_split();
    let device_writer = DeviceWriter::new(device_write);

    let result = drive(
        session,
        device_read,
        controller_write,
        controller_read,
        device_writer.clone(),
        &ctx,
    )
    .await;

    device_writer.close().await;
    record_session_closed();
    match &result {
        Ok(()) => info!(session, %peer, "session closed"),
        Err(err) => debug!(session, %peer, error = %err, "session ended with error"),
    }
    result
}

/// 并发运行两个方向；返回时已向注册表撤销本会话的映射。
///
/// 控制器方向在独立任务中运行。设备方向只在报文边界处停止，
/// 正在写入的报文（包括 tee）总是整条写完。
async fn drive<DR, CW, CR, DW>(
    session: u64,
    device_read: DR,
    controller_write: CW,
    controller_read: CR,
    device_writer: DeviceWriter<DW>,
    ctx: &SessionContext,
) -> Result<(), ProxyError>
where
    DR: AsyncRead + Unpin,
    CW: AsyncWrite + Unpin,
    CR: AsyncRead + Unpin + Send + 'static,
    DW: AsyncWrite + Unpin + Send + 'static,
{
    let mut relay = tokio::spawn(relay_controller(controller_read, device_writer.clone()));
    let mut registered = None;
    let mut forwarder =
        MessageForwarder::new(device_read, controller_write, Arc::clone(&ctx.endpoints));

    let result = loop {
        let header = tokio::select! {
            biased;
            joined = &mut relay => {
                break match joined {
                    Ok(res) => res,
                    Err(err) => {
                        warn!(session, error = %err, "controller relay task failed");
                        Ok(())
                    }
                };
            }
            header = forwarder.read_header() => header,
        };

        let forwarded = match header {
            Ok(header) => forwarder.forward(header).await,
            Err(err) => Err(err),
        };
        match forwarded {
            Ok(Forwarded::FeaturesReply {
                dpid: Some(dpid), ..
            }) => register(session, dpid, &device_writer, ctx, &mut registered).await,
            Ok(_) => {}
            Err(err) if err.is_closed() => {
                debug!(session, "device closed connection");
                break Ok(());
            }
            Err(err) => break Err(err.into()),
        }
    };
    relay.abort();

    if let (Some(dpid), Some(mappings)) = (registered, ctx.mappings.as_ref()) {
        send_mapping(mappings, DpidMapping::Delete { dpid, session }).await;
    }
    result
}

/// 首次（或 DPID 变化时）登记本会话的注入入口。
async fn register<DW>(
    session: u64,
    dpid: u64,
    device_writer: &DeviceWriter<DW>,
    ctx: &SessionContext,
    registered: &mut Option<u64>,
) where
    DW: AsyncWrite + Unpin + Send + 'static,
{
    let Some(mappings) = ctx.mappings.as_ref() else {
        return;
    };
    if *registered == Some(dpid) {
        return;
    }
    if let Some(previous) = registered.take() {
        send_mapping(
            mappings,
            DpidMapping::Delete {
                dpid: previous,
                session,
            },
        )
        .await;
    }
    debug!(session, dpid = %format_dpid(dpid), "registering device");
    send_mapping(
        mappings,
        DpidMapping::Add {
            dpid,
            session,
            injector: Arc::new(device_writer.clone()),
        },
    )
    .await;
    *registered = Some(dpid);
}

/// 发送映射事件；注册表已停止时记录警告并返回 false。
async fn send_mapping(mappings: &MappingSender, mapping: DpidMapping) -> bool {
    let (dpid, action) = match &mapping {
        DpidMapping::Add { dpid, .. } => (*dpid, "add"),
        DpidMapping::Delete { dpid, .. } => (*dpid, "delete"),
    };
    if !mappings.send(mapping).await {
        warn!(
            dpid = %format_dpid(dpid),
            action,
            "device mapping update dropped, registry is not running"
        );
        return false;
    }
    true
}
