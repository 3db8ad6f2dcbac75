//! 报文注入能力。
//!
//! 会话在得知交换机 DPID 后注册一个 [`Injector`]，管理 API 按 DPID 查找并注入报文。
//! 映射表只由一个更新任务写入，按到达顺序处理新增/删除事件；读取方通过读写锁查询。

use async_trait::async_trait;
use domain::format_dpid;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// 注入错误。
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    #[error("device connection closed")]
    Closed,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 向设备写入一条完整报文的能力。
#[async_trait]
pub trait Injector: Send + Sync {
    async fn inject(&self, message: &[u8]) -> Result<(), InjectError>;
}

/// 映射变更事件。
pub enum DpidMapping {
    /// 新增或替换，`session` 标识注册方
    Add {
        dpid: u64,
        session: u64,
        injector: Arc<dyn Injector>,
    },
    /// 删除，仅当映射仍属于 `session` 时生效
    Delete { dpid: u64, session: u64 },
}

struct Registered {
    session: u64,
    injector: Arc<dyn Injector>,
}

type InjectorMap = Arc<RwLock<HashMap<u64, Registered>>>;

/// 映射事件发送端，交给各个会话。
#[derive(Clone)]
pub struct MappingSender {
    tx: mpsc::Sender<DpidMapping>,
}

impl MappingSender {
    /// 发送事件；更新任务已退出时返回 false。
    pub async fn send(&self, mapping: DpidMapping) -> bool {
        self.tx.send(mapping).await.is_ok()
    }
}

/// DPID → Injector 映射表（只读视图）。
#[derive(Clone)]
pub struct InjectorRegistry {
    injectors: InjectorMap,
}

impl InjectorRegistry {
    /// 启动单写者更新任务，返回只读视图、事件发送端与任务句柄。
    pub fn spawn(capacity: usize) -> (Self, MappingSender, JoinHandle<()>) {
        let injectors: InjectorMap = Arc::new(RwLock::new(HashMap::new()));
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(apply_updates(rx, Arc::clone(&injectors)));
        (Self { injectors }, MappingSender { tx }, handle)
    }

    /// 按 DPID 查找。
    pub fn lookup(&self, dpid: u64) -> Option<Arc<dyn Injector>> {
        self.injectors
            .read()
            .ok()
            .and_then(|map| map.get(&dpid).map(|entry| Arc::clone(&entry.injector)))
    }

    /// 已知 DPID，升序。
    pub fn devices(&self) -> Vec<u64> {
        let mut devices: Vec<u64> = self
            .injectors
            .read()
            .map(|map| map.keys().copied().collect())
            .unwrap_or_default();
        devices.sort_unstable();
        devices
    }
}

/// 映射更新循环：按事件到达顺序修改映射表。
async fn apply_updates(mut rx: mpsc::Receiver<DpidMapping>, injectors: InjectorMap) {
    debug!("start listening for device dpid mapping updates");
    while let Some(mapping) = rx.recv().await {
        let Ok(mut map) = injectors.write() else {
            break;
        };
        match mapping {
            DpidMapping::Add {
                dpid,
                session,
                injector,
            } => {
                debug!(dpid = %format_dpid(dpid), session, "adding device mapping");
                map.insert(dpid, Registered { session, injector });
            }
            DpidMapping::Delete { dpid, session } => {
                if map.get(&dpid).is_some_and(|entry| entry.session == session) {
                    debug!(dpid = %format_dpid(dpid), session, "deleting device mapping");
                    map.remove(&dpid);
                } else {
                    debug!(
                        dpid = %format_dpid(dpid),
                        session,
                        "ignoring delete for mapping owned by another session"
                    );
                }
            }
        }
    }
}
