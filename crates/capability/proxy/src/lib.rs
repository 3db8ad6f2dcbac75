//! # 代理能力模块
//!
//! 位于设备与控制器之间：设备发往控制器的报文全部转发，其中的 Packet-In
//! 按内嵌帧的链路类型复制到匹配的 tee 端点；控制器发往设备的报文原样回传。
//!
//! ## 数据流
//!
//! ```text
//!            ┌──────────────── ProxyServer（accept 循环）
//!            │ 每个连接一个会话
//!            ▼
//! 设备 ──► MessageForwarder ──► 控制器
//!            │ Packet-In
//!            ▼
//!        Endpoints::conditional_write ──► tee 端点
//!
//! 控制器 ──► relay_controller ──► DeviceWriter ──► 设备
//!                                     ▲
//!                         管理 API 注入（Injector）
//! ```

mod error;
mod forwarder;
mod listener;
mod relay;
mod session;

pub use error::ProxyError;
pub use forwarder::{Forwarded, MessageForwarder};
pub use listener::{ProxyConfig, ProxyServer};
pub use relay::{DeviceWriter, relay_controller};
pub use session::{SessionContext, run_session};
