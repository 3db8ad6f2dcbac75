//! # tee 端点能力模块
//!
//! 把配置中的端点描述解析为可写入的目标，并按匹配条件把报文复制过去。
//!
//! ## 架构设计
//!
//! ```text
//! TEE_TO 描述串
//!       │  EndpointSpec::parse
//!       ▼
//! EndpointSpec (Destination + Criteria)
//!       │  Endpoint::connect
//!       ▼
//! Endpoints ──► [TcpTransport | HttpTransport]
//!       ▲
//!       │ conditional_write(报文, 派生条件)
//! 会话循环
//! ```
//!
//! ## 描述格式
//!
//! ```text
//! spec := destination | term (";" term)*
//! term := "action=" url | "dl_type=" uint16
//! ```
//!
//! - `tcp://host:port`、`host:port`：直接 TCP 连接
//! - `http://host/path`：每条报文一次 POST
//! - `dl_type=0x0806;action=tcp://host:9`：只复制 ARP

mod endpoints;
mod error;
mod spec;
mod transport;

pub use endpoints::{Delivery, Endpoint, Endpoints};
pub use error::TeeError;
pub use spec::{
    Destination, EndpointSpec, SCHEME_HTTP, SCHEME_HTTPS, SCHEME_TCP, TERM_ACTION, TERM_DL_TYPE,
};
pub use transport::{HttpTransport, OCTET_STREAM, TcpTransport, Transport};
