//! # OpenFlow 分帧能力模块
//!
//! 只解析代理需要的部分，其余报文内容视为不透明负载：
//! - **Header**：所有报文共有的 8 字节头（version、type、length、xid）
//! - **Packet-In**：按版本解析固定子头，定位内嵌的数据面帧
//! - **Features-Reply**：取出交换机 DPID
//! - **Ethernet**：从内嵌帧读取 16 位链路类型（EtherType）
//!
//! ## 报文布局
//!
//! ```text
//! +---------+------+--------+-----+---------------------+-------------------+
//! | version | type | length | xid | Packet-In 子头      | 数据面帧          |
//! |   u8    |  u8  |  u16   | u32 | (按版本固定/带 match) | length - 头 - 子头 |
//! +---------+------+--------+-----+---------------------+-------------------+
//! ```
//!
//! 所有多字节字段均为大端序。

mod error;
mod ethernet;
mod features;
mod header;
mod packet_in;

pub use error::ProtocolError;
pub use ethernet::{ETHERNET_HEADER_LEN, link_type};
pub use features::{FEATURES_DPID_LEN, datapath_id};
pub use header::{
    BUFFER_SIZE, HEADER_LEN, Header, TYPE_ECHO_REQUEST, TYPE_FEATURES_REPLY, TYPE_HELLO,
    TYPE_PACKET_IN, TYPE_PACKET_OUT, VERSION_1_0, VERSION_1_2, VERSION_1_3,
};
pub use packet_in::{PacketIn, PacketInLayout};
