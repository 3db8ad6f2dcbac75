//! oftee 领域模型：匹配条件、数值字面量、DPID 与地址规整。

pub mod addr;
pub mod criteria;
pub mod dpid;
pub mod literal;

pub use addr::{connect_addr, listen_addr};
pub use criteria::{BIT_DL_TYPE, BIT_EMPTY, Criteria};
pub use dpid::{format_dpid, parse_dpid};
pub use literal::{LiteralError, parse_uint};
