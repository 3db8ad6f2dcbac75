//! 交换机 Datapath ID 的文本表示。

use crate::literal::{LiteralError, parse_uint};

const DPID_PREFIX: &str = "of:";

/// 格式化为 `of:0x%016x`。
pub fn format_dpid(dpid: u64) -> String {
    format!("{}0x{:016x}", DPID_PREFIX, dpid)
}

/// 解析 DPID，可带 `of:` 前缀，数值部分按 [`parse_uint`] 规则解析。
pub fn parse_dpid(text: &str) -> Result<u64, LiteralError> {
    let text = text.trim();
    let text = text.strip_prefix(DPID_PREFIX).unwrap_or(text);
    parse_uint(text, 64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_prefix_and_padding() {
        assert_eq!(format_dpid(0x1), "of:0x0000000000000001");
        assert_eq!(format_dpid(u64::MAX), "of:0xffffffffffffffff");
    }

    #[test]
    fn parses_listed_and_plain_forms() {
        assert_eq!(parse_dpid("of:0x0000000000000001"), Ok(1));
        assert_eq!(parse_dpid("0x2a"), Ok(42));
        assert_eq!(parse_dpid("42"), Ok(42));
        assert!(parse_dpid("of:zz").is_err());
    }
}
