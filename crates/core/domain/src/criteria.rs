//! 报文匹配条件。
//!
//! 条件由两部分组成：一个位集合标记哪些字段被约束，以及这些字段的取值。
//! 没有任何位被置上的条件是通配条件，匹配一切。
//!
//! 匹配是非对称的：规则（rule）匹配状态（state）当且仅当规则中置上的每一位
//! 在状态中也置上且取值相等；只出现在状态中的位被忽略。

/// 空位集合（通配）。
pub const BIT_EMPTY: u64 = 0x0;
/// 数据链路类型（EtherType）字段。
pub const BIT_DL_TYPE: u64 = 1 << 0;

/// 匹配条件。构造后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Criteria {
    set: u64,
    dl_type: u16,
}

impl Criteria {
    /// 通配条件。
    pub const fn wildcard() -> Self {
        Self {
            set: BIT_EMPTY,
            dl_type: 0,
        }
    }

    /// 仅约束数据链路类型的条件。
    pub const fn with_dl_type(dl_type: u16) -> Self {
        Self {
            set: BIT_DL_TYPE,
            dl_type,
        }
    }

    /// 在当前条件基础上追加数据链路类型约束。
    pub const fn and_dl_type(self, dl_type: u16) -> Self {
        Self {
            set: self.set | BIT_DL_TYPE,
            dl_type,
        }
    }

    /// 数据链路类型（未约束时返回 None）。
    pub const fn dl_type(&self) -> Option<u16> {
        if self.set & BIT_DL_TYPE != 0 {
            Some(self.dl_type)
        } else {
            None
        }
    }

    pub const fn is_wildcard(&self) -> bool {
        self.set == BIT_EMPTY
    }

    /// 以 `self` 为规则，判断是否匹配给定状态。
    pub fn matches(&self, state: &Criteria) -> bool {
        if self.set & BIT_DL_TYPE != 0
            && (state.set & BIT_DL_TYPE == 0 || self.dl_type != state.dl_type)
        {
            return false;
        }
        true
    }
}

impl std::fmt::Display for Criteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.dl_type() {
            Some(dl_type) => write!(f, "dl_type=0x{:04x}", dl_type),
            None => f.write_str("*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_matches_everything() {
        let rule = Criteria::wildcard();
        assert!(rule.matches(&Criteria::wildcard()));
        assert!(rule.matches(&Criteria::with_dl_type(0x0800)));
        assert!(rule.matches(&Criteria::with_dl_type(0x0806)));
    }

    #[test]
    fn dl_type_rule_requires_equal_value() {
        let rule = Criteria::with_dl_type(0x0800);
        assert!(rule.matches(&Criteria::with_dl_type(0x0800)));
        assert!(!rule.matches(&Criteria::with_dl_type(0x0806)));
        // 状态未携带该字段时不匹配
        assert!(!rule.matches(&Criteria::wildcard()));
    }

    #[test]
    fn display_formats_rule() {
        assert_eq!(Criteria::with_dl_type(0x88cc).to_string(), "dl_type=0x88cc");
        assert_eq!(Criteria::wildcard().to_string(), "*");
    }
}
